//! Wire types for the HTTP API: the response envelope, raw search
//! parameters and their validation.

use serde::Serialize;

use crate::error::ApiError;
use crate::search::{ScoredResult, SearchOptions, SearchType, DEFAULT_LIMIT};

pub const MAX_QUERY_CHARS: usize = 200;
pub const MAX_LIMIT: usize = 100;

/// Envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    pub fn paginated(data: T, meta: PageMeta) -> Self {
        Self {
            meta: Some(meta),
            ..Self::ok(data)
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            meta: None,
        }
    }
}

/// Query string of `GET /api/search`, as received.
#[derive(Debug, Default)]
pub struct SearchParams {
    pub q: Option<String>,
    pub kind: Option<String>,
    pub subject: Option<String>,
    pub grade: Option<String>,
    pub genre: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub stats: Option<String>,
}

impl SearchParams {
    /// Builds params from raw query pairs. A repeated key keeps its last
    /// value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "q" => &mut params.q,
                "type" => &mut params.kind,
                "subject" => &mut params.subject,
                "grade" => &mut params.grade,
                "genre" => &mut params.genre,
                "limit" => &mut params.limit,
                "offset" => &mut params.offset,
                "stats" => &mut params.stats,
                _ => continue,
            };
            *slot = Some(value);
        }
        params
    }

    pub fn wants_stats(&self) -> bool {
        self.stats.as_deref() == Some("true")
    }

    pub fn validate(self) -> Result<ValidatedSearch, ApiError> {
        let query = self
            .q
            .ok_or_else(|| ApiError::BadRequest("q is required".into()))?;
        let chars = query.chars().count();
        if chars == 0 {
            return Err(ApiError::BadRequest(
                "q must contain at least 1 character".into(),
            ));
        }
        if chars > MAX_QUERY_CHARS {
            return Err(ApiError::BadRequest(format!(
                "q must contain at most {MAX_QUERY_CHARS} characters"
            )));
        }

        let kind = match self.kind.as_deref() {
            None => SearchType::All,
            Some(raw) => raw.parse().map_err(ApiError::BadRequest)?,
        };

        let limit = match self.limit.as_deref() {
            None => DEFAULT_LIMIT,
            Some(raw) => {
                let value = parse_integer("limit", raw)?;
                if !(1..=MAX_LIMIT as i64).contains(&value) {
                    return Err(ApiError::BadRequest(format!(
                        "limit must be between 1 and {MAX_LIMIT}"
                    )));
                }
                value as usize
            }
        };

        // A blank offset coerces to 0, like the web client's number coercion.
        let offset = match self.offset.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => {
                let value = parse_integer("offset", raw)?;
                if value < 0 {
                    return Err(ApiError::BadRequest(
                        "offset must be greater than or equal to 0".into(),
                    ));
                }
                value as usize
            }
        };

        Ok(ValidatedSearch {
            query,
            options: SearchOptions {
                kind,
                subject: non_empty(self.subject),
                grade: non_empty(self.grade),
                genre: non_empty(self.genre),
                limit,
                offset,
            },
        })
    }
}

fn parse_integer(name: &str, raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("{name} must be an integer")))
}

// An empty facet means "no filter".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct ValidatedSearch {
    pub query: String,
    pub options: SearchOptions,
}

impl ValidatedSearch {
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            kind: self.options.kind,
            subject: self.options.subject.clone(),
            grade: self.options.grade.clone(),
            genre: self.options.genre.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchFilters {
    #[serde(rename = "type")]
    pub kind: SearchType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

/// `data` payload of a successful search.
#[derive(Debug, Serialize)]
pub struct SearchData {
    pub query: String,
    pub filters: SearchFilters,
    pub results: Vec<ScoredResult>,
}
