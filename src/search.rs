use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use crate::catalog::Catalog;
use crate::indexer::{CourseEntry, ModuleEntry, MusicEntry, SearchIndex};
use crate::scoring::{score_terms, tokenize_query, NO_KEYWORDS};

pub const DEFAULT_LIMIT: usize = 20;

/// Which sub-indexes take part in a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    All,
    Music,
    Courses,
    Modules,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Music => "music",
            Self::Courses => "courses",
            Self::Modules => "modules",
        }
    }

    fn includes(self, other: SearchType) -> bool {
        self == Self::All || self == other
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "music" => Ok(Self::Music),
            "courses" => Ok(Self::Courses),
            "modules" => Ok(Self::Modules),
            other => Err(format!(
                "type must be one of all, music, courses, modules (got '{other}')"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub kind: SearchType,
    /// Music and courses only.
    pub subject: Option<String>,
    /// Music and courses only.
    pub grade: Option<String>,
    /// Music only.
    pub genre: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            kind: SearchType::All,
            subject: None,
            grade: None,
            genre: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// An index entry tagged with its kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IndexedEntity {
    Music(MusicEntry),
    Course(CourseEntry),
    Module(ModuleEntry),
}

impl IndexedEntity {
    pub fn id(&self) -> &str {
        match self {
            Self::Music(e) => &e.id,
            Self::Course(e) => &e.id,
            Self::Module(e) => &e.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Music(e) => &e.title,
            Self::Course(e) => &e.title,
            Self::Module(e) => &e.title,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Music(_) => "music",
            Self::Course(_) => "course",
            Self::Module(_) => "module",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredResult {
    #[serde(flatten)]
    pub entity: IndexedEntity,
    pub score: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchOutcome {
    pub results: Vec<ScoredResult>,
    /// Matches before pagination.
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndexCount {
    pub total: usize,
    pub indexed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub music: IndexCount,
    pub courses: IndexCount,
    pub modules: IndexCount,
    pub last_updated: DateTime<Utc>,
}

impl IndexStats {
    pub fn of(index: &SearchIndex) -> Self {
        let count = |n| IndexCount { total: n, indexed: n };
        Self {
            music: count(index.music.len()),
            courses: count(index.courses.len()),
            modules: count(index.modules.len()),
            last_updated: index.built_at,
        }
    }
}

/// Scores, filters, merges and paginates across the selected sub-indexes.
pub fn search(index: &SearchIndex, query: &str, options: &SearchOptions) -> SearchOutcome {
    let terms = tokenize_query(query);
    let subject = options.subject.as_deref();
    let grade = options.grade.as_deref();
    let genre = options.genre.as_deref();
    let mut results: Vec<ScoredResult> = Vec::new();

    if options.kind.includes(SearchType::Music) {
        results.extend(
            index
                .music
                .iter()
                .filter_map(|entry| {
                    let text = format!("{} {}", entry.title, entry.artist);
                    let score = score_terms(&terms, &text, &entry.keywords);
                    (score > 0).then_some((entry, score))
                })
                .filter(|(entry, _)| facet_matches(subject, &entry.subject))
                .filter(|(entry, _)| facet_matches(grade, &entry.grade))
                .filter(|(entry, _)| facet_matches(genre, &entry.genre))
                .map(|(entry, score)| ScoredResult {
                    entity: IndexedEntity::Music(entry.clone()),
                    score,
                }),
        );
    }

    if options.kind.includes(SearchType::Courses) {
        results.extend(
            index
                .courses
                .iter()
                .filter_map(|entry| {
                    let score = score_terms(&terms, &entry.title, NO_KEYWORDS);
                    (score > 0).then_some((entry, score))
                })
                .filter(|(entry, _)| facet_matches(subject, &entry.subject))
                .filter(|(entry, _)| facet_matches(grade, &entry.grade))
                .map(|(entry, score)| ScoredResult {
                    entity: IndexedEntity::Course(entry.clone()),
                    score,
                }),
        );
    }

    if options.kind.includes(SearchType::Modules) {
        results.extend(index.modules.iter().filter_map(|entry| {
            let score = score_terms(&terms, &entry.name, NO_KEYWORDS);
            (score > 0).then(|| ScoredResult {
                entity: IndexedEntity::Module(entry.clone()),
                score,
            })
        }));
    }

    // Stable: equal scores keep music, course, module order.
    results.sort_by(|a, b| b.score.cmp(&a.score));

    let total = results.len();
    let results = results
        .into_iter()
        .skip(options.offset)
        .take(options.limit)
        .collect();

    SearchOutcome { results, total }
}

fn facet_matches(filter: Option<&str>, value: &str) -> bool {
    filter.map_or(true, |wanted| wanted == value)
}

/// Holds the live index snapshot. Rebuilds swap the pointer; queries in
/// flight keep the snapshot they started with.
#[derive(Debug)]
pub struct SearchEngine {
    index: RwLock<Arc<SearchIndex>>,
}

impl SearchEngine {
    pub fn new(index: SearchIndex) -> Self {
        Self {
            index: RwLock::new(Arc::new(index)),
        }
    }

    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::new(SearchIndex::build(catalog))
    }

    pub fn snapshot(&self) -> Arc<SearchIndex> {
        let guard = self.index.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, index: SearchIndex) {
        let index = Arc::new(index);
        let mut guard = self.index.write().unwrap_or_else(|e| e.into_inner());
        *guard = index;
    }

    pub fn rebuild(&self, catalog: &Catalog) {
        self.replace(SearchIndex::build(catalog));
        tracing::info!("Search index rebuilt");
    }

    pub fn search(&self, query: &str, options: &SearchOptions) -> SearchOutcome {
        search(&self.snapshot(), query, options)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats::of(&self.snapshot())
    }
}
