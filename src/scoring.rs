//! Lexical relevance scoring.
//!
//! Each query term is checked independently against three signals and the
//! points add up; a term may earn all three:
//!
//! ```text
//! term is a substring of the text          +10
//! term is a substring of any keyword       +5
//! some word of the text starts with term   +3
//! ```
//!
//! There is no AND semantics: a candidate matching one of two terms still
//! scores, just lower than one matching both.

pub const SUBSTRING_WEIGHT: u32 = 10;
pub const KEYWORD_WEIGHT: u32 = 5;
pub const PREFIX_WEIGHT: u32 = 3;

/// Keyword list for candidates scored on their text alone.
pub const NO_KEYWORDS: &[&str] = &[];

/// Splits on runs of whitespace and lowercases each term.
pub fn tokenize_query(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// Scores `text` (and optional `keywords`) against `query`. Zero means no match.
///
/// `keywords` must already be lowercase; the index builder guarantees it.
pub fn score<I, K>(query: &str, text: &str, keywords: I) -> u32
where
    I: IntoIterator<Item = K> + Copy,
    K: AsRef<str>,
{
    score_terms(&tokenize_query(query), text, keywords)
}

/// Same as [`score`] for an already tokenized query.
pub fn score_terms<I, K>(terms: &[String], text: &str, keywords: I) -> u32
where
    I: IntoIterator<Item = K> + Copy,
    K: AsRef<str>,
{
    let text = text.to_lowercase();
    let words: Vec<&str> = text.split_whitespace().collect();

    terms
        .iter()
        .map(|term| {
            let mut points = 0;
            if text.contains(term.as_str()) {
                points += SUBSTRING_WEIGHT;
            }
            if keywords
                .into_iter()
                .any(|k| k.as_ref().contains(term.as_str()))
            {
                points += KEYWORD_WEIGHT;
            }
            if words.iter().any(|w| w.starts_with(term.as_str())) {
                points += PREFIX_WEIGHT;
            }
            points
        })
        .sum()
}
