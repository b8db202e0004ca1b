pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod indexer;
pub mod scoring;
pub mod search;
pub mod server;

// Re-export main types
pub use catalog::Catalog;
pub use indexer::SearchIndex;
pub use search::{search, SearchEngine, SearchOptions, SearchOutcome, SearchType};
