use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Seed catalog bundled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub subject: String,
    pub grade: String,
    /// Length in seconds.
    pub duration: u32,
    pub url: String,
    pub cover_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    pub plays: u64,
    pub likes: u64,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub grade: String,
    pub level: Level,
    pub duration: String,
    pub modules: u32,
    pub lessons: u32,
    pub instructor: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub rating: f32,
    pub enrollments: u64,
    #[serde(default)]
    pub is_free: bool,
}

/// A product line of the suite (e.g. "NewCool Music", "Mind OS").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductModule {
    pub id: String,
    pub name: String,
    pub department: String,
    pub category: String,
    pub status: String,
    pub users: u64,
}

/// In-memory source collections the search indexes are derived from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub modules: Vec<ProductModule>,
}

impl Catalog {
    pub fn builtin() -> Result<Self> {
        serde_json::from_str(BUILTIN_CATALOG).context("Failed to parse built-in catalog")
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Reading catalog from {}", path.display());

        let data = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let catalog: Catalog = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;

        tracing::info!(
            "Loaded {} tracks, {} courses, {} modules",
            catalog.tracks.len(),
            catalog.courses.len(),
            catalog.modules.len()
        );

        Ok(catalog)
    }

    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn record_play(&mut self, id: &str) -> Option<&Track> {
        let track = self.tracks.iter_mut().find(|t| t.id == id)?;
        track.plays += 1;
        Some(track)
    }

    pub fn record_like(&mut self, id: &str) -> Option<&Track> {
        let track = self.tracks.iter_mut().find(|t| t.id == id)?;
        track.likes += 1;
        Some(track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin().expect("builtin catalog");
        assert_eq!(catalog.tracks.len(), 25);
        assert_eq!(catalog.courses.len(), 12);
        assert_eq!(catalog.modules.len(), 10);
    }

    #[test]
    fn record_play_increments_only_the_target() {
        let mut catalog = Catalog::builtin().unwrap();
        let before = catalog.track("t001").unwrap().plays;
        let other = catalog.track("t002").unwrap().plays;

        let updated = catalog.record_play("t001").unwrap();
        assert_eq!(updated.plays, before + 1);
        assert_eq!(catalog.track("t002").unwrap().plays, other);
    }

    #[test]
    fn unknown_track_is_none() {
        let mut catalog = Catalog::builtin().unwrap();
        assert!(catalog.record_like("t999").is_none());
        assert!(catalog.track("t999").is_none());
    }
}
