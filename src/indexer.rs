use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::catalog::{Catalog, Course, Level, ProductModule, Track};

/// Curated synonyms per subject, merged into every music entry's keyword set.
static SUBJECT_KEYWORDS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        (
            "math",
            &["multiplicación", "tablas", "matemáticas", "números"][..],
        ),
        (
            "chemistry",
            &["elementos", "tabla periódica", "química", "ciencia"][..],
        ),
        (
            "geography",
            &["continentes", "océanos", "geografía", "mundo", "capitales"][..],
        ),
        (
            "spanish",
            &["gramática", "lenguaje", "español", "verbos", "sustantivos"][..],
        ),
        ("history", &["historia", "chile", "fechas", "independencia"][..]),
        ("english", &["inglés", "english", "colores", "números"][..]),
    ])
});

#[derive(Debug, Clone, Serialize)]
pub struct MusicEntry {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub subject: String,
    pub grade: String,
    pub keywords: BTreeSet<String>,
    pub plays: u64,
    pub likes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseEntry {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub grade: String,
    pub modules: u32,
    pub duration: String,
    pub level: Level,
    pub instructor: String,
    pub rating: f32,
    pub enrollments: u64,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleEntry {
    pub id: String,
    pub name: String,
    /// Same as `name`; lets every result expose a `title`.
    pub title: String,
    pub department: String,
    pub category: String,
    pub status: String,
    pub users: u64,
}

/// Read-only snapshot of all three indexes.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    pub music: Vec<MusicEntry>,
    pub courses: Vec<CourseEntry>,
    pub modules: Vec<ModuleEntry>,
    pub built_at: DateTime<Utc>,
}

impl SearchIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let index = Self {
            music: build_music_index(&catalog.tracks),
            courses: build_courses_index(&catalog.courses),
            modules: build_modules_index(&catalog.modules),
            built_at: Utc::now(),
        };

        tracing::debug!(
            music = index.music.len(),
            courses = index.courses.len(),
            modules = index.modules.len(),
            "Search index built"
        );

        index
    }
}

pub fn build_music_index(tracks: &[Track]) -> Vec<MusicEntry> {
    tracks
        .iter()
        .map(|track| MusicEntry {
            id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            genre: track.genre.clone(),
            subject: track.subject.clone(),
            grade: track.grade.clone(),
            keywords: generate_keywords(&track.subject, &track.title),
            plays: track.plays,
            likes: track.likes,
        })
        .collect()
}

pub fn build_courses_index(courses: &[Course]) -> Vec<CourseEntry> {
    courses
        .iter()
        .map(|course| CourseEntry {
            id: course.id.clone(),
            title: course.title.clone(),
            subject: course.subject.clone(),
            grade: course.grade.clone(),
            modules: course.modules,
            duration: course.duration.clone(),
            level: course.level,
            instructor: course.instructor.clone(),
            rating: course.rating,
            enrollments: course.enrollments,
            tags: course.tags.clone(),
        })
        .collect()
}

pub fn build_modules_index(modules: &[ProductModule]) -> Vec<ModuleEntry> {
    modules
        .iter()
        .map(|module| ModuleEntry {
            id: module.id.clone(),
            name: module.name.clone(),
            title: module.name.clone(),
            department: module.department.clone(),
            category: module.category.clone(),
            status: module.status.clone(),
            users: module.users,
        })
        .collect()
}

fn generate_keywords(subject: &str, title: &str) -> BTreeSet<String> {
    let synonyms = SUBJECT_KEYWORDS
        .get(subject)
        .into_iter()
        .flat_map(|words| words.iter().map(|w| w.to_string()));

    let title_words = title.split_whitespace().map(str::to_lowercase);

    synonyms.chain(title_words).collect()
}
