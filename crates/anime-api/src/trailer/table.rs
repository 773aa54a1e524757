//! Hand-maintained trailer table, the last strategy in the chain.
//!
//! Entries are matched by MyAnimeList id first, then by case-insensitive
//! franchise keyword against the native and English titles. Among matching
//! keywords the longest wins; equal lengths go to the earlier declaration.

use super::LookupOutcome;
use once_cell::sync::Lazy;
use shared::{AnimeSummary, TrailerCandidate};

/// (MyAnimeList id, YouTube id)
const BY_ID: &[(u32, &str)] = &[
    (52991, "qgQKpcqHpDE"), // Sousou no Frieren
    (40748, "pkKu9hLT-t8"), // Jujutsu Kaisen
    (51009, "O6qVieflwqs"), // Jujutsu Kaisen 2nd Season
    (52299, "FOhuKw1bB6Y"), // Ore dake Level Up na Ken
    (57334, "pmanD_s7G3U"), // Dandadan
    (50265, "ofXigq9aIpo"), // Spy x Family
    (38000, "VQGCKyvzIM4"), // Kimetsu no Yaiba
];

/// (lowercase keyword, YouTube id)
const BY_KEYWORD: &[(&str, &str)] = &[
    ("one piece", "MCb13lbVGE0"),
    ("frieren", "qgQKpcqHpDE"),
    ("jujutsu kaisen", "pkKu9hLT-t8"),
    ("solo leveling", "FOhuKw1bB6Y"),
    ("dandadan", "pmanD_s7G3U"),
    ("spy x family", "ofXigq9aIpo"),
    ("kimetsu no yaiba", "VQGCKyvzIM4"),
    ("demon slayer", "VQGCKyvzIM4"),
    ("chainsaw man", "dFlDRhvM4L0"),
    ("kaijuu 8-gou", "Br4ahSmDgUk"),
    ("kaiju no. 8", "Br4ahSmDgUk"),
    ("boku no hero academia", "D5fYOnwYkj4"),
    ("my hero academia", "D5fYOnwYkj4"),
];

static BUILTIN: Lazy<StaticTrailerTable> = Lazy::new(|| StaticTrailerTable {
    by_id: BY_ID.iter().map(|(id, yt)| (*id, yt.to_string())).collect(),
    by_keyword: BY_KEYWORD
        .iter()
        .map(|(kw, yt)| (kw.to_string(), yt.to_string()))
        .collect(),
});

#[derive(Debug, Clone, Default)]
pub struct StaticTrailerTable {
    by_id: Vec<(u32, String)>,
    /// Keywords are stored lowercase, in declaration order
    by_keyword: Vec<(String, String)>,
}

impl StaticTrailerTable {
    /// The compiled-in table
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, mal_id: u32, youtube_id: impl Into<String>) -> Self {
        self.by_id.push((mal_id, youtube_id.into()));
        self
    }

    pub fn with_keyword(mut self, keyword: &str, youtube_id: impl Into<String>) -> Self {
        self.by_keyword
            .push((keyword.trim().to_lowercase(), youtube_id.into()));
        self
    }

    pub fn lookup(&self, summary: &AnimeSummary) -> LookupOutcome {
        if let Some((_, youtube_id)) = self.by_id.iter().find(|(id, _)| *id == summary.mal_id) {
            return LookupOutcome::Match(TrailerCandidate::from_youtube_id(youtube_id.clone()));
        }

        let titles: Vec<String> = std::iter::once(summary.title.as_str())
            .chain(summary.title_english.as_deref())
            .map(str::to_lowercase)
            .collect();

        let mut best: Option<&(String, String)> = None;
        for entry in &self.by_keyword {
            let (keyword, _) = entry;
            if keyword.is_empty() || !titles.iter().any(|t| t.contains(keyword.as_str())) {
                continue;
            }
            // Strictly longer only, so earlier declarations keep ties
            let better = match best {
                Some((current, _)) => keyword.chars().count() > current.chars().count(),
                None => true,
            };
            if better {
                best = Some(entry);
            }
        }

        match best {
            Some((_, youtube_id)) => {
                LookupOutcome::Match(TrailerCandidate::from_youtube_id(youtube_id.clone()))
            }
            None => LookupOutcome::NoMatch,
        }
    }
}
