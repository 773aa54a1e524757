//! Hand-curated anime lists served when no live data can be produced.

use once_cell::sync::Lazy;
use shared::{assign_ranks, AiringStatus, AnimeSummary, ImageUrls, TrailerCandidate};

struct Seed {
    mal_id: u32,
    title: &'static str,
    title_english: Option<&'static str>,
    /// MyAnimeList CDN path, e.g. "1015/138006"
    image: &'static str,
    score: f64,
    popularity: u32,
    episodes: Option<u32>,
    year: i32,
    status: AiringStatus,
    genres: &'static [&'static str],
    studios: &'static [&'static str],
    youtube_id: &'static str,
}

const AIRING: &[Seed] = &[
    Seed {
        mal_id: 52991,
        title: "Sousou no Frieren",
        title_english: Some("Frieren: Beyond Journey's End"),
        image: "1015/138006",
        score: 9.3,
        popularity: 120,
        episodes: Some(28),
        year: 2023,
        status: AiringStatus::CurrentlyAiring,
        genres: &["Adventure", "Drama", "Fantasy"],
        studios: &["Madhouse"],
        youtube_id: "qgQKpcqHpDE",
    },
    Seed {
        mal_id: 57334,
        title: "Dandadan",
        title_english: Some("Dan Da Dan"),
        image: "1584/143719",
        score: 8.6,
        popularity: 310,
        episodes: Some(12),
        year: 2024,
        status: AiringStatus::CurrentlyAiring,
        genres: &["Action", "Comedy", "Supernatural"],
        studios: &["Science SARU"],
        youtube_id: "pmanD_s7G3U",
    },
    Seed {
        mal_id: 52299,
        title: "Ore dake Level Up na Ken",
        title_english: Some("Solo Leveling"),
        image: "1801/142390",
        score: 8.3,
        popularity: 160,
        episodes: Some(12),
        year: 2024,
        status: AiringStatus::CurrentlyAiring,
        genres: &["Action", "Adventure", "Fantasy"],
        studios: &["A-1 Pictures"],
        youtube_id: "FOhuKw1bB6Y",
    },
    Seed {
        mal_id: 50265,
        title: "Spy x Family",
        title_english: Some("Spy x Family"),
        image: "1441/122795",
        score: 8.5,
        popularity: 75,
        episodes: Some(12),
        year: 2022,
        status: AiringStatus::CurrentlyAiring,
        genres: &["Action", "Comedy"],
        studios: &["Wit Studio", "CloverWorks"],
        youtube_id: "ofXigq9aIpo",
    },
    Seed {
        mal_id: 21,
        title: "One Piece",
        title_english: Some("One Piece"),
        image: "1244/138851",
        score: 8.7,
        popularity: 20,
        episodes: None,
        year: 1999,
        status: AiringStatus::CurrentlyAiring,
        genres: &["Action", "Adventure", "Fantasy"],
        studios: &["Toei Animation"],
        youtube_id: "MCb13lbVGE0",
    },
];

const TRENDING: &[Seed] = &[
    Seed {
        mal_id: 16498,
        title: "Shingeki no Kyojin",
        title_english: Some("Attack on Titan"),
        image: "10/47347",
        score: 8.5,
        popularity: 1,
        episodes: Some(25),
        year: 2013,
        status: AiringStatus::FinishedAiring,
        genres: &["Action", "Drama", "Suspense"],
        studios: &["Wit Studio"],
        youtube_id: "LHtdKWJdif4",
    },
    Seed {
        mal_id: 1535,
        title: "Death Note",
        title_english: Some("Death Note"),
        image: "1079/138100",
        score: 8.6,
        popularity: 2,
        episodes: Some(37),
        year: 2006,
        status: AiringStatus::FinishedAiring,
        genres: &["Supernatural", "Suspense"],
        studios: &["Madhouse"],
        youtube_id: "NlJZ-YgAt-c",
    },
    Seed {
        mal_id: 5114,
        title: "Fullmetal Alchemist: Brotherhood",
        title_english: Some("Fullmetal Alchemist: Brotherhood"),
        image: "1208/94745",
        score: 9.1,
        popularity: 3,
        episodes: Some(64),
        year: 2009,
        status: AiringStatus::FinishedAiring,
        genres: &["Action", "Adventure", "Drama", "Fantasy"],
        studios: &["Bones"],
        youtube_id: "--IcmZkvL0Q",
    },
    Seed {
        mal_id: 30276,
        title: "One Punch Man",
        title_english: Some("One Punch Man"),
        image: "12/76049",
        score: 8.5,
        popularity: 4,
        episodes: Some(12),
        year: 2015,
        status: AiringStatus::FinishedAiring,
        genres: &["Action", "Comedy"],
        studios: &["Madhouse"],
        youtube_id: "Poo5lqoWSGw",
    },
    Seed {
        mal_id: 38000,
        title: "Kimetsu no Yaiba",
        title_english: Some("Demon Slayer: Kimetsu no Yaiba"),
        image: "1286/99889",
        score: 8.4,
        popularity: 5,
        episodes: Some(26),
        year: 2019,
        status: AiringStatus::FinishedAiring,
        genres: &["Action", "Fantasy"],
        studios: &["ufotable"],
        youtube_id: "VQGCKyvzIM4",
    },
    Seed {
        mal_id: 40748,
        title: "Jujutsu Kaisen",
        title_english: Some("Jujutsu Kaisen"),
        image: "1171/109222",
        score: 8.6,
        popularity: 12,
        episodes: Some(24),
        year: 2020,
        status: AiringStatus::FinishedAiring,
        genres: &["Action", "Supernatural"],
        studios: &["MAPPA"],
        youtube_id: "pkKu9hLT-t8",
    },
];

static SNAPSHOT: Lazy<Vec<AnimeSummary>> = Lazy::new(|| build(AIRING));
static TRENDING_LIST: Lazy<Vec<AnimeSummary>> = Lazy::new(|| build(TRENDING));

fn image_urls(path: &str) -> ImageUrls {
    let base = format!("https://cdn.myanimelist.net/images/anime/{}", path);
    ImageUrls::from_optional(
        Some(format!("{}t.jpg", base)),
        Some(format!("{}.jpg", base)),
        Some(format!("{}l.jpg", base)),
    )
}

fn build(seeds: &[Seed]) -> Vec<AnimeSummary> {
    let mut list: Vec<AnimeSummary> = seeds
        .iter()
        .map(|seed| {
            let mut anime = AnimeSummary::new(seed.mal_id, seed.title);
            anime.title_english = seed.title_english.map(str::to_string);
            anime.images = image_urls(seed.image);
            anime.score = Some(seed.score);
            anime.popularity = seed.popularity;
            anime.episodes = seed.episodes;
            anime.year = Some(seed.year);
            anime.status = seed.status;
            anime.genres = seed.genres.iter().map(|g| g.to_string()).collect();
            anime.studios = seed.studios.iter().map(|s| s.to_string()).collect();
            anime.apply_trailer(TrailerCandidate::from_youtube_id(seed.youtube_id));
            anime
        })
        .collect();

    assign_ranks(&mut list);
    list
}

/// Static stand-in for live data
pub struct StaticFallbackCatalog;

impl StaticFallbackCatalog {
    /// Top-airing list, in display order
    pub fn snapshot() -> Vec<AnimeSummary> {
        SNAPSHOT.clone()
    }

    /// All-time popular list used when the trending query fails
    pub fn trending() -> Vec<AnimeSummary> {
        TRENDING_LIST.clone()
    }
}
