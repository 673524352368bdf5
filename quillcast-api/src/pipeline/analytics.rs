//! Keyword-based manuscript analytics.
//!
//! Eight fixed genre dictionaries are matched against the extracted text:
//!
//! - **Genre fit** counts how many of a genre's keywords occur as literal
//!   substrings and keeps the top five genres with at least one hit.
//! - **Audience insight** scores each retained genre from whole-word,
//!   case-insensitive keyword frequency, linearly scaled into [500, 1000]
//!   and capped at the top of the band.
//! - **Marketability** is a uniformly random 1–5 rating, independent of the
//!   text.
//!
//! The original system shipped two divergent copies of this scoring logic;
//! the raw-count variant implemented here is the one that was actually
//! reachable. See DESIGN.md.

use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

/// Lower bound of the audience-insight band.
pub const MIN_INSIGHT_SCORE: u32 = 500;

/// Upper bound of the audience-insight band.
pub const MAX_INSIGHT_SCORE: u32 = 1000;

/// Score added per whole-word keyword hit before capping.
const INSIGHT_STEP: u32 = 90;

/// How many genres genre-fit retains.
const TOP_GENRES: usize = 5;

/// The eight genre keyword dictionaries.
const GENRE_KEYWORDS: [(&str, [&str; 10]); 8] = [
    (
        "Case Study",
        [
            "case study", "research", "analysis", "data", "survey", "findings", "conclusion",
            "methodology", "evaluation", "report",
        ],
    ),
    (
        "Musical",
        [
            "music", "song", "melody", "composition", "rhythm", "instrument", "harmony",
            "lyrics", "orchestra", "performance",
        ],
    ),
    (
        "Article",
        [
            "news", "opinion", "human rights", "editorial", "journalism", "report", "headline",
            "feature", "review", "analysis",
        ],
    ),
    (
        "Books",
        [
            "novel", "story", "fiction", "literature", "author", "manuscript", "publishing",
            "biography", "poetry", "drama",
        ],
    ),
    (
        "Science",
        [
            "experiment", "discovery", "technology", "physics", "chemistry", "biology",
            "innovation", "research", "astronomy", "genetics",
        ],
    ),
    (
        "Business",
        [
            "startup", "finance", "entrepreneur", "economy", "investment", "marketing",
            "corporate", "strategy", "leadership", "commerce",
        ],
    ),
    (
        "Health",
        [
            "medical", "nutrition", "fitness", "therapy", "wellness", "mental health", "diet",
            "exercise", "treatment", "disease",
        ],
    ),
    (
        "History",
        [
            "past", "historical", "ancient", "civilization", "medieval", "renaissance", "war",
            "revolution", "archeology", "timeline",
        ],
    ),
];

/// Analytics output for one document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    /// Audience-insight score per retained genre
    pub genres: BTreeMap<String, u32>,

    /// Random 1–5 rating, independent of the text
    pub marketability_score: u8,

    /// Mean of the retained genres' scores, rounded to an integer
    pub average_audience_insight: u32,
}

/// Ranks genres by how many of their keywords occur in `text` as literal
/// substrings; genres without a hit are dropped and at most
/// [`TOP_GENRES`] are kept.
pub fn analyze_genre_fit(text: &str) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = GENRE_KEYWORDS
        .iter()
        .map(|(genre, keywords)| {
            let hits = keywords.iter().filter(|kw| text.contains(*kw)).count();
            (*genre, hits)
        })
        .filter(|(_, hits)| *hits > 0)
        .collect();

    // Stable sort keeps dictionary order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(TOP_GENRES)
        .map(|(genre, _)| genre.to_string())
        .collect()
}

/// Scores each retained genre from whole-word, case-insensitive keyword
/// frequency: `500 + min(90 × hits, 500)`, always within
/// [[`MIN_INSIGHT_SCORE`], [`MAX_INSIGHT_SCORE`]].
pub fn audience_insight(text: &str, genres: &[String]) -> BTreeMap<String, u32> {
    let mut scores = BTreeMap::new();

    for genre in genres {
        let Some((_, keywords)) = GENRE_KEYWORDS.iter().find(|(name, _)| name == genre) else {
            continue;
        };

        let hits: u32 = keywords
            .iter()
            .map(|kw| whole_word_count(text, kw) as u32)
            .sum();

        let score =
            MIN_INSIGHT_SCORE + (hits * INSIGHT_STEP).min(MAX_INSIGHT_SCORE - MIN_INSIGHT_SCORE);
        scores.insert(genre.clone(), score);
    }

    scores
}

/// Counts whole-word, case-insensitive occurrences of `keyword` in `text`.
fn whole_word_count(text: &str, keyword: &str) -> usize {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
    match regex::Regex::new(&pattern) {
        Ok(re) => re.find_iter(text).count(),
        Err(_) => 0,
    }
}

/// Mean of the audience-insight scores, rounded to an integer; 0 when no
/// genre matched.
pub fn average_audience_insight(scores: &BTreeMap<String, u32>) -> u32 {
    if scores.is_empty() {
        return 0;
    }

    let total: u64 = scores.values().map(|&v| v as u64).sum();
    ((total as f64) / (scores.len() as f64)).round() as u32
}

/// Uniformly random marketability rating in 1..=5.
pub fn marketability_score() -> u8 {
    rand::thread_rng().gen_range(1..=5)
}

/// Runs the full scoring pass over extracted text.
pub fn run_analytics(text: &str) -> AnalyticsReport {
    let genres = analyze_genre_fit(text);
    let genre_scores = audience_insight(text, &genres);
    let average = average_audience_insight(&genre_scores);

    AnalyticsReport {
        genres: genre_scores,
        marketability_score: marketability_score(),
        average_audience_insight: average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fiction_text_ranks_books_with_a_nonzero_score() {
        let text = "A novel is a long story, a work of fiction by a single author.";

        let genres = analyze_genre_fit(text);
        assert!(genres.contains(&"Books".to_string()));

        let scores = audience_insight(text, &genres);
        let books = scores.get("Books").copied().unwrap();
        assert!(books > MIN_INSIGHT_SCORE);
    }

    #[test]
    fn scores_stay_inside_the_band() {
        // Dense keyword repetition must cap at the top of the band, never
        // exceed it.
        let text = "novel story fiction literature author manuscript publishing biography \
                    poetry drama "
            .repeat(50);

        let genres = analyze_genre_fit(&text);
        let scores = audience_insight(&text, &genres);

        for (genre, score) in &scores {
            assert!(
                (MIN_INSIGHT_SCORE..=MAX_INSIGHT_SCORE).contains(score),
                "score for {genre} out of band: {score}"
            );
        }

        assert_eq!(scores.get("Books"), Some(&MAX_INSIGHT_SCORE));
    }

    #[test]
    fn unmatched_text_yields_no_genres() {
        let genres = analyze_genre_fit("zzz qqq xxx");
        assert!(genres.is_empty());

        let scores = audience_insight("zzz qqq xxx", &genres);
        assert!(scores.is_empty());
        assert_eq!(average_audience_insight(&scores), 0);
    }

    #[test]
    fn at_most_five_genres_are_retained() {
        // One keyword from each of the eight dictionaries.
        let text = "case study music news novel experiment startup medical past";
        let genres = analyze_genre_fit(text);
        assert_eq!(genres.len(), 5);
    }

    #[test]
    fn whole_word_matching_ignores_substrings() {
        assert_eq!(whole_word_count("the war started", "war"), 1);
        assert_eq!(whole_word_count("the warden is awards-aware", "war"), 0);
        assert_eq!(whole_word_count("War, WAR and war!", "war"), 3);
    }

    #[test]
    fn multi_word_keywords_match() {
        assert_eq!(
            whole_word_count("a thorough case study of mental health", "case study"),
            1
        );
        assert_eq!(
            whole_word_count("a thorough case study of mental health", "mental health"),
            1
        );
    }

    #[test]
    fn average_rounds_to_nearest_integer() {
        let mut scores = BTreeMap::new();
        scores.insert("Books".to_string(), 590);
        scores.insert("Science".to_string(), 501);
        // (590 + 501) / 2 = 545.5 -> 546
        assert_eq!(average_audience_insight(&scores), 546);
    }

    #[test]
    fn marketability_is_within_one_to_five() {
        for _ in 0..100 {
            let score = marketability_score();
            assert!((1..=5).contains(&score));
        }
    }

    #[test]
    fn report_serializes_in_camel_case() {
        let report = run_analytics("a novel story full of fiction");
        let json = serde_json::to_value(&report).unwrap();

        assert!(json.get("marketabilityScore").is_some());
        assert!(json.get("averageAudienceInsight").is_some());
        assert!(json["genres"].is_object());
    }
}
