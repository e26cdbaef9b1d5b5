//! Demo leaderboard data

use crate::result::{Attempt, Difficulty, QuizResult, MAX_NAME_LEN};
use chrono::{DateTime, TimeDelta, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

const SAMPLE_NAMES: [&str; 10] = [
    "Alice Johnson",
    "Bob Smith",
    "Carol Davis",
    "David Wilson",
    "Emma Brown",
    "Frank Miller",
    "Grace Lee",
    "Henry Taylor",
    "Ivy Chen",
    "Jack Thompson",
];

const SAMPLE_CATEGORIES: [&str; 5] = ["General Knowledge", "Science", "History", "Geography", "Sports"];

/// Questions per sample quiz
pub const SAMPLE_QUESTIONS: u32 = 10;

/// Generate `count` plausible results from the 30 days before `now`
pub fn sample_results<R: Rng + ?Sized>(rng: &mut R, count: usize, now: DateTime<Utc>) -> Vec<QuizResult> {
    let results: Vec<QuizResult> = (0..count)
        .filter_map(|i| {
            let name = SAMPLE_NAMES.choose(&mut *rng).copied().unwrap_or("Player");
            let attempt = Attempt {
                player_name: sample_name(name, i + 1),
                score: rng.gen_range(1..=SAMPLE_QUESTIONS),
                total_questions: SAMPLE_QUESTIONS,
                time_taken_seconds: rng.gen_range(30..210),
                category: SAMPLE_CATEGORIES
                    .choose(&mut *rng)
                    .copied()
                    .unwrap_or_default()
                    .to_string(),
                difficulty: Difficulty::ALL.choose(&mut *rng).copied().unwrap_or_default(),
            };
            let completed_at = now - TimeDelta::days(rng.gen_range(0..30));
            QuizResult::record_at(attempt, completed_at).ok()
        })
        .collect();

    if results.len() < count {
        warn!(requested = count, generated = results.len(), "some sample results were invalid");
    }
    results
}

/// `<base>_<n>`, shortening `base` so the whole name stays a valid player name
fn sample_name(base: &str, n: usize) -> String {
    let suffix = format!("_{}", n);
    let room = MAX_NAME_LEN.saturating_sub(suffix.len());
    let base: String = base.chars().take(room).collect();
    format!("{}{}", base.trim_end(), suffix)
}
