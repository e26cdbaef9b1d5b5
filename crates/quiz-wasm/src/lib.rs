//! WebAssembly bindings for the Quizify leaderboard
//!
//! The page's JavaScript owns rendering, timers and question fetching; it
//! creates one [`Leaderboard`] and calls into it whenever a quiz finishes
//! or a leaderboard view needs refreshing.

use chrono::Utc;
use quiz_core::sample::sample_results;
use quiz_core::{
    Achievement, Attempt, Dashboard, Difficulty, MemoryStorage, Period, QuizResult,
    ResultStorage, ResultStore, TriviaQuery, TriviaResponse, Verdict,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod logging;
mod storage;


pub use storage::LocalStorage;

// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logging::init();
}

/// What the results screen needs after a quiz is recorded
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordOutcome {
    result: QuizResult,
    /// 1-based rank, absent when the result fell outside the kept top scores
    position: Option<usize>,
    verdict: Verdict,
    message: &'static str,
    achievement: Option<AchievementView>,
}

#[derive(Debug, Serialize)]
struct AchievementView {
    kind: Achievement,
    title: &'static str,
    description: &'static str,
}

impl From<Achievement> for AchievementView {
    fn from(kind: Achievement) -> Self {
        Self {
            kind,
            title: kind.title(),
            description: kind.description(),
        }
    }
}

/// Leaderboard handle owned by the page
#[wasm_bindgen]
pub struct Leaderboard {
    store: ResultStore<Box<dyn ResultStorage>>,
}

#[wasm_bindgen]
impl Leaderboard {
    /// Leaderboard backed by `localStorage`, or by memory when the browser
    /// does not provide it
    #[wasm_bindgen(constructor)]
    pub fn new() -> Leaderboard {
        let storage: Box<dyn ResultStorage> = match LocalStorage::from_window() {
            Some(storage) => Box::new(storage),
            None => {
                tracing::warn!("localStorage not available, using in-memory storage");
                Box::new(MemoryStorage::new())
            }
        };
        Leaderboard {
            store: ResultStore::new(storage),
        }
    }

    /// Leaderboard that never touches browser storage
    #[wasm_bindgen]
    pub fn in_memory() -> Leaderboard {
        let storage: Box<dyn ResultStorage> = Box::new(MemoryStorage::new());
        Leaderboard {
            store: ResultStore::new(storage),
        }
    }

    /// Name of the storage backend in use
    #[wasm_bindgen]
    pub fn backend(&self) -> String {
        self.store.storage().backend_name().to_string()
    }

    /// Record a finished quiz and return the results-screen data
    #[wasm_bindgen]
    pub fn record(
        &self,
        player_name: &str,
        score: u32,
        total_questions: u32,
        time_taken_seconds: u32,
        category: &str,
        difficulty: &str,
    ) -> Result<JsValue, JsValue> {
        let difficulty: Difficulty = difficulty.parse().unwrap_or_default();
        let attempt = Attempt {
            player_name: player_name.to_string(),
            score,
            total_questions,
            time_taken_seconds: u64::from(time_taken_seconds),
            category: category.to_string(),
            difficulty,
        };
        let result = QuizResult::record(attempt).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let achievement = Achievement::earned(
            result.percentage(),
            result.time_taken_seconds(),
            self.store.is_first_attempt(),
        );
        let ranked = self.store.append(result.clone());
        let position = ranked
            .iter()
            .position(|r| r.id() == result.id())
            .map(|i| i + 1);
        let verdict = Verdict::for_percentage(result.percentage());

        to_js(&RecordOutcome {
            result,
            position,
            verdict,
            message: verdict.message(),
            achievement: achievement.map(AchievementView::from),
        })
    }

    /// Ranked entries and statistics for `period` (`all`, `today`, `weekly`, `monthly`)
    #[wasm_bindgen]
    pub fn dashboard(&self, period: &str) -> Result<JsValue, JsValue> {
        to_js(&self.build_dashboard(period)?)
    }

    /// Same as [`Leaderboard::dashboard`], as a JSON string
    #[wasm_bindgen]
    pub fn dashboard_json(&self, period: &str) -> Result<String, JsValue> {
        serde_json::to_string(&self.build_dashboard(period)?)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Every stored result as JSON
    #[wasm_bindgen]
    pub fn results_json(&self) -> String {
        serde_json::to_string(&self.store.load()).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen]
    pub fn is_first_attempt(&self) -> bool {
        self.store.is_first_attempt()
    }

    /// Add `count` demo results; returns how many results are kept
    #[wasm_bindgen]
    pub fn seed_demo(&self, count: usize) -> usize {
        let samples = sample_results(&mut rand::thread_rng(), count, Utc::now());
        self.store.extend(samples).len()
    }

    /// Forget every stored result; false if storage refused
    #[wasm_bindgen]
    pub fn clear(&self) -> bool {
        self.store.clear() == quiz_core::Persistence::Persisted
    }

    fn build_dashboard(&self, period: &str) -> Result<Dashboard, JsValue> {
        let period: Period = period
            .parse()
            .map_err(|e: quiz_core::ParseError| JsValue::from_str(&e.to_string()))?;
        Ok(self.store.dashboard(period))
    }
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Avatar emoji for a player name, stable across sessions
#[wasm_bindgen]
pub fn avatar(name: &str) -> String {
    quiz_core::avatar_for(name).to_string()
}

/// `45s` / `2m 5s`
#[wasm_bindgen]
pub fn format_time(secs: u32) -> String {
    quiz_core::format_time(u64::from(secs))
}

/// Open Trivia DB URL for the default quiz
#[wasm_bindgen]
pub fn trivia_url() -> String {
    TriviaQuery::default().url()
}

/// Turn a raw Open Trivia DB response into shuffled questions
///
/// Errors carry the message to show next to the retry button.
#[wasm_bindgen]
pub fn parse_questions(payload: &str) -> Result<JsValue, JsValue> {
    let response: TriviaResponse =
        serde_json::from_str(payload).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let questions = response
        .into_questions(&mut rand::thread_rng())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&questions)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}
