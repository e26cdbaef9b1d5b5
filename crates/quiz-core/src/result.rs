//! Quiz result records
//!
//! A [`QuizResult`] is created exactly once, when a quiz finishes, and is
//! never mutated afterwards. Its fields are private so the score/percentage
//! invariant established by [`QuizResult::record_at`] cannot be broken later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Longest player name accepted when recording an attempt
pub const MAX_NAME_LEN: usize = 20;
/// Characters that are never allowed in a player name
pub const FORBIDDEN_NAME_CHARS: [char; 5] = ['<', '>', '"', '\'', '&'];
/// Category used when the quiz did not report one
pub const DEFAULT_CATEGORY: &str = "General Knowledge";

/// Quiz difficulty as reported by the trivia API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    #[serde(alias = "Easy")]
    Easy,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "Hard")]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseError::Difficulty(s.to_string())),
        }
    }
}

/// Errors from parsing user-facing option strings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown difficulty `{0}` (expected easy, medium or hard)")]
    Difficulty(String),
    #[error("unknown period `{0}` (expected all, today, weekly or monthly)")]
    Period(String),
}

/// Reasons an attempt or a stored record is not a valid [`QuizResult`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidResult {
    #[error("player name must not be empty")]
    EmptyName,
    #[error("player name is {len} characters long (max {max})")]
    NameTooLong { len: usize, max: usize },
    #[error("player name contains forbidden character `{0}`")]
    ForbiddenCharacter(char),
    #[error("a quiz needs at least one question")]
    NoQuestions,
    #[error("score {score} exceeds the number of questions ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },
    #[error("stored percentage {stored}% does not match the score ({expected}%)")]
    PercentageMismatch { stored: u8, expected: u8 },
}

/// Unique identifier of a recorded attempt
///
/// New ids are UUID v4 strings. Older payloads stored a floating point
/// number; those are kept as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResultId(String);

impl ResultId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResultId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ResultId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// Outcome of a finished quiz, as handed over by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub player_name: String,
    pub score: u32,
    pub total_questions: u32,
    pub time_taken_seconds: u64,
    pub category: String,
    pub difficulty: Difficulty,
}

/// One completed quiz attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    id: ResultId,
    #[serde(alias = "name")]
    player_name: String,
    score: u32,
    total_questions: u32,
    percentage: u8,
    #[serde(alias = "timeTaken")]
    time_taken_seconds: u64,
    #[serde(alias = "date")]
    completed_at: DateTime<Utc>,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default)]
    difficulty: Difficulty,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl QuizResult {
    /// Record an attempt that finished just now
    pub fn record(attempt: Attempt) -> Result<Self, InvalidResult> {
        Self::record_at(attempt, Utc::now())
    }

    /// Record an attempt that finished at `completed_at`
    pub fn record_at(attempt: Attempt, completed_at: DateTime<Utc>) -> Result<Self, InvalidResult> {
        let player_name = validate_player_name(&attempt.player_name)?;
        let percentage = checked_percentage(attempt.score, attempt.total_questions)?;
        let category = match attempt.category.trim() {
            "" => default_category(),
            category => category.to_string(),
        };

        Ok(Self {
            id: ResultId::generate(),
            player_name,
            score: attempt.score,
            total_questions: attempt.total_questions,
            percentage,
            time_taken_seconds: attempt.time_taken_seconds,
            completed_at,
            category,
            difficulty: attempt.difficulty,
        })
    }

    /// Re-check the score invariant, e.g. on a record read back from storage
    pub fn validate(&self) -> Result<(), InvalidResult> {
        let expected = checked_percentage(self.score, self.total_questions)?;
        if self.percentage != expected {
            return Err(InvalidResult::PercentageMismatch {
                stored: self.percentage,
                expected,
            });
        }
        Ok(())
    }

    pub fn id(&self) -> &ResultId {
        &self.id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    pub fn time_taken_seconds(&self) -> u64 {
        self.time_taken_seconds
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

/// `round(score / total * 100)`, rounding halves up
///
/// Returns `None` when there are no questions or the score is out of range.
pub fn percentage(score: u32, total_questions: u32) -> Option<u8> {
    if total_questions == 0 || score > total_questions {
        return None;
    }
    let (score, total) = (u64::from(score), u64::from(total_questions));
    Some(((200 * score + total) / (2 * total)) as u8)
}

fn checked_percentage(score: u32, total_questions: u32) -> Result<u8, InvalidResult> {
    if total_questions == 0 {
        return Err(InvalidResult::NoQuestions);
    }
    percentage(score, total_questions).ok_or(InvalidResult::ScoreExceedsTotal {
        score,
        total: total_questions,
    })
}

/// Trim a player name and check it against the length limit and allow-list
pub fn validate_player_name(raw: &str) -> Result<String, InvalidResult> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(InvalidResult::EmptyName);
    }

    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(InvalidResult::NameTooLong {
            len,
            max: MAX_NAME_LEN,
        });
    }

    if let Some(c) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(InvalidResult::ForbiddenCharacter(c));
    }

    Ok(name.to_string())
}
