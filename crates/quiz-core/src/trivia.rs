//! Open Trivia DB request and response model
//!
//! Fetching is the front-end's job; this module only builds the request URL,
//! decodes the payload and maps API status codes to user-facing errors.

use crate::result::Difficulty;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const API_URL: &str = "https://opentdb.com/api.php";
/// Open Trivia DB "General Knowledge"
pub const GENERAL_KNOWLEDGE: u32 = 9;

/// Failures surfaced to the player while loading questions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriviaError {
    #[error("HTTP error! status: {0}")]
    Http(u16),
    #[error("Not enough questions available. Try a different category.")]
    InsufficientQuestions,
    #[error("Invalid parameter in API request.")]
    InvalidParameter,
    #[error("Token error. Please try again.")]
    Token,
    #[error("Unknown API error occurred.")]
    Unknown(i64),
}

impl TriviaError {
    /// Error for an API `response_code`; `None` for success (0)
    pub fn from_response_code(code: i64) -> Option<Self> {
        match code {
            0 => None,
            1 => Some(TriviaError::InsufficientQuestions),
            2 => Some(TriviaError::InvalidParameter),
            3 | 4 => Some(TriviaError::Token),
            other => Some(TriviaError::Unknown(other)),
        }
    }
}

/// Parameters of a question request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaQuery {
    pub amount: u8,
    pub category: Option<u32>,
    pub difficulty: Option<Difficulty>,
}

impl Default for TriviaQuery {
    fn default() -> Self {
        Self {
            amount: 10,
            category: Some(GENERAL_KNOWLEDGE),
            difficulty: Some(Difficulty::Easy),
        }
    }
}

impl TriviaQuery {
    /// Request URL for multiple-choice questions
    pub fn url(&self) -> String {
        let mut url = format!("{}?amount={}", API_URL, self.amount);
        if let Some(category) = self.category {
            url.push_str(&format!("&category={}", category));
        }
        if let Some(difficulty) = self.difficulty {
            url.push_str(&format!("&difficulty={}", difficulty));
        }
        url.push_str("&type=multiple");
        url
    }
}

/// Raw API payload
#[derive(Debug, Clone, Deserialize)]
pub struct TriviaResponse {
    pub response_code: i64,
    #[serde(default)]
    pub results: Vec<TriviaItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriviaItem {
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// A question ready to be asked, options already shuffled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub category: String,
    pub difficulty: Difficulty,
}

impl Question {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct
    }
}

impl TriviaResponse {
    /// Check the status code and turn each item into a [`Question`]
    pub fn into_questions<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Vec<Question>, TriviaError> {
        if let Some(err) = TriviaError::from_response_code(self.response_code) {
            return Err(err);
        }

        let questions = self
            .results
            .into_iter()
            .map(|item| {
                let mut options: Vec<(bool, String)> = item
                    .incorrect_answers
                    .into_iter()
                    .map(|answer| (false, answer))
                    .collect();
                options.push((true, item.correct_answer));
                options.shuffle(&mut *rng);

                let correct = options.iter().position(|(is_correct, _)| *is_correct).unwrap_or(0);
                Question {
                    prompt: item.question,
                    options: options.into_iter().map(|(_, text)| text).collect(),
                    correct,
                    category: item.category,
                    difficulty: item.difficulty,
                }
            })
            .collect();

        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const PAYLOAD: &str = r#"{
        "response_code": 0,
        "results": [
            {
                "type": "multiple",
                "difficulty": "easy",
                "category": "General Knowledge",
                "question": "What is the capital of France?",
                "correct_answer": "Paris",
                "incorrect_answers": ["Lyon", "Marseille", "Nice"]
            }
        ]
    }"#;

    #[test]
    fn test_default_query_url() {
        assert_eq!(
            TriviaQuery::default().url(),
            "https://opentdb.com/api.php?amount=10&category=9&difficulty=easy&type=multiple"
        );

        let any = TriviaQuery {
            amount: 5,
            category: None,
            difficulty: None,
        };
        assert_eq!(any.url(), "https://opentdb.com/api.php?amount=5&type=multiple");
    }

    #[test]
    fn test_into_questions_tracks_correct_answer() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let response: TriviaResponse = serde_json::from_str(PAYLOAD).unwrap();
            let questions = response.into_questions(&mut rng).unwrap();
            assert_eq!(questions.len(), 1);

            let q = &questions[0];
            assert_eq!(q.options.len(), 4);
            assert_eq!(q.options[q.correct], "Paris");
            assert!(q.is_correct(q.correct));
        }
    }

    #[test]
    fn test_error_codes() {
        let response: TriviaResponse =
            serde_json::from_str(r#"{"response_code": 1, "results": []}"#).unwrap();
        let err = response.into_questions(&mut rand::thread_rng()).unwrap_err();
        assert_eq!(err, TriviaError::InsufficientQuestions);
        assert_eq!(
            err.to_string(),
            "Not enough questions available. Try a different category."
        );

        assert_eq!(TriviaError::from_response_code(0), None);
        assert_eq!(TriviaError::from_response_code(2), Some(TriviaError::InvalidParameter));
        assert_eq!(TriviaError::from_response_code(3), Some(TriviaError::Token));
        assert_eq!(TriviaError::from_response_code(4), Some(TriviaError::Token));
        assert_eq!(TriviaError::from_response_code(5), Some(TriviaError::Unknown(5)));
    }
}
