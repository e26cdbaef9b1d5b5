//! Leaderboard engine for the Quizify trivia quiz
//!
//! Quiz attempts are recorded as immutable [`QuizResult`]s, kept in a
//! bounded [`ResultStore`] on top of any [`ResultStorage`] backend, and
//! ranked, filtered and summarised by the pure functions in [`ranking`].

pub mod achievement;
pub mod avatar;
pub mod format;
pub mod ranking;
pub mod result;
pub mod sample;
pub mod storage;
pub mod store;
pub mod trivia;

pub use achievement::{Achievement, Verdict};
pub use avatar::{avatar_for, avatar_index, AVATARS};
pub use format::{format_relative_date, format_time, sanitize_player_name, truncate_name};
pub use ranking::{
    aggregate, filter_by_period, filter_by_period_at, rank, Dashboard, LeaderboardSnapshot,
    LeaderboardStats, Medal, Period,
};
pub use result::{Attempt, Difficulty, InvalidResult, ParseError, QuizResult, ResultId};
pub use storage::{MemoryStorage, NullStorage, ResultStorage, StorageError, StorageResult};
pub use store::{Persistence, ResultStore, RETENTION_LIMIT, STORAGE_KEY};
pub use trivia::{Question, TriviaError, TriviaQuery, TriviaResponse};
