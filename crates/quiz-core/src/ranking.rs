//! Leaderboard ranking, time-window filtering and dashboard statistics
//!
//! Everything here is a pure function of its input. Filtering always hands
//! its output to [`rank`], so callers never see an unranked subset.

use crate::result::{ParseError, QuizResult, ResultId};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Time window a leaderboard view is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Every stored result
    #[default]
    All,
    /// Results completed on the current calendar date (evaluator's time zone)
    Today,
    /// Rolling 7 × 24h window
    Weekly,
    /// Rolling 30 × 24h window
    Monthly,
}

impl Period {
    pub const VARIANTS: [Period; 4] = [Period::All, Period::Today, Period::Weekly, Period::Monthly];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::All => "all",
            Period::Today => "today",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }

    /// Heading shown above a filtered leaderboard
    pub fn label(self) -> &'static str {
        match self {
            Period::All => "All Time",
            Period::Today => "Today",
            Period::Weekly => "This Week",
            Period::Monthly => "This Month",
        }
    }

    /// Length of the rolling window, if this period is one
    pub fn window(self) -> Option<TimeDelta> {
        match self {
            Period::Weekly => Some(TimeDelta::days(7)),
            Period::Monthly => Some(TimeDelta::days(30)),
            Period::All | Period::Today => None,
        }
    }

    /// Whether a result completed at `completed_at` falls inside this period
    pub fn contains<Tz: TimeZone>(self, completed_at: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
        match self {
            Period::All => true,
            Period::Today => {
                completed_at.with_timezone(&now.timezone()).date_naive() == now.date_naive()
            }
            Period::Weekly | Period::Monthly => match self.window() {
                Some(window) => completed_at >= now.with_timezone(&Utc) - window,
                None => true,
            },
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "all-time" => Ok(Period::All),
            "today" | "day" => Ok(Period::Today),
            "weekly" | "week" => Ok(Period::Weekly),
            "monthly" | "month" => Ok(Period::Monthly),
            _ => Err(ParseError::Period(s.to_string())),
        }
    }
}

/// Podium place for the top three of a leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Medal for a 1-based leaderboard position
    pub fn for_position(position: usize) -> Option<Medal> {
        match position {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Medal::Gold => "🥇",
            Medal::Silver => "🥈",
            Medal::Bronze => "🥉",
        }
    }
}

/// Leaderboard order: higher percentage first, then faster completion
pub fn compare(a: &QuizResult, b: &QuizResult) -> Ordering {
    b.percentage()
        .cmp(&a.percentage())
        .then_with(|| a.time_taken_seconds().cmp(&b.time_taken_seconds()))
}

/// Rank results. The sort is stable: exact ties keep their input order.
pub fn rank<I>(records: I) -> LeaderboardSnapshot
where
    I: IntoIterator<Item = QuizResult>,
{
    let mut entries: Vec<QuizResult> = records.into_iter().collect();
    entries.sort_by(compare);
    LeaderboardSnapshot { entries }
}

/// Keep the results inside `period` (relative to the local clock) and rank them
pub fn filter_by_period(records: &[QuizResult], period: Period) -> LeaderboardSnapshot {
    filter_by_period_at(records, period, &Local::now())
}

/// Keep the results inside `period` relative to `now` and rank them
///
/// `Period::Today` compares calendar dates in `now`'s time zone.
pub fn filter_by_period_at<Tz: TimeZone>(
    records: &[QuizResult],
    period: Period,
    now: &DateTime<Tz>,
) -> LeaderboardSnapshot {
    rank(
        records
            .iter()
            .filter(|r| period.contains(r.completed_at(), now))
            .cloned(),
    )
}

/// Ranked, ephemeral view over a set of results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LeaderboardSnapshot {
    entries: Vec<QuizResult>,
}

impl LeaderboardSnapshot {
    pub fn entries(&self) -> &[QuizResult] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<QuizResult> {
        self.entries
    }

    /// Entries paired with their 1-based position
    pub fn standings(&self) -> impl Iterator<Item = (usize, &QuizResult)> {
        self.entries.iter().enumerate().map(|(i, e)| (i + 1, e))
    }

    /// The top three entries with their medals
    pub fn podium(&self) -> impl Iterator<Item = (Medal, &QuizResult)> {
        self.standings()
            .map_while(|(pos, e)| Medal::for_position(pos).map(|medal| (medal, e)))
    }

    /// 1-based position of a specific result
    pub fn position_of(&self, id: &ResultId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id).map(|i| i + 1)
    }

    /// 1-based position of a player's best result
    pub fn player_rank(&self, player_name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.player_name() == player_name)
            .map(|i| i + 1)
    }
}

impl Deref for LeaderboardSnapshot {
    type Target = [QuizResult];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl IntoIterator for LeaderboardSnapshot {
    type Item = QuizResult;
    type IntoIter = std::vec::IntoIter<QuizResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Summary figures for a leaderboard view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardStats {
    pub count: usize,
    pub max_percentage: u8,
    pub mean_percentage_rounded: u8,
}

/// Count, best and mean (rounded half up) percentage; all zero when empty
pub fn aggregate(records: &[QuizResult]) -> LeaderboardStats {
    if records.is_empty() {
        return LeaderboardStats::default();
    }

    let count = records.len();
    let max_percentage = records.iter().map(QuizResult::percentage).max().unwrap_or(0);
    let sum: u64 = records.iter().map(|r| u64::from(r.percentage())).sum();
    let n = count as u64;

    LeaderboardStats {
        count,
        max_percentage,
        mean_percentage_rounded: ((2 * sum + n) / (2 * n)) as u8,
    }
}

/// A filtered leaderboard together with statistics over the same entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub period: Period,
    pub snapshot: LeaderboardSnapshot,
    pub stats: LeaderboardStats,
}

impl Dashboard {
    pub fn build(records: &[QuizResult], period: Period) -> Self {
        Self::build_at(records, period, &Local::now())
    }

    pub fn build_at<Tz: TimeZone>(records: &[QuizResult], period: Period, now: &DateTime<Tz>) -> Self {
        let snapshot = filter_by_period_at(records, period, now);
        let stats = aggregate(&snapshot);
        Self {
            period,
            snapshot,
            stats,
        }
    }
}
