//! End-of-quiz achievements and result messages

use serde::Serialize;

/// Quizzes finished within this many seconds earn [`Achievement::SpeedDemon`]
pub const SPEED_DEMON_SECS: u64 = 60;

/// Badge shown on the results screen; at most one is awarded per quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Achievement {
    PerfectScore,
    QuizMaster,
    SpeedDemon,
    FirstTimer,
}

impl Achievement {
    /// The highest-priority achievement earned, if any
    ///
    /// `first_attempt` should be checked before the result is appended.
    pub fn earned(percentage: u8, time_taken_secs: u64, first_attempt: bool) -> Option<Self> {
        if percentage == 100 {
            Some(Achievement::PerfectScore)
        } else if percentage >= 90 {
            Some(Achievement::QuizMaster)
        } else if time_taken_secs <= SPEED_DEMON_SECS {
            Some(Achievement::SpeedDemon)
        } else if first_attempt {
            Some(Achievement::FirstTimer)
        } else {
            None
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Achievement::PerfectScore => "🏆 Perfect Score!",
            Achievement::QuizMaster => "🌟 Quiz Master",
            Achievement::SpeedDemon => "⚡ Speed Demon",
            Achievement::FirstTimer => "🎯 First Timer",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Achievement::PerfectScore => "You got every question right!",
            Achievement::QuizMaster => "90% or higher!",
            Achievement::SpeedDemon => "Completed in under 1 minute!",
            Achievement::FirstTimer => "Welcome to Quizify!",
        }
    }
}

/// Overall verdict on a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    Excellent,
    Good,
    Fair,
    KeepPracticing,
}

impl Verdict {
    pub fn for_percentage(percentage: u8) -> Self {
        match percentage {
            80.. => Verdict::Excellent,
            60..=79 => Verdict::Good,
            40..=59 => Verdict::Fair,
            _ => Verdict::KeepPracticing,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Verdict::Excellent => "🎉 Excellent work! You're a trivia master!",
            Verdict::Good => "👍 Good job! Well done!",
            Verdict::Fair => "📚 Not bad, but there's room for improvement!",
            Verdict::KeepPracticing => "💪 Keep studying and try again! Practice makes perfect!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_achievement_priority() {
        assert_eq!(Achievement::earned(100, 10, true), Some(Achievement::PerfectScore));
        assert_eq!(Achievement::earned(90, 10, true), Some(Achievement::QuizMaster));
        assert_eq!(Achievement::earned(50, 60, true), Some(Achievement::SpeedDemon));
        assert_eq!(Achievement::earned(50, 61, true), Some(Achievement::FirstTimer));
        assert_eq!(Achievement::earned(50, 61, false), None);
    }

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(Verdict::for_percentage(100), Verdict::Excellent);
        assert_eq!(Verdict::for_percentage(80), Verdict::Excellent);
        assert_eq!(Verdict::for_percentage(79), Verdict::Good);
        assert_eq!(Verdict::for_percentage(60), Verdict::Good);
        assert_eq!(Verdict::for_percentage(40), Verdict::Fair);
        assert_eq!(Verdict::for_percentage(39), Verdict::KeepPracticing);
        assert_eq!(Verdict::for_percentage(0), Verdict::KeepPracticing);
    }
}
