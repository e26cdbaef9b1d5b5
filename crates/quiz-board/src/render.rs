use crate::theme::Theme;
use chrono::{DateTime, TimeZone};
use crossterm::{
    queue,
    style::{Print, ResetColor, SetForegroundColor},
};
use quiz_core::format::DISPLAY_NAME_LEN;
use quiz_core::{
    avatar_for, format_relative_date, format_time, truncate_name, Achievement, Dashboard,
    LeaderboardStats, Medal, Period, QuizResult, Verdict,
};
use std::io::{self, Write};

fn render_title<W: Write>(out: &mut W, title: &str, theme: &Theme) -> io::Result<()> {
    queue!(
        out,
        SetForegroundColor(theme.accent),
        Print(format!("═══ {} ═══\n\n", title))
    )
}

/// Podium, ranked table and summary for one period
pub fn render_leaderboard<W: Write, Tz: TimeZone>(
    out: &mut W,
    dashboard: &Dashboard,
    limit: usize,
    theme: &Theme,
    now: &DateTime<Tz>,
) -> io::Result<()> {
    render_title(out, &format!("LEADERBOARD · {}", dashboard.period.label()), theme)?;

    if dashboard.snapshot.is_empty() {
        queue!(
            out,
            SetForegroundColor(theme.muted),
            Print("No quiz results found for the selected time period.\n"),
            Print("Complete a quiz to claim the throne!\n"),
            ResetColor
        )?;
        return out.flush();
    }

    for (medal, entry) in dashboard.snapshot.podium() {
        queue!(
            out,
            SetForegroundColor(theme.medal(medal)),
            Print(format!(
                "{} {} {}  {}%  ({}/{} in {})\n",
                medal.emoji(),
                avatar_for(entry.player_name()),
                truncate_name(entry.player_name(), DISPLAY_NAME_LEN),
                entry.percentage(),
                entry.score(),
                entry.total_questions(),
                format_time(entry.time_taken_seconds()),
            ))
        )?;
    }
    queue!(out, Print("\n"))?;

    for (position, entry) in dashboard.snapshot.standings().take(limit) {
        render_row(out, position, entry, theme, now)?;
    }

    let hidden = dashboard.snapshot.len().saturating_sub(limit);
    if hidden > 0 {
        queue!(
            out,
            SetForegroundColor(theme.muted),
            Print(format!("     ... and {} more\n", hidden))
        )?;
    }

    queue!(out, Print("\n"))?;
    render_stats(out, dashboard.period, &dashboard.stats, theme)
}

fn render_row<W: Write, Tz: TimeZone>(
    out: &mut W,
    position: usize,
    entry: &QuizResult,
    theme: &Theme,
    now: &DateTime<Tz>,
) -> io::Result<()> {
    let rank_color = Medal::for_position(position)
        .map(|m| theme.medal(m))
        .unwrap_or(theme.fg);
    let name = truncate_name(entry.player_name(), DISPLAY_NAME_LEN);

    queue!(
        out,
        SetForegroundColor(rank_color),
        Print(format!("{:>3}. ", position)),
        SetForegroundColor(theme.fg),
        Print(format!(
            "{} {:<18} {:>5}  {:>7}  ",
            avatar_for(entry.player_name()),
            name,
            format!("{}/{}", entry.score(), entry.total_questions()),
            format_time(entry.time_taken_seconds()),
        )),
        SetForegroundColor(theme.muted),
        Print(format!(
            "{:<12} {:<18} ",
            format_relative_date(entry.completed_at(), now),
            entry.category(),
        )),
        SetForegroundColor(theme.accent),
        Print(format!("{:>4}%\n", entry.percentage()))
    )
}

/// Dashboard figures for one period
pub fn render_stats<W: Write>(
    out: &mut W,
    period: Period,
    stats: &LeaderboardStats,
    theme: &Theme,
) -> io::Result<()> {
    queue!(
        out,
        SetForegroundColor(theme.muted),
        Print(format!("{}: ", period.label())),
        SetForegroundColor(theme.fg),
        Print(format!(
            "{} players · highest {}% · average {}%\n",
            stats.count, stats.max_percentage, stats.mean_percentage_rounded
        )),
        ResetColor
    )?;
    out.flush()
}

/// Results screen after recording an attempt
///
/// `position` is the 1-based rank in the retained leaderboard, `None` if
/// the result did not make the cut.
pub fn render_recorded<W: Write>(
    out: &mut W,
    result: &QuizResult,
    position: Option<usize>,
    achievement: Option<Achievement>,
    theme: &Theme,
) -> io::Result<()> {
    queue!(
        out,
        SetForegroundColor(theme.fg),
        Print(format!(
            "{}, you scored {}/{} ({}%) in {}\n",
            result.player_name(),
            result.score(),
            result.total_questions(),
            result.percentage(),
            format_time(result.time_taken_seconds()),
        )),
        SetForegroundColor(theme.accent),
        Print(format!("{}\n", Verdict::for_percentage(result.percentage()).message()))
    )?;

    if let Some(achievement) = achievement {
        queue!(
            out,
            SetForegroundColor(theme.success),
            Print(format!("{} - {}\n", achievement.title(), achievement.description()))
        )?;
    }

    match position {
        Some(position) => queue!(
            out,
            SetForegroundColor(theme.fg),
            Print(format!("You are #{} on the leaderboard\n", position))
        )?,
        None => queue!(
            out,
            SetForegroundColor(theme.muted),
            Print("Not in the top scores this time\n")
        )?,
    }

    queue!(out, ResetColor)?;
    out.flush()
}

/// Something the user should know went wrong
pub fn render_warning<W: Write>(out: &mut W, message: &str, theme: &Theme) -> io::Result<()> {
    queue!(
        out,
        SetForegroundColor(theme.error),
        Print(format!("Warning: {}\n", message)),
        ResetColor
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use quiz_core::{Attempt, Difficulty};

    fn result(name: &str, score: u32, time: u64, completed_at: DateTime<Utc>) -> QuizResult {
        QuizResult::record_at(
            Attempt {
                player_name: name.to_string(),
                score,
                total_questions: 10,
                time_taken_seconds: time,
                category: "History".to_string(),
                difficulty: Difficulty::Easy,
            },
            completed_at,
        )
        .unwrap()
    }

    fn output(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_render_empty_leaderboard() {
        let now = Utc::now();
        let dashboard = Dashboard::build_at(&[], Period::Today, &now);
        let text = output(|out| render_leaderboard(out, &dashboard, 10, &Theme::plain(), &now));

        assert!(text.contains("LEADERBOARD · Today"));
        assert!(text.contains("No quiz results found"));
    }

    #[test]
    fn test_render_leaderboard_rows() {
        let now = Utc::now();
        let records = vec![
            result("Alice Johnson_12", 7, 95, now - TimeDelta::days(1)),
            result("Bob", 9, 40, now),
            result("Carol", 3, 200, now - TimeDelta::days(3)),
        ];
        let dashboard = Dashboard::build_at(&records, Period::All, &now);
        let text = output(|out| render_leaderboard(out, &dashboard, 2, &Theme::plain(), &now));

        assert!(text.contains("🥇"));
        assert!(text.contains("Alice Johnson_1..."));
        assert!(text.contains("1m 35s"));
        assert!(text.contains("Yesterday"));
        assert!(text.contains("... and 1 more"));
        assert!(text.contains("3 players · highest 90% · average 63%"));

        let bob = text.find("Bob").unwrap();
        let alice = text.find("Alice").unwrap();
        assert!(bob < alice);
    }

    #[test]
    fn test_render_recorded() {
        let r = result("Ada", 10, 30, Utc::now());
        let text = output(|out| {
            render_recorded(out, &r, Some(1), Some(Achievement::PerfectScore), &Theme::plain())
        });

        assert!(text.contains("Ada, you scored 10/10 (100%) in 30s"));
        assert!(text.contains("Excellent work"));
        assert!(text.contains("Perfect Score"));
        assert!(text.contains("You are #1 on the leaderboard"));

        let text = output(|out| render_recorded(out, &r, None, None, &Theme::plain()));
        assert!(text.contains("Not in the top scores this time"));
    }

    #[test]
    fn test_render_warning() {
        let text = output(|out| render_warning(out, "disk full", &Theme::plain()));
        assert!(text.contains("Warning: disk full"));
    }
}
