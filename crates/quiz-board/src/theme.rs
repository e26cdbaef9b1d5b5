use crossterm::style::Color;
use quiz_core::Medal;

/// Color theme for the terminal leaderboard
#[derive(Debug, Clone)]
pub struct Theme {
    /// Default text color
    pub fg: Color,
    /// Secondary text (dates, categories, hints)
    pub muted: Color,
    /// Titles and percentages
    pub accent: Color,
    pub gold: Color,
    pub silver: Color,
    pub bronze: Color,
    /// Achievements and confirmations
    pub success: Color,
    /// Problems the user should know about
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            muted: Color::Rgb { r: 160, g: 165, b: 185 },
            accent: Color::Rgb { r: 80, g: 180, b: 255 },
            gold: Color::Rgb { r: 255, g: 210, b: 100 },
            silver: Color::Rgb { r: 200, g: 205, b: 215 },
            bronze: Color::Rgb { r: 205, g: 127, b: 50 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
        }
    }

    /// Terminal default colors only, for pipes and `--no-color`
    pub fn plain() -> Self {
        Self {
            fg: Color::Reset,
            muted: Color::Reset,
            accent: Color::Reset,
            gold: Color::Reset,
            silver: Color::Reset,
            bronze: Color::Reset,
            success: Color::Reset,
            error: Color::Reset,
        }
    }

    pub fn medal(&self, medal: Medal) -> Color {
        match medal {
            Medal::Gold => self.gold,
            Medal::Silver => self.silver,
            Medal::Bronze => self.bronze,
        }
    }
}
