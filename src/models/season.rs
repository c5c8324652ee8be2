use serde::{Deserialize, Serialize};

/// Token used in bloom descriptors for plants that flower year-round.
pub const ALL_SEASONS_TOKEN: &str = "四季";

/// The four seasons in canonical cyclic order. Winter wraps back to Spring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn all() -> &'static [Season] {
        &[
            Season::Spring,
            Season::Summer,
            Season::Autumn,
            Season::Winter,
        ]
    }

    /// Token as stored in the plant database.
    pub fn token(&self) -> &'static str {
        match self {
            Season::Spring => "春",
            Season::Summer => "夏",
            Season::Autumn => "秋",
            Season::Winter => "冬",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }

    /// Position in the cyclic order, Spring = 0.
    pub fn index(&self) -> usize {
        match self {
            Season::Spring => 0,
            Season::Summer => 1,
            Season::Autumn => 2,
            Season::Winter => 3,
        }
    }

    /// Exact lookup of a database token. No trimming or aliasing.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.token() == token)
    }

    /// Lenient parse for user input: database tokens or English names.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(season) = Self::from_token(s) {
            return Some(season);
        }
        match s.to_lowercase().as_str() {
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "autumn" | "fall" => Some(Season::Autumn),
            "winter" => Some(Season::Winter),
            _ => None,
        }
    }

    /// Meteorological season for a calendar month (1-12).
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn current() -> Self {
        use chrono::Datelike;
        Self::from_month(chrono::Local::now().month())
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            Season::Spring => Color::LightGreen,
            Season::Summer => Color::Yellow,
            Season::Autumn => Color::LightRed,
            Season::Winter => Color::LightBlue,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_from_month_boundaries() {
        assert_eq!(Season::from_month(1), Season::Winter);
        assert_eq!(Season::from_month(2), Season::Winter);
        assert_eq!(Season::from_month(3), Season::Spring);
        assert_eq!(Season::from_month(5), Season::Spring);
        assert_eq!(Season::from_month(6), Season::Summer);
        assert_eq!(Season::from_month(8), Season::Summer);
        assert_eq!(Season::from_month(9), Season::Autumn);
        assert_eq!(Season::from_month(11), Season::Autumn);
        assert_eq!(Season::from_month(12), Season::Winter);
    }

    #[test]
    fn season_from_token_is_exact() {
        assert_eq!(Season::from_token("春"), Some(Season::Spring));
        assert_eq!(Season::from_token("冬"), Some(Season::Winter));
        assert_eq!(Season::from_token(" 春"), None);
        assert_eq!(Season::from_token("spring"), None);
        assert_eq!(Season::from_token(""), None);
    }

    #[test]
    fn season_from_str_accepts_names() {
        assert_eq!(Season::from_str("Spring"), Some(Season::Spring));
        assert_eq!(Season::from_str("fall"), Some(Season::Autumn));
        assert_eq!(Season::from_str(" 夏 "), Some(Season::Summer));
        assert_eq!(Season::from_str("monsoon"), None);
    }

    #[test]
    fn season_index_follows_cyclic_order() {
        for (i, season) in Season::all().iter().enumerate() {
            assert_eq!(season.index(), i);
            assert_eq!(Season::from_token(season.token()), Some(*season));
        }
    }
}
