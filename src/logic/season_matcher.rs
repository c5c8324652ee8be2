//! Bloom-season matching.
//!
//! A bloom descriptor is the raw string stored per plant. It takes one of
//! these shapes, checked in this order:
//!
//! - `"冬-春"`: inclusive range along the cyclic season order, may wrap
//! - `"春,秋"` / `"春，秋"` / `"春、秋"`: any listed season
//! - `"四季"`: every season
//! - `"春"`: exactly that season
//!
//! Anything malformed simply fails to match.

use crate::models::{Season, ALL_SEASONS_TOKEN};

const RANGE_DELIMITER: char = '-';
const LIST_DELIMITERS: &[char] = &[',', '，', '、'];

/// Parsed form of a bloom descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BloomDescriptor<'a> {
    Empty,
    Range { start: &'a str, end: &'a str },
    /// A range that doesn't split into exactly two endpoints.
    MalformedRange,
    List(Vec<&'a str>),
    AllSeasons,
    Single(&'a str),
}

impl<'a> BloomDescriptor<'a> {
    pub fn parse(raw: &'a str) -> Self {
        if raw.is_empty() {
            return BloomDescriptor::Empty;
        }

        // Range wins over list even if both delimiters are present.
        if raw.contains(RANGE_DELIMITER) {
            let mut parts = raw.split(RANGE_DELIMITER);
            return match (parts.next(), parts.next(), parts.next()) {
                (Some(start), Some(end), None) => BloomDescriptor::Range {
                    start: start.trim(),
                    end: end.trim(),
                },
                _ => BloomDescriptor::MalformedRange,
            };
        }

        if raw.contains(LIST_DELIMITERS) {
            return BloomDescriptor::List(raw.split(LIST_DELIMITERS).map(str::trim).collect());
        }

        let trimmed = raw.trim();
        if trimmed == ALL_SEASONS_TOKEN {
            BloomDescriptor::AllSeasons
        } else {
            BloomDescriptor::Single(trimmed)
        }
    }

    pub fn matches(&self, target: Season) -> bool {
        match self {
            BloomDescriptor::Empty | BloomDescriptor::MalformedRange => false,
            BloomDescriptor::Range { start, end } => range_contains(start, end, target),
            BloomDescriptor::List(tokens) => tokens.iter().any(|t| *t == target.token()),
            BloomDescriptor::AllSeasons => true,
            BloomDescriptor::Single(token) => *token == target.token(),
        }
    }
}

fn range_contains(start: &str, end: &str, target: Season) -> bool {
    let (Some(s), Some(e)) = (Season::from_token(start), Season::from_token(end)) else {
        return false;
    };
    let (s, e, c) = (s.index(), e.index(), target.index());

    if s <= e {
        s <= c && c <= e
    } else {
        c >= s || c <= e
    }
}

/// True if a plant with this bloom descriptor flowers in `target`.
pub fn matches(descriptor: &str, target: Season) -> bool {
    BloomDescriptor::parse(descriptor).matches(target)
}

/// Same as [`matches`], treating an absent descriptor as empty.
pub fn matches_opt(descriptor: Option<&str>, target: Season) -> bool {
    descriptor.is_some_and(|d| matches(d, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Season; 4] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ];

    #[test]
    fn empty_matches_nothing() {
        for s in ALL {
            assert!(!matches("", s));
            assert!(!matches_opt(None, s));
        }
    }

    #[test]
    fn all_seasons_token_matches_everything() {
        for s in ALL {
            assert!(matches("四季", s));
            assert!(matches(" 四季 ", s));
        }
    }

    #[test]
    fn single_season() {
        assert!(matches("春", Season::Spring));
        assert!(!matches("春", Season::Summer));
        assert!(matches(" 秋 ", Season::Autumn));
    }

    #[test]
    fn list_of_seasons() {
        assert!(matches("春,秋", Season::Spring));
        assert!(matches("春,秋", Season::Autumn));
        assert!(!matches("春,秋", Season::Summer));
        assert!(matches("春，夏", Season::Summer));
        assert!(matches("春、 夏", Season::Summer));
        assert!(!matches("春、夏", Season::Winter));
    }

    #[test]
    fn wrapping_range() {
        assert!(matches("冬-春", Season::Winter));
        assert!(matches("冬-春", Season::Spring));
        assert!(!matches("冬-春", Season::Summer));
        assert!(!matches("冬-春", Season::Autumn));
        assert!(matches("秋-夏", Season::Winter));
        assert!(!matches("秋 - 春", Season::Summer));
    }

    #[test]
    fn forward_range() {
        assert!(matches("春-秋", Season::Spring));
        assert!(matches("春-秋", Season::Summer));
        assert!(matches("春-秋", Season::Autumn));
        assert!(!matches("春-秋", Season::Winter));
        assert!(matches("夏-夏", Season::Summer));
        assert!(!matches("夏-夏", Season::Autumn));
    }

    #[test]
    fn unrecognized_range_fails_closed() {
        for s in ALL {
            assert!(!matches("unknown-token", s));
            assert!(!matches("春-", s));
            assert!(!matches("春-夏-秋", s));
        }
    }

    #[test]
    fn range_takes_precedence_over_list() {
        assert_eq!(
            BloomDescriptor::parse("春-夏,秋"),
            BloomDescriptor::Range {
                start: "春",
                end: "夏,秋"
            }
        );
        assert!(!matches("春-夏,秋", Season::Spring));
        assert!(!matches("春-夏,秋", Season::Autumn));
    }

    #[test]
    fn unknown_single_token_does_not_match() {
        for s in ALL {
            assert!(!matches("Spring", s));
            assert!(!matches("全年", s));
        }
    }

    #[test]
    fn repeated_calls_agree() {
        for descriptor in ["", "四季", "春", "春,秋", "冬-春", "春-秋", "x-y"] {
            for s in ALL {
                let first = matches(descriptor, s);
                for _ in 0..3 {
                    assert_eq!(matches(descriptor, s), first);
                }
            }
        }
    }
}
