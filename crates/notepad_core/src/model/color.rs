//! Background color values.
//!
//! # Invariants
//! - A `NoteColor` always holds a well-formed `#RRGGBB` string, uppercased.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color regex"));

/// Named colors offered by the editing surface, in display order.
pub const PALETTE: [(&str, &str); 12] = [
    ("Red", "#FF0000"),
    ("Green", "#00FF00"),
    ("Blue", "#0000FF"),
    ("Yellow", "#FFFF00"),
    ("Purple", "#800080"),
    ("Orange", "#FFA500"),
    ("Pink", "#FFC0CB"),
    ("Cyan", "#00FFFF"),
    ("Magenta", "#FF00FF"),
    ("Brown", "#A52A2A"),
    ("Grey", "#808080"),
    ("Teal", "#008080"),
];

/// Returns whether `value` is a `#RRGGBB` hex triplet.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteColor(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a #RRGGBB color")]
pub struct ColorParseError(pub String);

impl NoteColor {
    /// White, the color of every note created without one.
    pub fn white() -> Self {
        Self(crate::contract::DEFAULT_BACKGROUND_COLOR.to_string())
    }

    /// Looks up a palette entry by case-insensitive name.
    pub fn named(name: &str) -> Option<Self> {
        PALETTE
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(name.trim()))
            .map(|(_, hex)| Self((*hex).to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&self.0[range], 16).unwrap_or_default()
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl FromStr for NoteColor {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if !is_hex_color(trimmed) {
            return Err(ColorParseError(value.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for NoteColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NoteColor> for String {
    fn from(value: NoteColor) -> Self {
        value.0
    }
}

impl Display for NoteColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{is_hex_color, NoteColor, PALETTE};

    #[test]
    fn hex_validation_accepts_only_six_digit_triplets() {
        assert!(is_hex_color("#FFFFFF"));
        assert!(is_hex_color("#a52a2a"));
        assert!(!is_hex_color("FFFFFF"));
        assert!(!is_hex_color("#FFF"));
        assert!(!is_hex_color("#GGGGGG"));
        assert!(!is_hex_color("#FFFFFF "));
    }

    #[test]
    fn parse_normalizes_case() {
        let color: NoteColor = "#a52a2a".parse().unwrap();
        assert_eq!(color.as_str(), "#A52A2A");
        assert_eq!(color.rgb(), (0xA5, 0x2A, 0x2A));
    }

    #[test]
    fn every_palette_entry_is_valid() {
        for (name, hex) in PALETTE {
            let color = NoteColor::named(name).unwrap();
            assert_eq!(color.as_str(), hex);
        }
        assert!(NoteColor::named("chartreuse").is_none());
    }
}
