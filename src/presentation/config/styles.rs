//! Style tables
//!
//! Styles are grouped by section ("Feed", "StatusBar", ...) and written as
//! space separated specs like "bold fg:black bg:cyan". Unknown lookups fall
//! back to the default style so a sparse user config never panics a render.

use std::collections::HashMap;

use derive_deref::{Deref, DerefMut};
use ratatui::style::{Color, Modifier, Style};
use serde::de::Deserializer;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct Styles(pub HashMap<String, HashMap<String, Style>>);

impl Styles {
    pub fn style(&self, section: &str, name: &str) -> Style {
        self.0
            .get(section)
            .and_then(|section| section.get(name))
            .copied()
            .unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for Styles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<String, HashMap<String, String>>::deserialize(deserializer)?;

        let styles = parsed_map
            .into_iter()
            .map(|(section, inner_map)| {
                let converted_inner_map = inner_map
                    .into_iter()
                    .map(|(name, spec)| (name, parse_style(&spec)))
                    .collect();
                (section, converted_inner_map)
            })
            .collect();

        Ok(Self(styles))
    }
}

/// Parse a spec like "bold fg:black bg:cyan". Unrecognized words are
/// ignored rather than rejected.
pub fn parse_style(spec: &str) -> Style {
    let mut style = Style::default();
    for word in spec.split_whitespace() {
        if let Some(color) = word.strip_prefix("fg:") {
            if let Some(color) = parse_color(color) {
                style = style.fg(color);
            }
        } else if let Some(color) = word.strip_prefix("bg:") {
            if let Some(color) = parse_color(color) {
                style = style.bg(color);
            }
        } else if let Some(modifier) = parse_modifier(word) {
            style = style.add_modifier(modifier);
        }
    }
    style
}

fn parse_modifier(word: &str) -> Option<Modifier> {
    match word {
        "bold" => Some(Modifier::BOLD),
        "dim" => Some(Modifier::DIM),
        "italic" => Some(Modifier::ITALIC),
        "underline" => Some(Modifier::UNDERLINED),
        "reversed" => Some(Modifier::REVERSED),
        "crossed-out" => Some(Modifier::CROSSED_OUT),
        _ => None,
    }
}

fn parse_color(word: &str) -> Option<Color> {
    match word {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" => Some(Color::Gray),
        "dark-gray" => Some(Color::DarkGray),
        "light-red" => Some(Color::LightRed),
        "light-green" => Some(Color::LightGreen),
        "light-yellow" => Some(Color::LightYellow),
        "light-blue" => Some(Color::LightBlue),
        "light-magenta" => Some(Color::LightMagenta),
        "light-cyan" => Some(Color::LightCyan),
        hex if hex.starts_with('#') && hex.len() == 7 => {
            let r = u8::from_str_radix(&hex[1..3], 16).ok()?;
            let g = u8::from_str_radix(&hex[3..5], 16).ok()?;
            let b = u8::from_str_radix(&hex[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_style_full_spec() {
        assert_eq!(
            parse_style("bold fg:black bg:cyan"),
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Black)
                .bg(Color::Cyan)
        );
    }

    #[test]
    fn test_parse_style_ignores_unknown_words() {
        assert_eq!(parse_style("sparkly fg:red"), Style::default().fg(Color::Red));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_style("fg:#1a2b3c"),
            Style::default().fg(Color::Rgb(0x1a, 0x2b, 0x3c))
        );
    }

    #[test]
    fn test_missing_lookup_falls_back_to_default() {
        let styles = Styles::default();
        assert_eq!(styles.style("Feed", "selected"), Style::default());
    }

    #[test]
    fn test_deserialize_table() {
        let styles: Styles = json5::from_str(
            r#"{
                "StatusBar": { "error": "fg:white bg:red" },
            }"#,
        )
        .unwrap();

        assert_eq!(
            styles.style("StatusBar", "error"),
            Style::default().fg(Color::White).bg(Color::Red)
        );
    }
}
