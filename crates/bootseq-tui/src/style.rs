//! Phosphor palette and the style-tag to terminal-style mapping.
//!
//! Everything here is a pure function of its input. Colors are RGB so the CRT
//! overlays can dim them smoothly.

use bootseq_core::StyleTag;
use ratatui::style::{Color, Modifier, Style};

/// Screen background.
pub const BACKGROUND: Color = Color::Rgb(6, 14, 8);
/// Default phosphor green.
pub const PHOSPHOR: Color = Color::Rgb(64, 255, 110);
/// Muted phosphor for chrome and timestamps.
pub const PHOSPHOR_DIM: Color = Color::Rgb(28, 120, 52);
pub const AMBER: Color = Color::Rgb(255, 184, 28);
pub const RED: Color = Color::Rgb(255, 82, 82);
pub const CYAN: Color = Color::Rgb(96, 214, 236);
pub const HERO: Color = Color::Rgb(196, 255, 210);

/// Style for a revealed line's text.
pub fn line_style(tag: StyleTag) -> Style {
    let base = Style::default().bg(BACKGROUND);
    match tag {
        StyleTag::Normal => base.fg(PHOSPHOR),
        StyleTag::Success => base.fg(PHOSPHOR).add_modifier(Modifier::BOLD),
        StyleTag::Warning => base.fg(AMBER),
        StyleTag::Error => base.fg(RED).add_modifier(Modifier::BOLD),
        StyleTag::System => base.fg(CYAN),
        StyleTag::Hero => base.fg(HERO).add_modifier(Modifier::BOLD),
    }
}

/// Whether a tag's line is drawn centered.
pub fn is_centered(tag: StyleTag) -> bool {
    matches!(tag, StyleTag::Hero)
}

pub fn timestamp_style() -> Style {
    Style::default().fg(PHOSPHOR_DIM).bg(BACKGROUND)
}

pub fn chrome_style() -> Style {
    Style::default().fg(PHOSPHOR_DIM).bg(BACKGROUND)
}

pub fn screen_style() -> Style {
    Style::default().fg(PHOSPHOR).bg(BACKGROUND)
}

/// Status indicator while lines are still arriving.
pub fn booting_style() -> Style {
    Style::default()
        .fg(AMBER)
        .bg(BACKGROUND)
        .add_modifier(Modifier::BOLD)
}

/// Status indicator once the sequence is complete.
pub fn ready_style() -> Style {
    Style::default()
        .fg(PHOSPHOR)
        .bg(BACKGROUND)
        .add_modifier(Modifier::BOLD)
}

pub fn cursor_style() -> Style {
    Style::default().fg(PHOSPHOR).bg(BACKGROUND)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_line_style_is_deterministic() {
        for tag in StyleTag::all() {
            assert_eq!(line_style(*tag), line_style(*tag), "{tag} style changed");
        }
    }

    #[test]
    fn test_every_tag_has_a_distinct_style() {
        let styles: HashSet<String> = StyleTag::all()
            .iter()
            .map(|tag| format!("{:?}", line_style(*tag)))
            .collect();
        assert_eq!(styles.len(), StyleTag::all().len());
    }

    #[test]
    fn test_default_tag_is_plain_phosphor() {
        assert_eq!(line_style(StyleTag::default()).fg, Some(PHOSPHOR));
        assert!(
            !line_style(StyleTag::default())
                .add_modifier
                .contains(Modifier::BOLD)
        );
    }

    #[test]
    fn test_only_hero_is_centered() {
        for tag in StyleTag::all() {
            assert_eq!(is_centered(*tag), *tag == StyleTag::Hero);
        }
    }
}
