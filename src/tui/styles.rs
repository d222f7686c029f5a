//! Medical-themed color palette and styles.
//!
//! This is the only place that interprets the opaque risk style tags carried
//! by endotype records.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::EndotypeId;

/// Medical theme color palette.
pub struct MedicalTheme;

impl MedicalTheme {
    // === Primary Colors ===

    /// Deep teal - Primary color
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    /// Lighter teal for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    /// Darker teal for accents
    pub const PRIMARY_DARK: Color = Color::Rgb(15, 118, 110); // #0F766E

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Semantic Colors ===

    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E
    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    // === Text Colors ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    // === Preset Styles ===

    /// Style for titles
    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for subtitles
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Style for focused elements
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    /// Style for the endotype badge
    #[must_use]
    pub fn badge(base: Style) -> Style {
        base.add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    /// Style for key hints
    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key descriptions
    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Interpret a record's risk style tag.
    ///
    /// Tags are space-separated tokens; the first recognised `bg-*` token
    /// wins. Unknown tags render as plain text.
    #[must_use]
    pub fn risk_tag(tag: &str) -> Style {
        for token in tag.split_whitespace() {
            match token {
                "bg-success" => return Self::success(),
                "bg-info" => return Self::info(),
                "bg-warning" => return Self::warning(),
                "bg-danger" => return Self::danger(),
                _ => {}
            }
        }
        Self::text()
    }

    /// Alert style for the endotype headline.
    #[must_use]
    pub fn endotype(id: EndotypeId) -> Style {
        match id {
            EndotypeId::One => Self::success(),
            EndotypeId::Two => Self::info(),
            EndotypeId::Three => Self::warning(),
            EndotypeId::Four => Self::danger(),
        }
    }

    /// Gauge style for the processing bar
    #[must_use]
    pub fn gauge() -> Style {
        Style::default().fg(Self::PRIMARY).bg(Self::PRIMARY_DARK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reference_table;

    #[test]
    fn test_every_reference_tag_is_recognised() {
        for (id, record) in reference_table() {
            assert_eq!(
                MedicalTheme::risk_tag(record.risk_style_tag),
                MedicalTheme::endotype(id),
                "tag {:?}",
                record.risk_style_tag
            );
        }
    }

    #[test]
    fn test_unknown_tag_falls_back() {
        assert_eq!(MedicalTheme::risk_tag("badge-purple"), MedicalTheme::text());
        assert_eq!(MedicalTheme::risk_tag(""), MedicalTheme::text());
        assert_eq!(
            MedicalTheme::risk_tag("text-dark bg-warning"),
            MedicalTheme::warning()
        );
    }
}
