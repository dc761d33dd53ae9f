//! Theme support for the TUI.
//!
//! Provides the built-in color themes selectable through the `[ui]` config
//! section.

use ratatui::style::Color;

/// A complete color theme for the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name for display and configuration
    pub name: String,
    /// Primary accent color (headers, active elements)
    pub primary: Color,
    /// Secondary accent color (answered markers, confirmations)
    pub secondary: Color,
    /// Tertiary accent color (memory prompts, highlights)
    pub accent: Color,
    /// Main text color
    pub text: Color,
    /// Dimmed text color (descriptions, secondary info)
    pub text_dim: Color,
    /// Muted text color (placeholders, hints)
    pub text_muted: Color,
    /// Selected item background
    pub selected_bg: Color,
    /// Border color
    pub border: Color,
    /// Success indicator color
    pub success: Color,
    /// Warning indicator color
    pub warning: Color,
    /// Error indicator color
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    /// Default theme - works well on both light and dark terminals.
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            primary: Color::Rgb(99, 102, 241),    // Indigo
            secondary: Color::Rgb(16, 185, 129),  // Emerald
            accent: Color::Rgb(251, 146, 60),     // Orange
            text: Color::White,
            text_dim: Color::Rgb(156, 163, 175),  // Gray-400
            text_muted: Color::Rgb(107, 114, 128), // Gray-500
            selected_bg: Color::Rgb(55, 65, 81),  // Gray-700
            border: Color::Rgb(75, 85, 99),       // Gray-600
            success: Color::Rgb(34, 197, 94),     // Green
            warning: Color::Rgb(234, 179, 8),     // Yellow
            error: Color::Rgb(239, 68, 68),       // Red
        }
    }

    /// Nord theme - arctic, bluish colors.
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            primary: Color::Rgb(136, 192, 208),   // Nord8 (Frost)
            secondary: Color::Rgb(163, 190, 140), // Nord14 (Aurora Green)
            accent: Color::Rgb(208, 135, 112),    // Nord12 (Aurora Orange)
            text: Color::Rgb(236, 239, 244),      // Nord6 (Snow Storm)
            text_dim: Color::Rgb(216, 222, 233),  // Nord5
            text_muted: Color::Rgb(76, 86, 106),  // Nord3 (Polar Night)
            selected_bg: Color::Rgb(59, 66, 82),  // Nord1
            border: Color::Rgb(67, 76, 94),       // Nord2
            success: Color::Rgb(163, 190, 140),   // Nord14
            warning: Color::Rgb(235, 203, 139),   // Nord13
            error: Color::Rgb(191, 97, 106),      // Nord11
        }
    }

    /// Look up a built-in theme by name, falling back to the default.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "nord" => Self::nord(),
            _ => Self::default_theme(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("nord").name, "nord");
        assert_eq!(Theme::from_name("NORD").name, "nord");
        assert_eq!(Theme::from_name("default").name, "default");
        assert_eq!(Theme::from_name("no-such-theme").name, "default");
    }
}
