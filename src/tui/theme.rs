//! TUI theming and colors.

use ratatui::style::{Color, Modifier, Style};

use crate::highlight::TokenStyle;

/// Application theme.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Name of the theme.
    pub name: String,
    /// Foreground color.
    pub foreground: Color,
    /// Primary accent color.
    pub primary: Color,
    /// Border color (unfocused).
    pub border: Color,
    /// Border color (focused).
    pub border_focused: Color,
    /// Selection highlight background.
    pub selection: Color,
    /// Table header color.
    pub header: Color,
    /// Classification label badges.
    pub label: Color,
    /// JSON object keys.
    pub json_key: Color,
    /// JSON string values.
    pub json_string: Color,
    /// JSON numbers.
    pub json_number: Color,
    /// JSON booleans.
    pub json_boolean: Color,
    /// JSON null.
    pub json_null: Color,
    /// JSON structural characters.
    pub json_bracket: Color,
    /// Error color.
    pub error: Color,
    /// Warning color.
    pub warning: Color,
    /// Success color.
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create the default dark theme.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            foreground: Color::White,
            primary: Color::Cyan,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            selection: Color::DarkGray,
            header: Color::Cyan,
            label: Color::Magenta,
            json_key: Color::Cyan,
            json_string: Color::Green,
            json_number: Color::Yellow,
            json_boolean: Color::Magenta,
            json_null: Color::DarkGray,
            json_bracket: Color::Gray,
            error: Color::Red,
            warning: Color::Yellow,
            success: Color::Green,
        }
    }

    /// Create a light theme.
    #[must_use]
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            foreground: Color::Black,
            primary: Color::Blue,
            border: Color::Gray,
            border_focused: Color::Blue,
            selection: Color::LightBlue,
            header: Color::Blue,
            label: Color::Magenta,
            json_key: Color::Blue,
            json_string: Color::Green,
            json_number: Color::Red,
            json_boolean: Color::Magenta,
            json_null: Color::Gray,
            json_bracket: Color::DarkGray,
            error: Color::Red,
            warning: Color::Yellow,
            success: Color::Green,
        }
    }

    /// Create a high-contrast theme.
    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            name: "high-contrast".to_string(),
            foreground: Color::White,
            primary: Color::Yellow,
            border: Color::White,
            border_focused: Color::Yellow,
            selection: Color::Blue,
            header: Color::Yellow,
            label: Color::White,
            json_key: Color::Yellow,
            json_string: Color::White,
            json_number: Color::Cyan,
            json_boolean: Color::Magenta,
            json_null: Color::Gray,
            json_bracket: Color::White,
            error: Color::LightRed,
            warning: Color::LightYellow,
            success: Color::LightGreen,
        }
    }

    /// Look a theme up by name, falling back to dark.
    #[must_use]
    pub fn by_name(name: Option<&str>) -> Self {
        match name {
            Some("light") => Self::light(),
            Some("high-contrast") => Self::high_contrast(),
            _ => Self::dark(),
        }
    }

    /// ratatui style for a highlighter token category.
    #[must_use]
    pub fn token_style(&self, style: TokenStyle) -> Style {
        match style {
            TokenStyle::Key => Style::default()
                .fg(self.json_key)
                .add_modifier(Modifier::BOLD),
            TokenStyle::Str => Style::default().fg(self.json_string),
            TokenStyle::Number => Style::default().fg(self.json_number),
            TokenStyle::Boolean => Style::default().fg(self.json_boolean),
            TokenStyle::Null => Style::default()
                .fg(self.json_null)
                .add_modifier(Modifier::ITALIC),
            TokenStyle::Bracket => Style::default().fg(self.json_bracket),
            TokenStyle::Plain => Style::default().fg(self.foreground),
        }
    }
}

/// Names of all built-in themes.
#[must_use]
pub fn available_themes() -> &'static [&'static str] {
    &["dark", "light", "high-contrast"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_falls_back_to_dark() {
        assert_eq!(Theme::by_name(Some("light")).name, "light");
        assert_eq!(Theme::by_name(Some("nonsense")).name, "dark");
        assert_eq!(Theme::by_name(None).name, "dark");
    }
}
