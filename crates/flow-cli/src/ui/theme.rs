//! Badges and text styles.

use owo_colors::{OwoColorize, Style};

/// Status badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Ok,
    Warn,
    Err,
    Info,
    Locked,
}

impl Badge {
    /// Badge with symbol for display.
    pub fn display(&self, unicode: bool) -> &'static str {
        match (self, unicode) {
            (Self::Ok, true) => "[\u{2713}]",
            (Self::Ok, false) => "[OK]",
            (Self::Warn, true) => "[\u{26A0}]",
            (Self::Warn, false) => "[WARN]",
            (Self::Err, true) => "[\u{2717}]",
            (Self::Err, false) => "[ERR]",
            (Self::Info, true) => "[\u{2139}]",
            (Self::Info, false) => "[INFO]",
            (Self::Locked, true) => "[\u{1F512}]",
            (Self::Locked, false) => "[LOCKED]",
        }
    }

    pub fn style(&self) -> Style {
        match self {
            Self::Ok => styles::ok(),
            Self::Warn => styles::warn(),
            Self::Err => styles::err(),
            Self::Info | Self::Locked => styles::info(),
        }
    }
}

pub mod styles {
    use owo_colors::Style;

    pub fn bold() -> Style {
        Style::new().bold()
    }

    pub fn dim() -> Style {
        Style::new().dimmed()
    }

    pub fn ok() -> Style {
        Style::new().green()
    }

    pub fn warn() -> Style {
        Style::new().yellow()
    }

    pub fn err() -> Style {
        Style::new().red().bold()
    }

    pub fn info() -> Style {
        Style::new().cyan()
    }
}

/// Apply `style` when color is enabled.
pub fn styled(text: &str, style: Style, color: bool) -> String {
    if color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_display_ascii() {
        assert_eq!(Badge::Ok.display(false), "[OK]");
        assert_eq!(Badge::Locked.display(false), "[LOCKED]");
    }

    #[test]
    fn test_badge_display_unicode() {
        assert_eq!(Badge::Ok.display(true), "[\u{2713}]");
    }

    #[test]
    fn test_styled_without_color_is_plain() {
        assert_eq!(styled("hi", styles::bold(), false), "hi");
        assert_ne!(styled("hi", styles::bold(), true), "hi");
    }
}
