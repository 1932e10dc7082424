//! Theme definitions for colors and badges.

/// Badge types for status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Ok,
    Err,
}

impl Badge {
    /// Get badge with symbol for display.
    pub fn display(&self, unicode: bool) -> &'static str {
        match (self, unicode) {
            (Self::Ok, true) => "[\u{2713}]", // [✓]
            (Self::Ok, false) => "[OK]",
            (Self::Err, true) => "[\u{2717}]", // [✗]
            (Self::Err, false) => "[ERR]",
        }
    }

    /// ANSI color for this badge.
    pub fn style(&self) -> &'static str {
        match self {
            Self::Ok => colors::GREEN,
            Self::Err => colors::RED,
        }
    }
}

/// Color definitions using ANSI escape codes.
pub mod colors {
    /// Dim text (for labels, metadata)
    pub const DIM: &str = "\x1b[2m";
    /// Bright/bold text (for values)
    pub const BRIGHT: &str = "\x1b[1m";
    /// Green (success)
    pub const GREEN: &str = "\x1b[32m";
    /// Red (error)
    pub const RED: &str = "\x1b[31m";
    /// Reset all styles
    pub const RESET: &str = "\x1b[0m";
}

/// Wrap `text` in an ANSI style when color is enabled.
pub fn styled(text: &str, style: &str, color: bool) -> String {
    if color {
        format!("{}{}{}", style, text, colors::RESET)
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
        assert_eq!(Badge::Err.display(false), "[ERR]");
    }

    #[test]
    fn test_badge_display_unicode() {
        assert_eq!(Badge::Ok.display(true), "[\u{2713}]");
    }

    #[test]
    fn test_styled_respects_color_flag() {
        assert_eq!(styled("x", colors::DIM, false), "x");
        assert_eq!(styled("x", colors::DIM, true), "\x1b[2mx\x1b[0m");
    }
}
