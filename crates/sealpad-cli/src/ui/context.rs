//! UI context for environment detection and configuration.

use std::io::IsTerminal;

use super::mode::OutputMode;

/// Terminal and environment context for UI decisions.
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Whether color output is enabled
    pub color: bool,
    /// Whether unicode symbols are enabled
    pub unicode: bool,
    /// Resolved output mode
    pub mode: OutputMode,
}

impl UiContext {
    /// Create context from environment and CLI flags.
    ///
    /// # Arguments
    /// * `json_flag` - Whether `--json` was passed
    /// * `no_color_flag` - Whether `--no-color` was passed
    /// * `ascii_flag` - Whether `--ascii` was passed
    pub fn from_env(json_flag: bool, no_color_flag: bool, ascii_flag: bool) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var("NO_COLOR").is_ok();

        // Resolve color: disabled if NO_COLOR env, --no-color flag, or TERM=dumb
        let color = is_tty && !no_color_flag && !no_color_env && !term_is_dumb;

        Self {
            color,
            unicode: !ascii_flag,
            mode: OutputMode::resolve(json_flag, is_tty, term_is_dumb),
        }
    }
}
