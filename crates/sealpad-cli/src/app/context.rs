//! Application context for the Sealpad CLI.
//!
//! Provides a unified context that combines CLI arguments with the
//! lazily-loaded config file.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;

use sealpad_core::PassphraseConfig;

use crate::cli::{Cli, CryptoArgs};
use crate::config::{read_config_or_default, SealpadConfig};
use crate::ui::UiContext;

use super::preferences::resolve_passphrase_config;
use super::resolver::resolve_config_path;

/// Application context that bundles CLI args with the config file.
///
/// This avoids repeatedly loading config and threading multiple parameters
/// through handler functions.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config_path: OnceCell<PathBuf>,
    config: OnceCell<SealpadConfig>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config_path: OnceCell::new(),
            config: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Whether a passphrase prompt may be shown.
    pub fn can_prompt(&self) -> bool {
        !self.cli.no_input && std::io::stderr().is_terminal()
    }

    /// Build the UI context for output rendering.
    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color, self.cli.ascii)
    }

    /// Get the config file path, resolving it once.
    pub fn config_path(&self) -> anyhow::Result<&Path> {
        self.config_path
            .get_or_try_init(resolve_config_path)
            .map(PathBuf::as_path)
    }

    /// Get the config, loading it lazily if needed.
    pub fn config(&self) -> anyhow::Result<&SealpadConfig> {
        self.config
            .get_or_try_init(|| read_config_or_default(self.config_path()?))
    }

    /// Resolve the encryption parameters for this invocation.
    pub fn passphrase_config(&self, overrides: &CryptoArgs) -> anyhow::Result<PassphraseConfig> {
        resolve_passphrase_config(&self.config()?.crypto, overrides)
    }

    /// Editor command: flag, then config, then `$VISUAL` / `$EDITOR`.
    pub fn editor(&self, flag: Option<&str>) -> anyhow::Result<Option<String>> {
        if let Some(editor) = flag {
            return Ok(Some(editor.to_string()));
        }
        if let Some(editor) = self.config()?.ui.editor.clone() {
            return Ok(Some(editor));
        }
        Ok(["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty()))
    }
}
