//! Sealpad CLI - passphrase-encrypted text documents in OpenPGP armor
//!
//! This is the command-line interface for Sealpad. It provides a
//! user-friendly interface to the core library functionality.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod ui;

use clap::Parser;

use crate::app::AppContext;
use crate::cli::{Cli, Commands, ConfigSubcommand};
use crate::commands::{config as config_cmd, document, filter, inspect, misc};
use crate::errors::exit_code_for;
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context(false);

        let (message, hint) = split_error_hint(&format!("{:#}", e));
        let hint = hint.or_else(|| contextual_hint(&message));

        print_error(&ui_ctx, &message, hint.as_deref());
        std::process::exit(exit_code_for(&e));
    }
}

/// Split an explicit "\nHint:" suffix off an error message.
fn split_error_hint(error: &str) -> (String, Option<String>) {
    for marker in ["\nHint:", "\nhint:"] {
        if let Some(idx) = error.find(marker) {
            let hint = error[idx + marker.len()..].trim().to_string();
            return (error[..idx].to_string(), Some(hint));
        }
    }
    (error.to_string(), None)
}

/// Provide contextual hints for common error patterns.
fn contextual_hint(error: &str) -> Option<String> {
    let error_lower = error.to_lowercase();

    if error_lower.contains("wrong passphrase") {
        return Some("Check the passphrase. A modified or truncated file fails the same check.".to_string());
    }

    if error_lower.contains("malformed envelope") {
        return Some("Run `sealpad inspect <PATH>` to check the file, or `sealpad open` for plain text.".to_string());
    }

    if error_lower.contains("invalid configuration") {
        return Some("Run `sealpad config show` to see the current settings, or `sealpad config reset`.".to_string());
    }

    if error_lower.contains("passphrase cannot be empty") {
        return Some("Set SEALPAD_PASSPHRASE or enter a passphrase at the prompt.".to_string());
    }

    None
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Open(args) => document::handle_open(ctx, args),
        Commands::Save(args) => document::handle_save(ctx, args),
        Commands::Edit(args) => document::handle_edit(ctx, args),
        Commands::Encrypt(args) => filter::handle_encrypt(ctx, args),
        Commands::Decrypt(args) => filter::handle_decrypt(ctx, args),
        Commands::Inspect(args) => inspect::handle_inspect(ctx, args),
        Commands::Config(sub) => match sub {
            ConfigSubcommand::Show(args) => config_cmd::handle_show(ctx, args),
            ConfigSubcommand::Set(args) => config_cmd::handle_set(ctx, args),
            ConfigSubcommand::Reset => config_cmd::handle_reset(ctx),
            ConfigSubcommand::Path => config_cmd::handle_path(ctx),
        },
        Commands::Completions(args) => misc::handle_completions(args.shell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_explicit_hint() {
        let (message, hint) = split_error_hint("Too many attempts.\nHint: try later");
        assert_eq!(message, "Too many attempts.");
        assert_eq!(hint.as_deref(), Some("try later"));
    }

    #[test]
    fn test_no_hint() {
        let (message, hint) = split_error_hint("boom");
        assert_eq!(message, "boom");
        assert!(hint.is_none());
    }

    #[test]
    fn test_contextual_hints() {
        let auth = sealpad_core::SealpadError::AuthenticationFailed.to_string();
        assert!(contextual_hint(&auth).is_some());
        assert!(contextual_hint("Malformed envelope: missing armor header").is_some());
        assert!(contextual_hint("something else").is_none());
    }
}
