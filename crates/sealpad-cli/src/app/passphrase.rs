//! Passphrase acquisition with retry logic.
//!
//! The passphrase comes from `SEALPAD_PASSPHRASE` or an interactive prompt.
//! It is held as a `SecretString` for the duration of one command and is
//! never written anywhere.

use secrecy::{ExposeSecret, SecretString};

use sealpad_core::{decrypt_with_info, inspect, Decrypted};

use crate::constants::{MAX_PASSPHRASE_ATTEMPTS, PASSPHRASE_ENV};
use crate::errors::CliError;
use crate::helpers::{prompt_new_passphrase, prompt_passphrase};

use super::context::AppContext;

/// Read the passphrase from the environment, ignoring an empty value.
fn env_passphrase() -> Option<SecretString> {
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
}

fn no_passphrase_error() -> anyhow::Error {
    CliError::auth_failed_with_hint(
        "No passphrase provided and prompting is disabled.",
        format!("Hint: Set {} or run without --no-input in a terminal.", PASSPHRASE_ENV),
    )
    .into()
}

/// Decrypt an envelope, prompting up to three times when interactive.
///
/// Returns the passphrase that worked so callers can re-encrypt with it.
pub fn decrypt_with_retry(
    ctx: &AppContext,
    armored: &str,
) -> anyhow::Result<(Decrypted, SecretString)> {
    if let Some(passphrase) = env_passphrase() {
        return match decrypt_with_info(armored, passphrase.expose_secret()) {
            Ok(decrypted) => Ok((decrypted, passphrase)),
            Err(err) if err.is_wrong_passphrase() => Err(CliError::auth_failed_with_hint(
                "Incorrect passphrase.",
                format!(
                    "Hint: Check {}. A modified file fails the same check.",
                    PASSPHRASE_ENV
                ),
            )
            .into()),
            Err(err) => Err(err.into()),
        };
    }

    if !ctx.can_prompt() {
        return Err(no_passphrase_error());
    }

    // Reject non-envelopes before asking for anything.
    inspect(armored)?;

    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        let passphrase = prompt_passphrase("Enter passphrase to decrypt")?;
        match decrypt_with_info(armored, passphrase.expose_secret()) {
            Ok(decrypted) => return Ok((decrypted, passphrase)),
            Err(err) if err.is_wrong_passphrase() => {
                tracing::debug!(attempt = attempts, "passphrase rejected");
                let remaining = MAX_PASSPHRASE_ATTEMPTS.saturating_sub(attempts);
                if remaining == 0 {
                    return Err(CliError::auth_failed_with_hint(
                        "Too many failed passphrase attempts.",
                        "Hint: If you forgot the passphrase, the document cannot be recovered.",
                    )
                    .into());
                }
                eprintln!(
                    "Incorrect passphrase or corrupted file. {} attempt{} remaining.",
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Obtain a passphrase for a new envelope.
///
/// With `allow_plain`, a blank answer at the prompt returns `None` and the
/// caller writes plain text. Without it, a blank answer is an error.
pub fn new_passphrase(ctx: &AppContext, allow_plain: bool) -> anyhow::Result<Option<SecretString>> {
    if let Some(passphrase) = env_passphrase() {
        return Ok(Some(passphrase));
    }
    if !ctx.can_prompt() {
        return Err(no_passphrase_error());
    }
    match prompt_new_passphrase(allow_plain)? {
        Some(passphrase) => Ok(Some(passphrase)),
        None if allow_plain => Ok(None),
        None => Err(sealpad_core::SealpadError::EmptyPassphrase.into()),
    }
}
