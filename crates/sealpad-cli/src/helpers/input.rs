//! Passphrase prompts, stdin input and the editor round trip.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use dialoguer::Password;
use secrecy::SecretString;
use zeroize::Zeroizing;

use crate::app::resolver::is_stdio;
use crate::errors::CliError;

/// Prompt once for an existing passphrase.
pub fn prompt_passphrase(prompt: &str) -> anyhow::Result<SecretString> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

/// Prompt for a new passphrase with confirmation.
///
/// With `allow_blank` an empty answer is accepted and returned as `None`.
pub fn prompt_new_passphrase(allow_blank: bool) -> anyhow::Result<Option<SecretString>> {
    let prompt = if allow_blank {
        "Enter passphrase to encrypt (leave blank for plain text)"
    } else {
        "Enter passphrase to encrypt"
    };
    let value = Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm passphrase", "Passphrases do not match")
        .allow_empty_password(allow_blank)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))?;
    if value.is_empty() {
        return Ok(None);
    }
    Ok(Some(SecretString::from(value)))
}

/// Read text from `--text`, or from stdin when it is not a terminal.
pub fn read_text_input(text: Option<String>) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = text {
        return Ok(Zeroizing::new(value));
    }
    if io::stdin().is_terminal() {
        return Err(CliError::invalid_input(
            "No input provided on stdin\nHint: Pipe text in, pass --text, or use `sealpad edit`.",
        )
        .into());
    }
    read_stdin()
}

/// Read a filter input: a file, or stdin for `-` / no path.
pub fn read_filter_input(path: Option<&Path>) -> anyhow::Result<Zeroizing<String>> {
    match path {
        Some(path) if !is_stdio(Some(path)) => {
            crate::app::resolver::read_document(path).map(Zeroizing::new)
        }
        _ => read_stdin(),
    }
}

fn read_stdin() -> anyhow::Result<Zeroizing<String>> {
    let mut buffer = Zeroizing::new(String::new());
    io::stdin().read_to_string(&mut *buffer).map_err(|e| {
        if e.kind() == io::ErrorKind::InvalidData {
            anyhow::Error::from(CliError::invalid_input("stdin is not UTF-8 text"))
        } else {
            anyhow::anyhow!("Failed to read stdin: {}", e)
        }
    })?;
    Ok(buffer)
}

/// Open `initial` in the editor and return what was saved.
///
/// The temporary file is owner-only and removed whether or not the
/// editor succeeds.
pub fn edit_text(editor: &str, initial: &str) -> anyhow::Result<Zeroizing<String>> {
    let path = temp_document_path()?;
    sealpad_core::fs::write_atomic(&path, initial.as_bytes(), true)
        .map_err(|e| anyhow::anyhow!("Failed to create temp file: {}", e))?;

    let result = run_editor(editor, &path).and_then(|()| {
        std::fs::read_to_string(&path)
            .map(Zeroizing::new)
            .map_err(|e| anyhow::anyhow!("Failed to read temp file: {}", e))
    });
    let _ = std::fs::remove_file(&path);
    result
}

fn run_editor(editor: &str, path: &Path) -> anyhow::Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| CliError::invalid_input("Editor command is empty"))?;

    tracing::debug!(editor = program, "launching editor");
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to launch editor: {}", e))?;
    if !status.success() {
        return Err(anyhow::anyhow!("Editor exited with failure"));
    }
    Ok(())
}

fn temp_document_path() -> anyhow::Result<PathBuf> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("System time error: {}", e))?
        .as_nanos();
    let filename = format!("sealpad_{}_{}.txt", std::process::id(), nanos);
    Ok(std::env::temp_dir().join(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_edit_text_with_noop_editor_returns_initial() {
        let text = edit_text("true", "unchanged note\n").unwrap();
        assert_eq!(text.as_str(), "unchanged note\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_editor_is_an_error() {
        assert!(edit_text("false", "note").is_err());
    }

    #[test]
    fn test_empty_editor_command_is_invalid() {
        let err = edit_text("   ", "note").unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
    }

    #[test]
    fn test_temp_paths_are_unique() {
        let first = temp_document_path().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1));
        assert_ne!(first, temp_document_path().unwrap());
    }
}
