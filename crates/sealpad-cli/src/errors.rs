//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI. Core errors that
//! bubble up through `anyhow` are mapped by [`exit_code_for`].

use std::fmt;

use sealpad_core::SealpadError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (input file, config, etc.)
    NotFound { message: String, hint: String },

    /// Authentication failed (wrong passphrase, too many attempts)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for a core error.
pub fn core_exit_code(err: &SealpadError) -> i32 {
    match err {
        SealpadError::InvalidConfiguration(_) | SealpadError::MalformedEnvelope(_) => {
            exit_codes::INVALID_INPUT
        }
        SealpadError::EmptyPassphrase
        | SealpadError::AuthenticationFailed
        | SealpadError::IntegrityCheckFailed => exit_codes::AUTH_FAILED,
        SealpadError::DecompressionFailed(_) | SealpadError::EncodingError(_) => {
            exit_codes::DATA_CORRUPT
        }
        SealpadError::Crypto(_) | SealpadError::Io { .. } => exit_codes::GENERAL,
    }
}

/// Exit code for any error reaching `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return cli.exit_code();
    }
    if let Some(core) = err.downcast_ref::<SealpadError>() {
        return core_exit_code(core);
    }
    exit_codes::GENERAL
}
