//! Constants used throughout the CLI.

/// Environment variable holding the passphrase for non-interactive use.
pub const PASSPHRASE_ENV: &str = "SEALPAD_PASSPHRASE";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SEALPAD_CONFIG";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "SEALPAD_LOG";

/// Passphrase attempts allowed when prompting interactively.
pub const MAX_PASSPHRASE_ATTEMPTS: u32 = 3;

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const GENERAL: i32 = 1;

    /// Input file or config not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input, configuration or envelope.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong passphrase, too many attempts, no passphrase).
    pub const AUTH_FAILED: i32 = 5;

    /// Decrypted data could not be turned back into text.
    pub const DATA_CORRUPT: i32 = 6;
}
