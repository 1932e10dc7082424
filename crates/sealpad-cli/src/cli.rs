use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use sealpad_core::VERSION;

/// Sealpad - passphrase-encrypted text documents in OpenPGP armor
#[derive(Parser)]
#[command(name = "sealpad")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (overrides SEALPAD_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Never prompt; the passphrase must come from SEALPAD_PASSPHRASE
    #[arg(long, global = true)]
    pub no_input: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

/// Per-invocation overrides for the `[crypto]` config section
#[derive(Args, Debug, Default, Clone)]
pub struct CryptoArgs {
    /// Symmetric cipher (aes128, aes192, aes256)
    #[arg(long, value_name = "CIPHER")]
    pub cipher: Option<String>,

    /// Use AEAD framing
    #[arg(long, overrides_with = "no_aead")]
    pub aead: bool,

    /// Use legacy integrity-protected framing
    #[arg(long, overrides_with = "aead")]
    pub no_aead: bool,

    /// Compression (none, zip, zlib)
    #[arg(long, value_name = "ALGORITHM")]
    pub compression: Option<String>,

    /// KDF iteration count (octets hashed)
    #[arg(long, value_name = "COUNT")]
    pub iterations: Option<u64>,
}

impl CryptoArgs {
    /// The AEAD override, if either flag was given.
    pub fn aead_override(&self) -> Option<bool> {
        if self.no_aead {
            Some(false)
        } else if self.aead {
            Some(true)
        } else {
            None
        }
    }
}

/// Arguments for the `open` command
#[derive(Args)]
pub struct OpenArgs {
    /// Document to open
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Print the envelope parameters to stderr
    #[arg(long)]
    pub info: bool,
}

/// Arguments for the `save` command
#[derive(Args)]
pub struct SaveArgs {
    /// Destination document
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Document text (overrides stdin)
    #[arg(long)]
    pub text: Option<String>,

    /// Save as plain text without prompting for a passphrase
    #[arg(long)]
    pub plain: bool,

    #[command(flatten)]
    pub crypto: CryptoArgs,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Document to edit (created if missing)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Editor command (defaults to config, then $EDITOR)
    #[arg(long)]
    pub editor: Option<String>,

    #[command(flatten)]
    pub crypto: CryptoArgs,
}

/// Arguments for the `encrypt` command
#[derive(Args)]
pub struct EncryptArgs {
    /// Input file (`-` or omitted for stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub crypto: CryptoArgs,
}

/// Arguments for the `decrypt` command
#[derive(Args)]
pub struct DecryptArgs {
    /// Input file (`-` or omitted for stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `inspect` command
#[derive(Args)]
pub struct InspectArgs {
    /// Envelope to inspect
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config show` command
#[derive(Args)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config set` command
#[derive(Args)]
pub struct ConfigSetArgs {
    /// Key (symmetric_cipher, aead, compression, kdf_iteration_count, editor)
    #[arg(value_name = "KEY")]
    pub key: String,

    /// New value
    #[arg(value_name = "VALUE")]
    pub value: String,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the resolved configuration
    Show(ConfigShowArgs),
    /// Validate and store a setting
    Set(ConfigSetArgs),
    /// Restore the default settings
    Reset,
    /// Print the config file path
    Path,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a document, decrypting it if it is an envelope
    Open(OpenArgs),

    /// Save text from stdin as an encrypted (or plain) document
    Save(SaveArgs),

    /// Edit a document in $EDITOR, re-encrypting on save
    Edit(EditArgs),

    /// Encrypt text from a file or stdin into an armored envelope
    Encrypt(EncryptArgs),

    /// Decrypt an armored envelope from a file or stdin
    Decrypt(DecryptArgs),

    /// Show envelope parameters without decrypting
    Inspect(InspectArgs),

    /// Manage encryption preferences
    #[command(subcommand)]
    Config(ConfigSubcommand),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
