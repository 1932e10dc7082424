//! Input helper functions for the CLI.
//!
//! Passphrase prompting, stdin/file input and the `$EDITOR` round trip
//! live in `input`.

mod input;

// Re-export public API
pub use input::{
    edit_text, prompt_new_passphrase, prompt_passphrase, read_filter_input, read_text_input,
};
