//! UI primitives for the Sealpad CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens and color palette
//! - **Render**: Headers, receipts, hints, key-value lines, errors
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{header, kv, UiContext};
//!
//! let ctx = UiContext::from_env(args.json, cli.no_color, cli.ascii);
//!
//! if ctx.mode.is_json() {
//!     // Handle JSON output separately
//!     return Ok(());
//! }
//!
//! println!("{}", header(&ctx, "inspect", Some("notes.asc")));
//! println!("{}", kv(&ctx, "Cipher", "aes256"));
//! ```

mod context;
mod mode;
pub mod render;
pub mod theme;

// Re-export core types at module level
pub use context::UiContext;
pub use mode::OutputMode;

// Re-export commonly used render functions
pub use render::{header, hint, kv, print_error, receipt};
