//! Rendering primitives for CLI output.

use super::context::UiContext;
use super::OutputMode;
use super::theme::{colors, styled, Badge};

/// Render a header line for a command.
///
/// Pretty mode: "Sealpad · command (context)"
/// Plain mode: "sealpad command"
pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    match ctx.mode {
        OutputMode::Pretty => {
            let title = styled("Sealpad", colors::BRIGHT, ctx.color);
            match context {
                Some(c) => format!("{} \u{00B7} {} ({})", title, command, c),
                None => format!("{} \u{00B7} {}", title, command),
            }
        }
        OutputMode::Plain => format!("sealpad {}", command),
        OutputMode::Json => String::new(),
    }
}

/// Render a badge with optional message.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let colored_badge = styled(kind.display(ctx.unicode), kind.style(), ctx.color);

    if message.is_empty() {
        colored_badge
    } else {
        format!("{} {}", colored_badge, message)
    }
}

/// Render a key-value pair.
///
/// Pretty mode: "Key: value" with dim key
/// Plain mode: "key=value"
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        let styled_key = styled(&format!("{}:", key), colors::DIM, ctx.color);
        format!("{} {}", styled_key, value)
    } else {
        format!("{}={}", key.to_lowercase().replace(' ', "_"), value)
    }
}

/// Render a hint line.
///
/// Pretty mode: "Hint: text" with dim styling
/// Plain mode: "hint=text"
pub fn hint(ctx: &UiContext, text: &str) -> String {
    if ctx.mode.is_pretty() {
        let label = styled("Hint:", colors::DIM, ctx.color);
        format!("{} {}", label, text)
    } else {
        format!("hint={}", text)
    }
}

/// Render a receipt (summary block after an action).
///
/// Pretty mode: Badge + indented key-value pairs
/// Plain mode: status=ok + key=value lines
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, &str)]) -> String {
    let mut lines = Vec::new();

    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Ok, title));
        for (key, value) in items {
            lines.push(format!("  {}", kv(ctx, key, value)));
        }
    } else {
        lines.push("status=ok".to_string());
        for (key, value) in items {
            lines.push(kv(ctx, key, value));
        }
    }

    lines.join("\n")
}

/// Format an error message with optional hint.
///
/// Pretty mode: "[ERR] message" with optional "Hint: ..." on next line
/// Plain mode: "error=message" with optional "hint=suggestion"
pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let mut lines = Vec::new();

    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Err, message));
        if let Some(h) = error_hint {
            lines.push(hint(ctx, h));
        }
    } else {
        lines.push(format!("error={}", message));
        if let Some(h) = error_hint {
            lines.push(format!("hint={}", h));
        }
    }

    lines.join("\n")
}

/// Print an error message to stderr with optional hint.
pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_ctx() -> UiContext {
        UiContext {
            color: false,
            unicode: false,
            mode: OutputMode::Plain,
        }
    }

    fn pretty_ctx() -> UiContext {
        UiContext {
            color: false,
            unicode: true,
            mode: OutputMode::Pretty,
        }
    }

    #[test]
    fn test_header_pretty() {
        let h = header(&pretty_ctx(), "inspect", Some("notes.asc"));
        assert_eq!(h, "Sealpad \u{00B7} inspect (notes.asc)");
    }

    #[test]
    fn test_header_plain() {
        assert_eq!(header(&plain_ctx(), "inspect", None), "sealpad inspect");
    }

    #[test]
    fn test_kv_plain_uses_snake_keys() {
        assert_eq!(kv(&plain_ctx(), "KDF iterations", "65536"), "kdf_iterations=65536");
    }

    #[test]
    fn test_kv_pretty() {
        assert_eq!(kv(&pretty_ctx(), "Cipher", "aes256"), "Cipher: aes256");
    }

    #[test]
    fn test_receipt_plain() {
        let r = receipt(&plain_ctx(), "Saved", &[("Path", "a.asc")]);
        assert_eq!(r, "status=ok\npath=a.asc");
    }

    #[test]
    fn test_receipt_pretty() {
        let r = receipt(&pretty_ctx(), "Saved", &[("Path", "a.asc")]);
        assert_eq!(r, "[\u{2713}] Saved\n  Path: a.asc");
    }

    #[test]
    fn test_error_message_plain_with_hint() {
        let msg = error_message(&plain_ctx(), "boom", Some("retry"));
        assert_eq!(msg, "error=boom\nhint=retry");
    }

    #[test]
    fn test_error_message_pretty() {
        let msg = error_message(&pretty_ctx(), "boom", None);
        assert_eq!(msg, "[\u{2717}] boom");
    }
}
