use secrecy::SecretString;
use zeroize::Zeroizing;

use sealpad_core::is_envelope;

use crate::app::{decrypt_with_retry, new_passphrase, read_document, AppContext};
use crate::cli::{EditArgs, OpenArgs, SaveArgs};
use crate::errors::CliError;
use crate::helpers::{edit_text, read_text_input};
use crate::ui::receipt;

use super::{save_document, write_stdout};

pub fn handle_open(ctx: &AppContext, args: &OpenArgs) -> anyhow::Result<()> {
    let text = Zeroizing::new(read_document(&args.path)?);

    if !is_envelope(&text) {
        if args.info {
            eprintln!("plain text");
        }
        return write_stdout(&text);
    }

    let (decrypted, _passphrase) = decrypt_with_retry(ctx, &text)?;
    let plaintext = Zeroizing::new(decrypted.plaintext);
    if args.info {
        eprintln!("{}", decrypted.info.label());
    }
    write_stdout(&plaintext)
}

pub fn handle_save(ctx: &AppContext, args: &SaveArgs) -> anyhow::Result<()> {
    let config = ctx.passphrase_config(&args.crypto)?;
    let text = read_text_input(args.text.clone())?;

    let passphrase = if args.plain {
        None
    } else {
        new_passphrase(ctx, true)?
    };

    let label = save_document(&args.path, &text, passphrase.as_ref().map(|p| (p, &config)))?;
    tracing::debug!(path = %args.path.display(), format = %label, "saved document");

    if !ctx.quiet() {
        let ui = ctx.ui_context(false);
        let path = args.path.display().to_string();
        println!(
            "{}",
            receipt(&ui, "Saved", &[("Path", path.as_str()), ("Format", label.as_str())])
        );
    }
    Ok(())
}

/// Edit a document in place.
///
/// An envelope is decrypted, edited and sealed again into a fresh envelope
/// with the current configuration and the same passphrase. A plain
/// document stays plain. A missing file starts empty and asks for a
/// passphrase up front, like `save`.
pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let editor = ctx.editor(args.editor.as_deref())?.ok_or_else(|| {
        CliError::invalid_input(
            "No editor configured\nHint: Set $EDITOR, pass --editor, or run `sealpad config set editor <command>`.",
        )
    })?;
    let config = ctx.passphrase_config(&args.crypto)?;

    let existed = args.path.exists();
    let (original, passphrase): (Zeroizing<String>, Option<SecretString>) = if existed {
        let text = Zeroizing::new(read_document(&args.path)?);
        if is_envelope(&text) {
            let (decrypted, passphrase) = decrypt_with_retry(ctx, &text)?;
            (Zeroizing::new(decrypted.plaintext), Some(passphrase))
        } else {
            (text, None)
        }
    } else {
        (Zeroizing::new(String::new()), new_passphrase(ctx, true)?)
    };

    let edited = edit_text(&editor, &original)?;
    let ui = ctx.ui_context(false);
    let path = args.path.display().to_string();

    if existed && edited.as_str() == original.as_str() {
        if !ctx.quiet() {
            println!("{}", receipt(&ui, "No changes", &[("Path", path.as_str())]));
        }
        return Ok(());
    }

    let label = save_document(&args.path, &edited, passphrase.as_ref().map(|p| (p, &config)))?;
    if !ctx.quiet() {
        println!(
            "{}",
            receipt(&ui, "Saved", &[("Path", path.as_str()), ("Format", label.as_str())])
        );
    }
    Ok(())
}
