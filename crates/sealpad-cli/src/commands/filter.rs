//! `encrypt` / `decrypt`: stdin-to-stdout filters.

use secrecy::ExposeSecret;
use zeroize::Zeroizing;

use sealpad_core::{encrypt, SealpadError};

use crate::app::{decrypt_with_retry, new_passphrase, AppContext};
use crate::cli::{DecryptArgs, EncryptArgs};
use crate::helpers::read_filter_input;

use super::write_output;

pub fn handle_encrypt(ctx: &AppContext, args: &EncryptArgs) -> anyhow::Result<()> {
    let config = ctx.passphrase_config(&args.crypto)?;
    let text = read_filter_input(args.input.as_deref())?;
    let passphrase = new_passphrase(ctx, false)?.ok_or(SealpadError::EmptyPassphrase)?;

    let armored = encrypt(&text, passphrase.expose_secret(), &config)?;
    write_output(args.output.as_deref(), &armored)
}

pub fn handle_decrypt(ctx: &AppContext, args: &DecryptArgs) -> anyhow::Result<()> {
    let armored = read_filter_input(args.input.as_deref())?;
    let (decrypted, _passphrase) = decrypt_with_retry(ctx, &armored)?;
    let plaintext = Zeroizing::new(decrypted.plaintext);
    write_output(args.output.as_deref(), &plaintext)
}
