//! `config show|set|reset|path`.

use sealpad_core::resolve_config;

use crate::app::AppContext;
use crate::cli::{ConfigSetArgs, ConfigShowArgs, CryptoArgs};
use crate::config::{read_config_or_default, write_config, CryptoKey, SealpadConfig};
use crate::errors::CliError;
use crate::ui::{header, kv, receipt};

pub fn handle_show(ctx: &AppContext, args: &ConfigShowArgs) -> anyhow::Result<()> {
    let path = ctx.config_path()?;
    let config = ctx.passphrase_config(&CryptoArgs::default())?;
    let editor = ctx.config()?.ui.editor.clone();
    let ui = ctx.ui_context(args.json);

    if ui.mode.is_json() {
        let value = serde_json::json!({
            "config_path": path.display().to_string(),
            "crypto": config,
            "preferences": config.to_preferences(),
            "label": config.label(),
            "editor": editor,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let path_display = path.display().to_string();
    println!("{}", header(&ui, "config", Some(&path_display)));
    println!("{}", kv(&ui, "Symmetric cipher", config.symmetric_cipher.as_str()));
    println!("{}", kv(&ui, "AEAD", &config.aead_enabled.to_string()));
    println!("{}", kv(&ui, "Compression", config.compression.as_str()));
    println!(
        "{}",
        kv(&ui, "KDF iteration count", &config.kdf_iterations.to_string())
    );
    println!("{}", kv(&ui, "Label", &config.label()));
    if let Some(editor) = editor {
        println!("{}", kv(&ui, "Editor", &editor));
    }
    Ok(())
}

pub fn handle_set(ctx: &AppContext, args: &ConfigSetArgs) -> anyhow::Result<()> {
    let path = ctx.config_path()?;
    let mut config = read_config_or_default(path)?;

    if args.key == "editor" {
        let value = args.value.trim();
        config.ui.editor = (!value.is_empty()).then(|| value.to_string());
    } else {
        let key = CryptoKey::parse(&args.key).ok_or_else(|| {
            CliError::invalid_input(format!(
                "Unknown config key \"{}\"\nHint: Use symmetric_cipher, aead, compression, kdf_iteration_count or editor.",
                args.key
            ))
        })?;
        config.set_crypto(key, key.parse_value(&args.value)?);
        validate(&config)?;
    }

    write_config(path, &config)?;
    tracing::debug!(key = %args.key, path = %path.display(), "config updated");

    if !ctx.quiet() {
        let ui = ctx.ui_context(false);
        let path_display = path.display().to_string();
        println!(
            "{}",
            receipt(
                &ui,
                "Config updated",
                &[
                    ("Key", args.key.as_str()),
                    ("Value", args.value.as_str()),
                    ("Path", path_display.as_str()),
                ],
            )
        );
    }
    Ok(())
}

pub fn handle_reset(ctx: &AppContext) -> anyhow::Result<()> {
    let path = ctx.config_path()?;
    write_config(path, &SealpadConfig::with_defaults())?;

    if !ctx.quiet() {
        let ui = ctx.ui_context(false);
        let path_display = path.display().to_string();
        println!(
            "{}",
            receipt(&ui, "Config reset", &[("Path", path_display.as_str())])
        );
    }
    Ok(())
}

pub fn handle_path(ctx: &AppContext) -> anyhow::Result<()> {
    println!("{}", ctx.config_path()?.display());
    Ok(())
}

/// Run the whole `[crypto]` table through the resolver.
fn validate(config: &SealpadConfig) -> anyhow::Result<()> {
    match serde_json::to_value(&config.crypto)? {
        serde_json::Value::Object(prefs) => {
            resolve_config(&prefs)?;
            Ok(())
        }
        _ => Err(CliError::invalid_input("[crypto] must be a table").into()),
    }
}
