use sealpad_core::{inspect, EnvelopeInfo};

use crate::app::{read_document, AppContext};
use crate::cli::InspectArgs;
use crate::ui::{header, hint, kv, UiContext};

pub fn handle_inspect(ctx: &AppContext, args: &InspectArgs) -> anyhow::Result<()> {
    let text = read_document(&args.path)?;
    let info = inspect(&text)?;
    let ui = ctx.ui_context(args.json);

    if ui.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let path = args.path.display().to_string();
    println!("{}", header(&ui, "inspect", Some(&path)));
    for line in describe(&ui, &info) {
        println!("{}", line);
    }
    if ui.mode.is_pretty() && info.compression.is_none() {
        println!(
            "{}",
            hint(&ui, "Compression is stored inside the encrypted payload.")
        );
    }
    Ok(())
}

fn describe(ui: &UiContext, info: &EnvelopeInfo) -> Vec<String> {
    let mut lines = vec![
        kv(ui, "Cipher", info.symmetric_cipher.as_str()),
        kv(ui, "AEAD", info.aead_mode.as_deref().unwrap_or("none")),
        kv(
            ui,
            "Compression",
            info.compression.map(|c| c.as_str()).unwrap_or("unknown"),
        ),
        kv(ui, "S2K hash", &info.s2k_hash),
    ];
    if let Some(salt) = &info.s2k_salt {
        lines.push(kv(ui, "S2K salt", salt));
    }
    if let Some(count) = info.kdf_iterations {
        lines.push(kv(ui, "KDF iterations", &count.to_string()));
    }
    if let Some(size) = info.chunk_size {
        lines.push(kv(ui, "Chunk size", &size.to_string()));
    }
    lines.push(kv(
        ui,
        "Packets",
        &format!("SKESK v{}, SEIPD v{}", info.skesk_version, info.seipd_version),
    ));
    lines.push(kv(ui, "Label", &info.label()));
    lines
}
