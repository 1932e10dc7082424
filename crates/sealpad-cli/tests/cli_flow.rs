use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const PASSPHRASE: &str = "correct-horse";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sealpad"))
}

/// An isolated home with its own XDG config directory.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("config")).expect("create config dir");
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config_file(&self) -> PathBuf {
        self.path("config").join("sealpad").join("config.toml")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(bin());
        cmd.env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.path("config"))
            .env("NO_COLOR", "1")
            .env_remove("SEALPAD_PASSPHRASE")
            .env_remove("SEALPAD_CONFIG")
            .env_remove("SEALPAD_LOG")
            .env_remove("EDITOR")
            .env_remove("VISUAL");
        cmd
    }

    fn run_with(
        &self,
        args: &[&str],
        passphrase: Option<&str>,
        stdin: Option<&str>,
        configure: impl FnOnce(&mut Command),
    ) -> Output {
        let mut cmd = self.command();
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(passphrase) = passphrase {
            cmd.env("SEALPAD_PASSPHRASE", passphrase);
        }
        configure(&mut cmd);

        let mut child = cmd.spawn().expect("spawn sealpad");
        {
            let mut pipe = child.stdin.take().expect("stdin pipe");
            if let Some(input) = stdin {
                // The child may exit before reading stdin (e.g. on invalid input).
                if let Err(err) = pipe.write_all(input.as_bytes()) {
                    assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe, "write stdin: {err}");
                }
            }
        }
        child.wait_with_output().expect("wait for sealpad")
    }

    fn run(&self, args: &[&str], passphrase: Option<&str>, stdin: Option<&str>) -> Output {
        self.run_with(args, passphrase, stdin, |_| {})
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "exit {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

fn inspect_json(sandbox: &Sandbox, path: &Path) -> serde_json::Value {
    let output = sandbox.run(&["inspect", path_str(path), "--json"], None, None);
    assert_success(&output);
    serde_json::from_str(&stdout(&output)).expect("inspect emits JSON")
}

#[test]
fn test_save_then_open_round_trip() {
    let sandbox = Sandbox::new();
    let doc = sandbox.path("notes.asc");

    let output = sandbox.run(
        &["save", path_str(&doc), "--iterations", "1024"],
        Some(PASSPHRASE),
        Some("hello world\n"),
    );
    assert_success(&output);

    let stored = std::fs::read_to_string(&doc).expect("document written");
    assert!(stored.starts_with("-----BEGIN PGP MESSAGE-----"));
    assert!(!stored.contains("hello world"));

    let output = sandbox.run(&["open", path_str(&doc)], Some(PASSPHRASE), None);
    assert_success(&output);
    assert_eq!(stdout(&output), "hello world\n");
}

#[test]
fn test_whitespace_passphrase_from_env_is_used() {
    let sandbox = Sandbox::new();
    let doc = sandbox.path("spaces.asc");

    let output = sandbox.run(
        &["save", path_str(&doc), "--text", "indented", "--iterations", "1024"],
        Some("   "),
        None,
    );
    assert_success(&output);
    let stored = std::fs::read_to_string(&doc).expect("document written");
    assert!(stored.starts_with("-----BEGIN PGP MESSAGE-----"));

    let output = sandbox.run(&["open", path_str(&doc)], Some("   "), None);
    assert_success(&output);
    assert_eq!(stdout(&output), "indented");

    let output = sandbox.run(&["open", path_str(&doc)], Some("  "), None);
    assert_eq!(output.status.code(), Some(5));
}

#[cfg(unix)]
#[test]
fn test_saved_envelopes_are_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let sandbox = Sandbox::new();
    let doc = sandbox.path("private.asc");
    let output = sandbox.run(
        &["save", path_str(&doc), "--text", "secret", "--iterations", "1024"],
        Some(PASSPHRASE),
        None,
    );
    assert_success(&output);

    let mode = std::fs::metadata(&doc).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_open_with_wrong_passphrase_exits_auth_failed() {
    let sandbox = Sandbox::new();
    let doc = sandbox.path("notes.asc");
    assert_success(&sandbox.run(
        &["save", path_str(&doc), "--text", "secret", "--iterations", "1024"],
        Some(PASSPHRASE),
        None,
    ));

    let output = sandbox.run(&["open", path_str(&doc)], Some("wrong-horse"), None);
    assert_eq!(output.status.code(), Some(5));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_legacy_framing_wrong_passphrase_exits_auth_failed() {
    let sandbox = Sandbox::new();
    let doc = sandbox.path("legacy.asc");
    assert_success(&sandbox.run(
        &["save", path_str(&doc), "--text", "old style", "--no-aead", "--iterations", "1024"],
        Some(PASSPHRASE),
        None,
    ));

    let output = sandbox.run(&["open", path_str(&doc)], Some("nope"), None);
    assert_eq!(output.status.code(), Some(5));

    let output = sandbox.run(&["open", path_str(&doc)], Some(PASSPHRASE), None);
    assert_success(&output);
    assert_eq!(stdout(&output), "old style");
}

#[test]
fn test_plain_documents_pass_through() {
    let sandbox = Sandbox::new();
    let doc = sandbox.path("plain.txt");
    let output = sandbox.run(
        &["save", path_str(&doc), "--plain", "--text", "plain note"],
        None,
        None,
    );
    assert_success(&output);
    assert_eq!(std::fs::read_to_string(&doc).unwrap(), "plain note");

    let output = sandbox.run(&["open", path_str(&doc), "--info"], None, None);
    assert_success(&output);
    assert_eq!(stdout(&output), "plain note");
    assert!(String::from_utf8_lossy(&output.stderr).contains("plain text"));
}

#[test]
fn test_no_passphrase_without_prompt_exits_auth_failed() {
    let sandbox = Sandbox::new();
    let doc = sandbox.path("notes.asc");

    let output = sandbox.run(&["save", path_str(&doc), "--text", "x"], None, None);
    assert_eq!(output.status.code(), Some(5));
    assert!(!doc.exists());

    assert_success(&sandbox.run(
        &["save", path_str(&doc), "--text", "x", "--iterations", "1024"],
        Some(PASSPHRASE),
        None,
    ));
    let output = sandbox.run(&["--no-input", "open", path_str(&doc)], None, None);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_encrypt_decrypt_filters() {
    let sandbox = Sandbox::new();
    let text = "line one\nline two ✓\n";

    let encrypted = sandbox.run(
        &["encrypt", "--iterations", "1024"],
        Some(PASSPHRASE),
        Some(text),
    );
    assert_success(&encrypted);
    let armored = stdout(&encrypted);
    assert!(armored.starts_with("-----BEGIN PGP MESSAGE-----"));

    let decrypted = sandbox.run(&["decrypt", "-"], Some(PASSPHRASE), Some(&armored));
    assert_success(&decrypted);
    assert_eq!(stdout(&decrypted), text);
}

#[test]
fn test_filters_with_files() {
    let sandbox = Sandbox::new();
    let input = sandbox.path("in.txt");
    let sealed = sandbox.path("out.asc");
    let restored = sandbox.path("restored.txt");
    std::fs::write(&input, "file based filter").unwrap();

    assert_success(&sandbox.run(
        &["encrypt", path_str(&input), "-o", path_str(&sealed), "--iterations", "1024"],
        Some(PASSPHRASE),
        None,
    ));
    assert_success(&sandbox.run(
        &["decrypt", path_str(&sealed), "-o", path_str(&restored)],
        Some(PASSPHRASE),
        None,
    ));
    assert_eq!(
        std::fs::read_to_string(&restored).unwrap(),
        "file based filter"
    );
}

#[test]
fn test_inspect_reports_overrides() {
    let sandbox = Sandbox::new();
    let doc = sandbox.path("custom.asc");
    assert_success(&sandbox.run(
        &[
            "save",
            path_str(&doc),
            "--text",
            "parameters",
            "--cipher",
            "aes128",
            "--no-aead",
            "--compression",
            "zip",
            "--iterations",
            "100000",
        ],
        Some(PASSPHRASE),
        None,
    ));

    let info = inspect_json(&sandbox, &doc);
    assert_eq!(info["symmetric_cipher"], "aes128");
    assert_eq!(info["aead_enabled"], false);
    assert_eq!(info["seipd_version"], 1);
    assert!(info["compression"].is_null());
    assert!(info["kdf_iterations"].as_u64().unwrap() >= 100_000);
}

#[test]
fn test_invalid_override_exits_invalid_input() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(
        &["encrypt", "--cipher", "blowfish"],
        Some(PASSPHRASE),
        Some("x"),
    );
    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_config_set_show_reset() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["config", "path"], None, None);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), path_str(&sandbox.config_file()));

    assert_success(&sandbox.run(&["config", "set", "cipher", "aes128"], None, None));
    assert_success(&sandbox.run(&["config", "set", "aead", "false"], None, None));
    assert_success(&sandbox.run(&["config", "set", "iterations", "2048"], None, None));

    let output = sandbox.run(&["config", "show", "--json"], None, None);
    assert_success(&output);
    let shown: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(shown["crypto"]["symmetric_cipher"], "aes128");
    assert_eq!(shown["crypto"]["aead_enabled"], false);
    assert_eq!(shown["crypto"]["kdf_iterations"], 2048);
    assert_eq!(shown["label"], "AES128/zlib");

    let before = std::fs::read_to_string(sandbox.config_file()).unwrap();
    let output = sandbox.run(&["config", "set", "cipher", "blowfish"], None, None);
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(std::fs::read_to_string(sandbox.config_file()).unwrap(), before);

    let output = sandbox.run(&["config", "set", "colour", "blue"], None, None);
    assert_eq!(output.status.code(), Some(4));

    assert_success(&sandbox.run(&["config", "reset"], None, None));
    let output = sandbox.run(&["config", "show", "--json"], None, None);
    let shown: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(shown["label"], "AES256+AEAD/zlib");
    assert_eq!(shown["crypto"]["kdf_iterations"], 65536);
}

#[test]
fn test_config_file_drives_encryption() {
    let sandbox = Sandbox::new();
    assert_success(&sandbox.run(&["config", "set", "aead", "off"], None, None));
    assert_success(&sandbox.run(
        &["config", "set", "kdf_iteration_count", "1024"],
        None,
        None,
    ));

    let doc = sandbox.path("configured.asc");
    assert_success(&sandbox.run(
        &["save", path_str(&doc), "--text", "from config"],
        Some(PASSPHRASE),
        None,
    ));
    let info = inspect_json(&sandbox, &doc);
    assert_eq!(info["aead_enabled"], false);
    assert_eq!(info["kdf_iterations"], 1024);

    // Decryption ignores the current config entirely.
    assert_success(&sandbox.run(&["config", "reset"], None, None));
    let output = sandbox.run(&["open", path_str(&doc)], Some(PASSPHRASE), None);
    assert_success(&output);
    assert_eq!(stdout(&output), "from config");
}

#[test]
fn test_invalid_config_file_exits_invalid_input() {
    let sandbox = Sandbox::new();
    let config = sandbox.config_file();
    std::fs::create_dir_all(config.parent().unwrap()).unwrap();
    std::fs::write(&config, "[crypto]\ncompression = \"lzma\"\n").unwrap();

    let output = sandbox.run(&["encrypt"], Some(PASSPHRASE), Some("x"));
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("compression"));
}

#[test]
fn test_missing_document_exits_not_found() {
    let sandbox = Sandbox::new();
    let missing = sandbox.path("absent.asc");
    let output = sandbox.run(&["open", path_str(&missing)], Some(PASSPHRASE), None);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_inspect_plain_text_exits_invalid_input() {
    let sandbox = Sandbox::new();
    let doc = sandbox.path("plain.txt");
    std::fs::write(&doc, "not an envelope").unwrap();
    let output = sandbox.run(&["inspect", path_str(&doc)], None, None);
    assert_eq!(output.status.code(), Some(4));
}

#[cfg(unix)]
fn write_editor_script(sandbox: &Sandbox) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = sandbox.path("append-editor.sh");
    std::fs::write(&script, "#!/bin/sh\nprintf 'appended line\\n' >> \"$1\"\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[test]
fn test_edit_reseals_with_fresh_envelope() {
    let sandbox = Sandbox::new();
    let doc = sandbox.path("journal.asc");
    assert_success(&sandbox.run(
        &["save", path_str(&doc), "--text", "first line\n", "--iterations", "1024"],
        Some(PASSPHRASE),
        None,
    ));
    let salt_before = inspect_json(&sandbox, &doc)["s2k_salt"].clone();

    let editor = write_editor_script(&sandbox);
    let output = sandbox.run_with(
        &["edit", path_str(&doc), "--iterations", "1024"],
        Some(PASSPHRASE),
        None,
        |cmd| {
            cmd.env("EDITOR", &editor);
        },
    );
    assert_success(&output);

    let salt_after = inspect_json(&sandbox, &doc)["s2k_salt"].clone();
    assert_ne!(salt_before, salt_after);

    let output = sandbox.run(&["open", path_str(&doc)], Some(PASSPHRASE), None);
    assert_success(&output);
    assert_eq!(stdout(&output), "first line\nappended line\n");
}

#[cfg(unix)]
#[test]
fn test_edit_missing_file_starts_empty() {
    let sandbox = Sandbox::new();
    let doc = sandbox.path("new.asc");
    let editor = write_editor_script(&sandbox);

    let output = sandbox.run(
        &[
            "edit",
            path_str(&doc),
            "--editor",
            path_str(&editor),
            "--iterations",
            "1024",
        ],
        Some(PASSPHRASE),
        None,
    );
    assert_success(&output);

    let output = sandbox.run(&["open", path_str(&doc)], Some(PASSPHRASE), None);
    assert_success(&output);
    assert_eq!(stdout(&output), "appended line\n");
}

#[test]
fn test_edit_without_editor_exits_invalid_input() {
    let sandbox = Sandbox::new();
    let doc = sandbox.path("new.asc");
    let output = sandbox.run(&["edit", path_str(&doc)], Some(PASSPHRASE), None);
    assert_eq!(output.status.code(), Some(4));
    assert!(!doc.exists());
}

#[test]
fn test_completions_generate() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["completions", "bash"], None, None);
    assert_success(&output);
    assert!(stdout(&output).contains("sealpad"));
}
