//! Filesystem helpers for saving documents.
//!
//! The codec itself never touches the filesystem; callers that persist an
//! envelope (or a plain document) use [`write_atomic`] so a crash mid-save
//! never leaves a truncated file behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Atomically rename a file, with fallback for platforms where rename fails if target exists.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination already exists.
/// In that case the destination is removed and the rename retried.
///
/// If the rename ultimately fails, the temp file is cleaned up.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(first) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry.kind(),
                format!("Atomic rename failed (initial: {}, retry: {})", first, retry),
            )
        })?;
    }
    Ok(())
}

/// Write `contents` to `path` via a sibling temp file and a rename.
///
/// On unix the file is created with mode 0600 when `private` is set;
/// encrypted documents should always be written that way.
pub fn write_atomic(path: &Path, contents: &[u8], private: bool) -> Result<()> {
    let temp_path = temp_sibling(path);

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    restrict_to_owner(&mut options, private);

    let write = || -> io::Result<()> {
        let mut file = options.open(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()
    };
    if let Err(err) = write() {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    rename_with_fallback(&temp_path, path)?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote file atomically");
    Ok(())
}

#[cfg(unix)]
fn restrict_to_owner(options: &mut fs::OpenOptions, private: bool) {
    use std::os::unix::fs::OpenOptionsExt;
    if private {
        options.mode(0o600);
    }
}

#[cfg(not(unix))]
fn restrict_to_owner(_options: &mut fs::OpenOptions, _private: bool) {}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_rename_new_file() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.txt");
        let dest = dir.path().join("dest.txt");

        File::create(&temp).unwrap().write_all(b"test").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "test");
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("notes.asc");
        fs::write(&dest, "old").unwrap();

        write_atomic(&dest, b"new", true).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_private_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("secret.asc");
        write_atomic(&dest, b"envelope", true).unwrap();

        let mode = fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
