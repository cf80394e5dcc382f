//! Filesystem utilities for atomic writes.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write `contents` to `destination` atomically.
///
/// The bytes land in a sibling temp file first, which is then renamed over the
/// destination. Missing parent directories are created.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination
/// already exists; in that case the destination is removed and the rename retried.
/// The temp file is cleaned up on every failure path.
///
/// # Errors
///
/// Returns an error if the temp file cannot be written or the rename fails even
/// after the fallback attempt.
pub fn write_atomic(destination: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = temp_path_for(destination);
    let written = fs::File::create(&temp_path).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    if let Err(initial_err) = fs::rename(&temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(&temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(&temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

fn temp_path_for(destination: &Path) -> PathBuf {
    let file_name = destination
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "flow".to_string());
    destination.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
}
