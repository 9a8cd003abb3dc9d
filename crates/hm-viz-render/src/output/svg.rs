use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Removes the temporary file unless the write completed.
struct TempGuard {
    path: PathBuf,
    armed: bool,
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Write `bytes` next to `path` and rename into place, so readers never see
/// a partially written figure and a failed write leaves no file behind.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> crate::Result<()> {
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()));
    let mut guard = TempGuard { path: tmp.clone(), armed: true };

    let mut file = fs::File::create(&tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(&tmp, path)?;
    guard.armed = false;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "figure written");
    Ok(())
}
