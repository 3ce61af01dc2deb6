//! Filesystem store: verified backups and atomic rewrites of the config.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use clawguard_core::{ConfigStore, PersistError};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Mode of every backup file: owner read/write only.
pub const BACKUP_MODE: u32 = 0o600;

/// Appended to the full file name: `openclaw.json` → `openclaw.json.bak.security`.
pub const BACKUP_SUFFIX: &str = ".bak.security";

/// Backup location for `path`, in the same directory.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("config"));
    name.push(BACKUP_SUFFIX);
    path.with_file_name(name)
}

/// [`ConfigStore`] backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStore;

impl ConfigStore for FsStore {
    fn backup(&self, path: &Path) -> Result<PathBuf, PersistError> {
        let target = backup_path(path);
        let backup_err = |reason: String| PersistError::Backup {
            path: path.to_path_buf(),
            reason,
        };

        std::fs::copy(path, &target).map_err(|e| backup_err(e.to_string()))?;
        // fs::copy carries the original's mode over; backups are always owner-only.
        restrict(&target).map_err(|e| backup_err(e.to_string()))?;

        let original = digest(path).map_err(|e| backup_err(e.to_string()))?;
        let copied = digest(&target).map_err(|e| backup_err(e.to_string()))?;
        if original != copied {
            return Err(PersistError::BackupMismatch { path: target });
        }

        tracing::info!(backup = %target.display(), "Created verified backup");
        Ok(target)
    }

    fn write(&self, path: &Path, doc: &Value) -> Result<(), PersistError> {
        let write_err = |reason: String| PersistError::Write {
            path: path.to_path_buf(),
            reason,
        };

        let mut content = serde_json::to_string_pretty(doc).map_err(|e| write_err(e.to_string()))?;
        content.push('\n');

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
        tmp.write_all(content.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| write_err(e.to_string()))?;

        // Keep whatever mode the file has now (possibly just narrowed).
        if let Ok(meta) = std::fs::metadata(path) {
            std::fs::set_permissions(tmp.path(), meta.permissions())
                .map_err(|e| write_err(e.to_string()))?;
        }

        tmp.persist(path).map_err(|e| write_err(e.error.to_string()))?;
        tracing::info!(path = %path.display(), bytes = content.len(), "Config written");
        Ok(())
    }
}

#[cfg(unix)]
fn restrict(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(BACKUP_MODE))
}

#[cfg(not(unix))]
fn restrict(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

fn digest(path: &Path) -> std::io::Result<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    Ok(Sha256::digest(&bytes).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/home/u/.openclaw/openclaw.json")),
            PathBuf::from("/home/u/.openclaw/openclaw.json.bak.security")
        );
        assert_eq!(
            backup_path(Path::new("config")),
            PathBuf::from("config.bak.security")
        );
    }

    #[test]
    fn backup_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openclaw.json");
        std::fs::write(&path, "{\"gateway\":{\"bind\":\"all\"}}").unwrap();

        let backup = FsStore.backup(&path).unwrap();
        assert_eq!(backup, dir.path().join("openclaw.json.bak.security"));
        assert_eq!(std::fs::read(&path).unwrap(), std::fs::read(&backup).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn backup_is_owner_only_even_for_open_original() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openclaw.json");
        std::fs::write(&path, "{\"key\":\"sk-abcdef1234567890\"}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let backup = FsStore.backup(&path).unwrap();
        let mode = std::fs::metadata(&backup).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, BACKUP_MODE);
        // The original is left alone; narrowing it is a separate, confirmed step.
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn backup_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsStore.backup(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, PersistError::Backup { .. }));
        assert!(!dir.path().join("missing.json.bak.security").exists());
    }

    #[test]
    fn write_pretty_prints_and_keeps_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openclaw.json");
        std::fs::write(&path, "{}").unwrap();

        let doc = json!({"zeta": 1, "gateway": {"bind": "loopback"}});
        FsStore.write(&path, &doc).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with('\n'));
        assert!(written.contains("  \"gateway\""));
        assert!(written.find("zeta").unwrap() < written.find("gateway").unwrap());
        let reread: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(reread, doc);
    }

    #[cfg(unix)]
    #[test]
    fn write_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openclaw.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        FsStore.write(&path, &json!({"a": 1})).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join("openclaw.json");
        let err = FsStore.write(&path, &json!({})).unwrap_err();
        assert!(matches!(err, PersistError::Write { .. }));
    }
}
