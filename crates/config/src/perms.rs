//! POSIX permission primitives.
//!
//! On platforms without permission bits every operation reports
//! [`PermissionError::Unsupported`].

use std::path::Path;

use clawguard_core::{PermissionError, PermissionOps};

/// [`PermissionOps`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsPermissions;

#[cfg(unix)]
impl PermissionOps for FsPermissions {
    fn mode(&self, path: &Path) -> Result<u32, PermissionError> {
        use std::os::unix::fs::PermissionsExt;

        let meta = std::fs::metadata(path).map_err(|e| io_error(path, e))?;
        Ok(meta.permissions().mode() & 0o7777)
    }

    fn set_mode(&self, path: &Path, mode: u32) -> Result<(), PermissionError> {
        use std::os::unix::fs::PermissionsExt;

        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
            .map_err(|e| io_error(path, e))?;
        tracing::info!(path = %path.display(), mode = %format!("{mode:o}"), "Permissions updated");
        Ok(())
    }
}

#[cfg(not(unix))]
impl PermissionOps for FsPermissions {
    fn mode(&self, _path: &Path) -> Result<u32, PermissionError> {
        Err(PermissionError::Unsupported)
    }

    fn set_mode(&self, _path: &Path, _mode: u32) -> Result<(), PermissionError> {
        Err(PermissionError::Unsupported)
    }
}

#[cfg(unix)]
fn io_error(path: &Path, e: std::io::Error) -> PermissionError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => PermissionError::Denied {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
        _ => PermissionError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    }
}
