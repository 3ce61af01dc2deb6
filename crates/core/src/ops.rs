//! Collaborator traits: the filesystem operations the engine needs.
//!
//! The engine never touches the filesystem directly. Production
//! implementations live in `clawguard-config`; tests plug in fakes.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{PermissionError, PersistError};

/// Whether the host supports POSIX permission bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Posix,
    NonPosix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(unix) {
            Self::Posix
        } else {
            Self::NonPosix
        }
    }
}

/// What the evaluators need to know about the config file itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub path: PathBuf,
    /// Permission bits, `None` when the platform has none.
    pub mode: Option<u32>,
    pub platform: Platform,
}

impl FileMetadata {
    pub fn posix(path: impl Into<PathBuf>, mode: u32) -> Self {
        Self {
            path: path.into(),
            mode: Some(mode),
            platform: Platform::Posix,
        }
    }

    pub fn non_posix(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: None,
            platform: Platform::NonPosix,
        }
    }
}

/// Backup and persistence of the config document.
pub trait ConfigStore {
    /// Copy `path` next to itself and verify the copy. Returns the backup path.
    fn backup(&self, path: &Path) -> Result<PathBuf, PersistError>;

    /// Replace the file at `path` with the serialized document.
    fn write(&self, path: &Path, doc: &Value) -> Result<(), PersistError>;
}

/// Reading and narrowing file permission bits.
pub trait PermissionOps {
    fn mode(&self, path: &Path) -> Result<u32, PermissionError>;

    fn set_mode(&self, path: &Path, mode: u32) -> Result<(), PermissionError>;
}
