//! Config document loading and filesystem primitives for ClawGuard.
//!
//! Loads the agent runtime's JSON config (`~/.openclaw/openclaw.json` by
//! default, with the legacy `~/.clawdbot/clawdbot.json` as a fallback) and
//! exposes lenient typed views of the sections the evaluators inspect.

pub mod perms;
pub mod store;
pub mod views;

use std::path::{Path, PathBuf};

use clawguard_core::{ConfigError, FileMetadata, PermissionOps, Platform};
use serde_json::Value;

pub use perms::FsPermissions;
pub use store::{backup_path, FsStore, BACKUP_MODE, BACKUP_SUFFIX};
pub use views::{AuthSection, ChannelSection, GatewaySection};

/// Environment variable overriding the config path.
pub const CONFIG_ENV: &str = "CLAWGUARD_CONFIG";

/// A loaded config file: where it came from and its parsed contents.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    pub path: PathBuf,
    pub value: Value,
}

impl ConfigDocument {
    /// Load and parse the JSON document at `path`.
    ///
    /// `~` is expanded and the path is canonicalized so reports show the
    /// real file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let expanded = expand_tilde(path);
        if !expanded.exists() {
            return Err(ConfigError::NotFound { path: expanded });
        }

        let path = expanded.canonicalize().unwrap_or(expanded);
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let value: Value = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "Loaded config document");
        Ok(Self { path, value })
    }

    /// The `gateway` section, with defaults for anything missing.
    pub fn gateway(&self) -> GatewaySection {
        GatewaySection::from_document(&self.value)
    }

    /// Enabled and disabled channels, in document order.
    pub fn channels(&self) -> Vec<(String, ChannelSection)> {
        views::channels(&self.value)
    }

    /// Permission metadata for the file on this platform.
    pub fn metadata(&self, ops: &dyn PermissionOps) -> FileMetadata {
        match Platform::current() {
            Platform::NonPosix => FileMetadata::non_posix(&self.path),
            Platform::Posix => match ops.mode(&self.path) {
                Ok(mode) => FileMetadata::posix(&self.path, mode),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "Could not read permission bits");
                    FileMetadata {
                        path: self.path.clone(),
                        mode: None,
                        platform: Platform::Posix,
                    }
                }
            },
        }
    }
}

/// Get the configuration directory of the agent runtime.
pub fn config_dir() -> PathBuf {
    dirs_home().join(".openclaw")
}

/// Resolve the default config path.
///
/// Prefers `~/.openclaw/openclaw.json`, falls back to the legacy
/// `~/.clawdbot/clawdbot.json` when only that one exists.
pub fn default_config_path() -> PathBuf {
    let home = dirs_home();
    let current = home.join(".openclaw").join("openclaw.json");
    let legacy = home.join(".clawdbot").join("clawdbot.json");

    if !current.exists() && legacy.exists() {
        tracing::debug!(path = %legacy.display(), "Using legacy config location");
        return legacy;
    }
    current
}

/// Replace a leading `~` with the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs_home().join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_config_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigDocument::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"gateway\": ").unwrap();
        let err = ConfigDocument::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn loads_valid_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"gateway": {{"bind": "all", "port": 18789}}}}"#).unwrap();
        let doc = ConfigDocument::load(file.path()).unwrap();
        assert_eq!(doc.value["gateway"]["bind"], "all");
        assert_eq!(doc.gateway().bind, "all");
        assert!(doc.channels().is_empty());
    }

    #[test]
    fn tilde_is_expanded() {
        let expanded = expand_tilde(Path::new("~/.openclaw/openclaw.json"));
        assert!(!expanded.starts_with("~"));
        assert!(expanded.ends_with(".openclaw/openclaw.json"));

        let untouched = expand_tilde(Path::new("/etc/openclaw.json"));
        assert_eq!(untouched, PathBuf::from("/etc/openclaw.json"));
    }

    #[test]
    fn default_path_is_a_json_file() {
        let path = default_config_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
        assert!(config_dir().ends_with(".openclaw"));
    }
}
