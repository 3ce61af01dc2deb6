pub mod audit;
pub mod harden;

use std::path::PathBuf;

use clawguard_config::{default_config_path, ConfigDocument, FsPermissions};
use clawguard_core::FileMetadata;

/// Load the target config, falling back to the default location.
fn load(config: Option<PathBuf>) -> Result<(ConfigDocument, FileMetadata), clawguard_core::Error> {
    let path = config.unwrap_or_else(default_config_path);
    let doc = ConfigDocument::load(&path)?;
    let meta = doc.metadata(&FsPermissions);
    Ok((doc, meta))
}
