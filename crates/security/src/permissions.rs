//! Config file permission checks.
//!
//! The config holds gateway tokens and often API keys, so it should be
//! readable by its owner only.

use clawguard_core::{
    Category, FileMetadata, Finding, PermissionError, PermissionOps, Platform, Severity,
};

/// Owner read/write, nothing else.
pub const SECURE_MODE: u32 = 0o600;

const OTHER_BITS: u32 = 0o007;
const GROUP_BITS: u32 = 0o070;

/// Result of a permission remediation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    /// Mode narrowed from `from` to `to`.
    Applied { from: u32, to: u32 },
    /// Nothing to do.
    AlreadySecure,
    /// No permission bits on this platform.
    NotApplicable,
}

/// Mode the file should have after remediation.
///
/// Always [`SECURE_MODE`], whatever the input.
pub fn target_mode(_current: u32) -> u32 {
    SECURE_MODE
}

/// Classify the file's exposure.
pub fn evaluate(meta: &FileMetadata) -> Finding {
    let location = meta.path.display().to_string();

    let mode = match (meta.platform, meta.mode) {
        (Platform::NonPosix, _) => {
            return Finding::new(
                Category::Permissions,
                Severity::Info,
                location,
                "Permission bits (chmod) do not apply on this platform.",
            )
            .with_fix(
                "Manual check: right-click the file -> Properties -> Security. \
                 Ensure only you and Administrators have read access.",
            );
        }
        (Platform::Posix, None) => {
            return Finding::new(
                Category::Permissions,
                Severity::Info,
                location,
                "Could not read the file's permission bits.",
            )
            .with_fix("Check the file mode manually with `ls -l`; it should be 600.");
        }
        (Platform::Posix, Some(mode)) => mode,
    };

    let octal = format!("{:03o}", mode & 0o777);
    let fix = format!("chmod 600 {location}");

    if mode & OTHER_BITS != 0 {
        Finding::new(
            Category::Permissions,
            Severity::Fail,
            location,
            format!("Config is world-accessible! (chmod {octal})"),
        )
        .remediable()
        .with_fix(fix)
    } else if mode & GROUP_BITS != 0 {
        Finding::new(
            Category::Permissions,
            Severity::Warn,
            location,
            format!("Config is group-accessible (chmod {octal}). Ensure group members are trusted."),
        )
        .remediable()
        .with_fix(fix)
    } else {
        Finding::new(
            Category::Permissions,
            Severity::Pass,
            location,
            "File permissions are secure (user-only).",
        )
    }
}

/// Narrow the file to [`SECURE_MODE`] if it is exposed.
pub fn remediate(
    meta: &FileMetadata,
    ops: &dyn PermissionOps,
) -> Result<PermissionOutcome, PermissionError> {
    let Some(mode) = meta.mode.filter(|_| meta.platform == Platform::Posix) else {
        return Ok(PermissionOutcome::NotApplicable);
    };

    if !evaluate(meta).remediable {
        return Ok(PermissionOutcome::AlreadySecure);
    }

    let to = target_mode(mode);
    ops.set_mode(&meta.path, to)?;
    Ok(PermissionOutcome::Applied { from: mode, to })
}
