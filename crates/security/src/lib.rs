//! Policy evaluation and remediation engine for ClawGuard.
//!
//! Provides:
//! - **Secrets**: Detect plaintext API keys anywhere in the config
//! - **Permissions**: Flag group/world-readable config files, narrow to 600
//! - **Gateway**: Bind exposure and authentication strength
//! - **Channels**: Open DM and group access policies
//! - **Audit / Harden**: Read-only reports and confirmed, backed-up fixes

pub mod audit;
pub mod changelog;
pub mod channels;
pub mod gateway;
pub mod harden;
pub mod permissions;
pub mod secrets;
pub mod token;

pub use changelog::{ChangeEntry, ChangeLog, ChangeOutcome, ChangeSink, TracingSink};
pub use harden::{Confirm, Confirmation, HardenOutcome, Hardener};
pub use permissions::{PermissionOutcome, SECURE_MODE};
pub use secrets::mask;
pub use token::{generate_token, MIN_TOKEN_LEN};
