//! # ClawGuard Core
//!
//! Domain types, collaborator traits, and error definitions for the
//! ClawGuard config auditor. This crate does no I/O; it defines the
//! vocabulary that the evaluators and the CLI are written against.
//!
//! ## Design Philosophy
//!
//! Filesystem access is defined as a trait here. Implementations live in
//! `clawguard-config`. This enables:
//! - Deterministic tests of the remediation flow with fake stores
//! - Fail-closed checks (a failing backup) without touching real files
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod finding;
pub mod ops;
pub mod remediation;
pub mod report;

// Re-export key types at crate root for ergonomics
pub use error::{ConfigError, DocumentError, Error, PermissionError, PersistError, Result};
pub use finding::{Category, Finding, Severity};
pub use ops::{ConfigStore, FileMetadata, PermissionOps, Platform};
pub use remediation::{DocPath, FieldChange, Proposal};
pub use report::{Component, Report, ReportSection};
