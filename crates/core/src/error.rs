//! Error types for the ClawGuard domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;

use thiserror::Error;

/// The top-level error type for all ClawGuard operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Config document errors ---
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    // --- Backup / write errors ---
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    // --- OS permission errors ---
    #[error("Permission error: {0}")]
    Permission(#[from] PermissionError),

    // --- In-memory document edits ---
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Loading the config document failed. Terminal for both modes.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found at {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read config file at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Backup creation or final persistence failed.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to create backup of {path}: {reason}")]
    Backup { path: PathBuf, reason: String },

    #[error("Backup at {path} does not match the original file")]
    BackupMismatch { path: PathBuf },

    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

/// Reading or changing file permission bits failed.
#[derive(Debug, Clone, Error)]
pub enum PermissionError {
    #[error("File permission bits are not supported on this platform")]
    Unsupported,

    #[error("Not allowed to change permissions of {path}: {reason}")]
    Denied { path: PathBuf, reason: String },

    #[error("Failed to access {path}: {reason}")]
    Io { path: PathBuf, reason: String },
}

/// Applying a change to the in-memory JSON document failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Cannot set '{location}': parent is not a JSON object")]
    NotAMapping { location: String },

    #[error("Empty document location")]
    EmptyLocation,
}
