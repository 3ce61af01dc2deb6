//! Change log: every remediation decision, in the order it was made.
//!
//! Entries are kept in memory and forwarded to sinks as they happen, so a
//! terminal sink can report each decision live.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single remediation decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub timestamp: DateTime<Utc>,
    /// Document location or file path the decision is about.
    pub location: String,
    pub description: String,
    pub outcome: ChangeOutcome,
    pub details: Option<String>,
}

/// What happened to a proposed change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOutcome {
    /// Change made (in memory for document edits, on disk for chmod/save).
    Applied,
    /// Operator said no.
    Declined,
    /// Attempted and failed.
    Failed,
    /// Nothing to do on this platform or already compliant.
    Skipped,
    /// Would have been written, but this is a dry run.
    DryRun,
}

/// Trait for change log sinks (where decisions are reported).
pub trait ChangeSink {
    fn record(&self, entry: &ChangeEntry);
}

/// Ordered record of remediation decisions.
pub struct ChangeLog {
    entries: Vec<ChangeEntry>,
    sinks: Vec<Box<dyn ChangeSink>>,
}

impl std::fmt::Debug for ChangeLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeLog")
            .field("entry_count", &self.entries.len())
            .field("sink_count", &self.sinks.len())
            .finish()
    }
}

impl Default for ChangeLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeLog {
    /// Create a new change log with no sinks.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            sinks: Vec::new(),
        }
    }

    /// Create a new change log with the given sinks.
    pub fn with_sinks(sinks: Vec<Box<dyn ChangeSink>>) -> Self {
        Self {
            entries: Vec::new(),
            sinks,
        }
    }

    /// Record a decision.
    pub fn record(
        &mut self,
        location: &str,
        description: &str,
        outcome: ChangeOutcome,
        details: Option<String>,
    ) {
        let entry = ChangeEntry {
            timestamp: Utc::now(),
            location: location.into(),
            description: description.into(),
            outcome,
            details,
        };

        for sink in &self.sinks {
            sink.record(&entry);
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn entries_by_outcome(&self, outcome: ChangeOutcome) -> Vec<&ChangeEntry> {
        self.entries.iter().filter(|e| e.outcome == outcome).collect()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

/// A tracing-based sink that logs each decision.
///
/// Details never carry generated secrets, so they are safe to log.
pub struct TracingSink;

impl ChangeSink for TracingSink {
    fn record(&self, entry: &ChangeEntry) {
        match entry.outcome {
            ChangeOutcome::Failed => {
                tracing::warn!(
                    location = %entry.location,
                    details = ?entry.details,
                    "{}",
                    entry.description
                );
            }
            _ => {
                tracing::info!(
                    location = %entry.location,
                    outcome = ?entry.outcome,
                    details = ?entry.details,
                    "{}",
                    entry.description
                );
            }
        }
    }
}
