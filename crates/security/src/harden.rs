//! Interactive remediation.
//!
//! Order of operations:
//! 1. Back up the config (skipped in dry-run). No backup, no changes.
//! 2. Narrow file permissions. OS-level only, never dirties the document.
//! 3. Gateway fixes, each confirmed on its own.
//! 4. Channel fixes, same discipline.
//! 5. Write the document once, if anything in it changed.

use std::path::PathBuf;

use clawguard_core::{
    ConfigStore, Error, FileMetadata, Finding, PermissionOps, PersistError, Proposal,
};
use serde_json::Value;

use crate::changelog::{ChangeLog, ChangeOutcome, ChangeSink};
use crate::permissions::{self, PermissionOutcome, SECURE_MODE};
use crate::token::generate_token;
use crate::{channels, gateway};

/// Something the operator is asked to approve.
#[derive(Debug, Clone, Copy)]
pub enum Confirmation<'a> {
    /// chmod the config file to `target_mode`.
    Permissions {
        finding: &'a Finding,
        target_mode: u32,
    },
    /// Apply a document edit.
    Change(&'a Proposal),
}

impl Confirmation<'_> {
    pub fn finding(&self) -> &Finding {
        match self {
            Self::Permissions { finding, .. } => finding,
            Self::Change(proposal) => &proposal.finding,
        }
    }

    /// The yes/no question for the operator.
    pub fn question(&self) -> String {
        match self {
            Self::Permissions { target_mode, .. } => {
                format!("Fix permissions to {target_mode:o} (user-only)?")
            }
            Self::Change(proposal) => proposal.description.clone(),
        }
    }
}

/// Decides whether a proposed fix goes ahead.
pub trait Confirm {
    fn confirm(&mut self, request: &Confirmation<'_>) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Confirmation<'_>) -> bool,
{
    fn confirm(&mut self, request: &Confirmation<'_>) -> bool {
        self(request)
    }
}

/// Everything a harden run did.
#[derive(Debug)]
pub struct HardenOutcome {
    /// The document after all confirmed edits.
    pub document: Value,
    pub change_log: ChangeLog,
    /// At least one document edit was applied (in memory).
    pub document_changed: bool,
    /// Number of document edits applied.
    pub document_changes: usize,
    pub permissions_changed: bool,
    pub backup: Option<PathBuf>,
    /// The document was written back to disk.
    pub persisted: bool,
    /// Final write failed; in-memory edits are not durable.
    pub write_error: Option<PersistError>,
}

const SAVE_LOCATION: &str = "(config file)";

/// Remediation orchestrator.
pub struct Hardener<'a> {
    store: &'a dyn ConfigStore,
    perms: &'a dyn PermissionOps,
    dry_run: bool,
    sinks: Vec<Box<dyn ChangeSink>>,
    new_token: fn() -> String,
}

impl<'a> Hardener<'a> {
    pub fn new(store: &'a dyn ConfigStore, perms: &'a dyn PermissionOps) -> Self {
        Self {
            store,
            perms,
            dry_run: false,
            sinks: Vec::new(),
            new_token: generate_token,
        }
    }

    /// Evaluate and apply in memory, but write nothing.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn ChangeSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Replace the token generator (tests).
    pub fn with_token_generator(mut self, new_token: fn() -> String) -> Self {
        self.new_token = new_token;
        self
    }

    /// Run the full remediation flow.
    ///
    /// Only a failed backup is an error: it aborts before anything is
    /// touched. Every other failure is recorded in the change log.
    pub fn run(
        self,
        doc: Value,
        meta: &FileMetadata,
        confirm: &mut dyn Confirm,
    ) -> Result<HardenOutcome, Error> {
        let mut log = ChangeLog::with_sinks(self.sinks);
        let backup = if self.dry_run {
            None
        } else {
            match self.store.backup(&meta.path) {
                Ok(path) => {
                    log.record(
                        SAVE_LOCATION,
                        "Created backup",
                        ChangeOutcome::Applied,
                        Some(path.display().to_string()),
                    );
                    Some(path)
                }
                Err(e) => {
                    log.record(
                        SAVE_LOCATION,
                        "Aborting due to backup failure",
                        ChangeOutcome::Failed,
                        Some(e.to_string()),
                    );
                    return Err(e.into());
                }
            }
        };

        let permissions_changed =
            harden_permissions(meta, self.perms, self.dry_run, confirm, &mut log);

        let mut document = doc;
        let mut proposals = gateway::proposals(&document, self.new_token);
        proposals.extend(channels::proposals(&document));

        let mut document_changes = 0;
        for proposal in &proposals {
            if resolve(proposal, &mut document, confirm, &mut log) {
                document_changes += 1;
            }
        }
        let document_changed = document_changes > 0;

        let mut persisted = false;
        let mut write_error = None;
        if document_changed {
            if self.dry_run {
                log.record(
                    SAVE_LOCATION,
                    "Config would be saved now",
                    ChangeOutcome::DryRun,
                    None,
                );
            } else {
                match self.store.write(&meta.path, &document) {
                    Ok(()) => {
                        persisted = true;
                        log.record(
                            SAVE_LOCATION,
                            "Configuration saved",
                            ChangeOutcome::Applied,
                            Some(meta.path.display().to_string()),
                        );
                    }
                    Err(e) => {
                        log.record(
                            SAVE_LOCATION,
                            "Configuration not saved; changes are not durable",
                            ChangeOutcome::Failed,
                            Some(e.to_string()),
                        );
                        write_error = Some(e);
                    }
                }
            }
        }

        Ok(HardenOutcome {
            document,
            change_log: log,
            document_changed,
            document_changes,
            permissions_changed,
            backup,
            persisted,
            write_error,
        })
    }
}

fn harden_permissions(
    meta: &FileMetadata,
    ops: &dyn PermissionOps,
    dry_run: bool,
    confirm: &mut dyn Confirm,
    log: &mut ChangeLog,
) -> bool {
    let finding = permissions::evaluate(meta);
    let location = finding.location.clone();

    if !finding.remediable {
        let reason = if meta.mode.is_some() {
            "Permissions are already secure"
        } else {
            "Skipping chmod; restrict file permissions manually"
        };
        log.record(&location, reason, ChangeOutcome::Skipped, finding.fix.clone());
        return false;
    }

    let request = Confirmation::Permissions {
        finding: &finding,
        target_mode: SECURE_MODE,
    };
    let description = request.question();
    if !confirm.confirm(&request) {
        log.record(&location, &description, ChangeOutcome::Declined, None);
        return false;
    }

    if dry_run {
        log.record(
            &location,
            &description,
            ChangeOutcome::DryRun,
            Some(format!("would chmod {SECURE_MODE:o}")),
        );
        return false;
    }

    match permissions::remediate(meta, ops) {
        Ok(PermissionOutcome::Applied { from, to }) => {
            log.record(
                &location,
                &description,
                ChangeOutcome::Applied,
                Some(format!("{:03o} -> {to:o}", from & 0o777)),
            );
            true
        }
        Ok(_) => {
            log.record(&location, &description, ChangeOutcome::Skipped, None);
            false
        }
        Err(e) => {
            log.record(&location, &description, ChangeOutcome::Failed, Some(e.to_string()));
            false
        }
    }
}

/// Confirm and apply one proposal. Returns whether the document changed.
fn resolve(
    proposal: &Proposal,
    document: &mut Value,
    confirm: &mut dyn Confirm,
    log: &mut ChangeLog,
) -> bool {
    if proposal.requires_confirmation && !confirm.confirm(&Confirmation::Change(proposal)) {
        log.record(
            proposal.location(),
            &proposal.description,
            ChangeOutcome::Declined,
            None,
        );
        return false;
    }

    match proposal.apply(document) {
        Ok(()) => {
            let details = proposal
                .changes
                .iter()
                .map(|c| format!("{} = {}", c.location, c.display_value()))
                .collect::<Vec<_>>()
                .join(", ");
            log.record(
                proposal.location(),
                &proposal.description,
                ChangeOutcome::Applied,
                Some(details),
            );
            true
        }
        Err(e) => {
            log.record(
                proposal.location(),
                &proposal.description,
                ChangeOutcome::Failed,
                Some(e.to_string()),
            );
            false
        }
    }
}
