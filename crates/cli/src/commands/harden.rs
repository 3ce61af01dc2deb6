//! `clawguard harden`: confirmed, backed-up remediation.

use std::path::PathBuf;

use clawguard_config::{FsPermissions, FsStore};
use clawguard_security::{
    audit, ChangeEntry, ChangeSink, Confirm, Confirmation, Hardener, TracingSink,
};
use crossterm::style::Stylize;

use crate::prompt::LinePrompt;
use crate::render;

/// Prints each remediation decision as it is made.
struct TerminalSink;

impl ChangeSink for TerminalSink {
    fn record(&self, entry: &ChangeEntry) {
        println!("    {}", render::change(entry));
    }
}

fn accept_all(_: &Confirmation<'_>) -> bool {
    true
}

pub fn run(
    config: Option<PathBuf>,
    dry_run: bool,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (doc, meta) = super::load(config)?;

    println!("{}", render::banner("ClawGuard Harden", "Interactive Security Remediation"));
    println!("Target: {}", doc.path.display());
    if dry_run {
        println!("{}", "Dry run: nothing will be written to disk.".yellow());
    }
    println!();
    print!("{}", render::report(&audit::run(&doc.value, &meta)));
    println!();
    println!("{}", render::heading("Applying fixes..."));

    let original_token = doc.gateway().auth.token;
    let mut confirm: Box<dyn Confirm> = if yes {
        Box::new(accept_all)
    } else {
        Box::new(LinePrompt::stdin())
    };

    let outcome = Hardener::new(&FsStore, &FsPermissions)
        .dry_run(dry_run)
        .with_sink(Box::new(TerminalSink))
        .with_sink(Box::new(TracingSink))
        .run(doc.value, &meta, confirm.as_mut())
        .inspect_err(|e| tracing::error!(error = %e, "Harden aborted, config untouched"))?;

    print!("{}", render::harden_summary(&outcome, dry_run, &original_token));

    Ok(())
}
