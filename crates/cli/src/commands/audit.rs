//! `clawguard audit`: read-only security report.

use std::path::PathBuf;

use clawguard_security::audit;

use crate::render;

pub fn run(config: Option<PathBuf>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (doc, meta) = super::load(config)?;
    let report = audit::run(&doc.value, &meta);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", render::banner("ClawGuard Audit", "AI Agent Security Config Scanner"));
    println!("Target: {}\n", doc.path.display());
    print!("{}", render::report(&report));

    if report.problem_count() > 0 {
        println!("\nRun `clawguard harden` to fix the remediable issues interactively.");
    }
    Ok(())
}
