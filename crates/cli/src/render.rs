//! Terminal rendering for reports and remediation decisions.
//!
//! Every function here is pure: it takes a value and returns styled text.

use clawguard_core::{Finding, Report, Severity};
use clawguard_security::{ChangeEntry, ChangeOutcome, HardenOutcome};
use crossterm::style::Stylize;

/// Style `text` with the color of `severity`.
pub fn style(severity: Severity, text: &str) -> String {
    match severity {
        Severity::Pass => text.green().to_string(),
        Severity::Info => text.blue().to_string(),
        Severity::Warn => text.yellow().to_string(),
        Severity::Fail => text.red().to_string(),
        Severity::Critical => text.red().bold().to_string(),
    }
}

/// Boxed product banner.
pub fn banner(title: &str, subtitle: &str) -> String {
    let border = "═".repeat(40);
    format!(
        "╔{border}╗\n║{title:^40}║\n║{subtitle:^40}║\n╚{border}╝\n",
    )
    .magenta()
    .bold()
    .to_string()
}

/// Section heading, e.g. `[*] Checking Gateway (API) Security...`.
pub fn heading(text: &str) -> String {
    format!("[*] {text}").blue().to_string()
}

/// One finding, plus its fix when it is a problem.
pub fn finding(finding: &Finding) -> String {
    let mut out = style(
        finding.severity,
        &format!("[{}] {}", finding.severity.label(), finding.message),
    );
    if let Some(fix) = finding.fix.as_deref().filter(|_| finding.severity != Severity::Pass) {
        out.push_str(&format!("\n    {}", format!(">>> FIX: {fix}").yellow()));
    }
    out
}

/// Full audit report, one section per evaluator, then a summary line.
pub fn report(report: &Report) -> String {
    let mut out = String::new();
    for section in &report.sections {
        out.push_str(&heading(&format!("Checking {}...", section.component.title())));
        out.push('\n');
        for f in &section.findings {
            for line in finding(f).lines() {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
        if section.findings.is_empty() {
            out.push_str(&format!("    {}\n", style(Severity::Pass, "[PASS] Nothing found.")));
        }
        out.push('\n');
    }
    out.push_str(&summary(report));
    out
}

/// `=== Audit Complete ===` with per-severity counts.
pub fn summary(report: &Report) -> String {
    let counts = Severity::ALL
        .iter()
        .rev()
        .map(|s| format!("{} {}", report.count(*s), s.label().to_lowercase()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{}\n{}\n",
        "=== Audit Complete ===".magenta(),
        style(report.worst_severity(), &counts)
    )
}

/// One remediation decision, as it happens.
pub fn change(entry: &ChangeEntry) -> String {
    let details = entry
        .details
        .as_deref()
        .map(|d| format!(" ({d})"))
        .unwrap_or_default();
    match entry.outcome {
        ChangeOutcome::Applied => format!("[+] {}{details}", entry.description).green().to_string(),
        ChangeOutcome::Declined => format!("[-] Declined: {}", entry.description)
            .yellow()
            .to_string(),
        ChangeOutcome::Failed => format!("[!] {}{details}", entry.description).red().to_string(),
        ChangeOutcome::Skipped => format!("[=] {}", entry.description).blue().to_string(),
        ChangeOutcome::DryRun => format!("[DRY RUN] {}{details}", entry.description)
            .yellow()
            .to_string(),
    }
}

/// Fatal error line.
pub fn error(message: &str) -> String {
    format!("[!] {message}").red().to_string()
}

/// Closing block of a harden run.
///
/// A generated token is shown only when it differs from `original_token`
/// and actually reached disk.
pub fn harden_summary(outcome: &HardenOutcome, dry_run: bool, original_token: &str) -> String {
    let mut out = format!("\n{}\n", "=== Hardening Complete ===".magenta());

    if let Some(err) = &outcome.write_error {
        out += &error(&format!(
            "{} change(s) were applied in memory but NOT saved: {err}",
            outcome.document_changes
        ));
        out.push('\n');
    } else if dry_run {
        let line = format!(
            "Dry run: {} change(s) would be saved. No files were modified.",
            outcome.document_changes
        );
        out += &format!("{}\n", line.yellow());
    } else if !outcome.document_changed && !outcome.permissions_changed {
        out += "No configuration changes were needed or applied.\n";
    }

    if let Some(backup) = &outcome.backup {
        out += &format!("Backup: {}\n", backup.display());
    }

    let new_token = outcome
        .document
        .pointer("/gateway/auth/token")
        .and_then(|v| v.as_str())
        .filter(|t| outcome.persisted && *t != original_token);
    if let Some(token) = new_token {
        out += &format!(
            "\n{}\n    {token}\n",
            "New gateway token (update your clients, shown once):".yellow().bold()
        );
    }

    if outcome.persisted || outcome.permissions_changed {
        out += &format!(
            "\n{}\n",
            "Restart the gateway to apply changes: openclaw gateway restart".green()
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clawguard_core::{Category, Component, PersistError};
    use clawguard_security::ChangeLog;
    use serde_json::json;
    use std::path::PathBuf;

    const OLD_TOKEN: &str = "0123456789abcdef0123456789abcdef";
    const NEW_TOKEN: &str = "fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210";

    fn outcome(token: &str, persisted: bool) -> HardenOutcome {
        HardenOutcome {
            document: json!({"gateway": {"auth": {"mode": "token", "token": token}}}),
            change_log: ChangeLog::new(),
            document_changed: persisted,
            document_changes: usize::from(persisted),
            permissions_changed: false,
            backup: persisted.then(|| PathBuf::from("/tmp/openclaw.json.bak")),
            persisted,
            write_error: None,
        }
    }

    #[test]
    fn style_keeps_text() {
        for severity in Severity::ALL {
            assert!(style(severity, "hello").contains("hello"));
        }
    }

    #[test]
    fn finding_shows_fix_only_for_problems() {
        let failing = Finding::new(Category::GatewayBind, Severity::Fail, "gateway.bind", "exposed")
            .with_fix("Set gateway.bind to 'loopback'");
        let text = finding(&failing);
        assert!(text.contains("[FAIL] exposed"));
        assert!(text.contains(">>> FIX: Set gateway.bind"));

        let passing = Finding::new(Category::GatewayBind, Severity::Pass, "gateway.bind", "local")
            .with_fix("irrelevant");
        assert!(!finding(&passing).contains("FIX"));
    }

    #[test]
    fn report_has_headings_and_summary() {
        let mut r = Report::new("/tmp/openclaw.json");
        r.push(
            Component::Gateway,
            vec![Finding::new(Category::GatewayAuth, Severity::Critical, "gateway.auth.mode", "disabled")],
        );
        r.push(Component::Secrets, vec![]);

        let text = report(&r);
        assert!(text.contains("Checking Gateway (API) Security..."));
        assert!(text.contains("[CRITICAL] disabled"));
        assert!(text.contains("Nothing found."));
        assert!(text.contains("=== Audit Complete ==="));
        assert!(text.contains("1 critical, 0 fail, 0 warn, 0 info, 0 pass"));
    }

    #[test]
    fn banner_centers_title() {
        let text = banner("ClawGuard Audit", "AI Agent Security Config Scanner");
        assert!(text.contains("ClawGuard Audit"));
        assert!(text.contains("╔"));
    }

    #[test]
    fn change_lines_by_outcome() {
        let line = |outcome| {
            let mut log = ChangeLog::new();
            log.record(
                "gateway.bind",
                "Change bind to 'loopback' (localhost only)?",
                outcome,
                Some("gateway.bind = \"loopback\"".into()),
            );
            change(&log.entries()[0])
        };
        assert!(line(ChangeOutcome::Applied).contains("[+]"));
        assert!(line(ChangeOutcome::Applied).contains("gateway.bind = \"loopback\""));
        assert!(line(ChangeOutcome::Declined).contains("Declined"));
        assert!(line(ChangeOutcome::Failed).contains("[!]"));
        assert!(line(ChangeOutcome::DryRun).contains("[DRY RUN]"));
    }

    #[test]
    fn new_token_shown_once_saved() {
        let text = harden_summary(&outcome(NEW_TOKEN, true), false, OLD_TOKEN);
        assert!(text.contains("=== Hardening Complete ==="));
        assert!(text.contains("shown once"));
        assert!(text.contains(NEW_TOKEN));
        assert!(text.contains("Backup: /tmp/openclaw.json.bak"));
        assert!(text.contains("openclaw gateway restart"));
    }

    #[test]
    fn unchanged_token_not_shown() {
        let text = harden_summary(&outcome(OLD_TOKEN, true), false, OLD_TOKEN);
        assert!(!text.contains(OLD_TOKEN));
        assert!(!text.contains("shown once"));
    }

    #[test]
    fn unsaved_token_not_shown() {
        let mut failed = outcome(NEW_TOKEN, false);
        failed.document_changed = true;
        failed.document_changes = 2;
        failed.write_error = Some(PersistError::Write {
            path: PathBuf::from("/tmp/openclaw.json"),
            reason: "disk full".into(),
        });

        let text = harden_summary(&failed, false, OLD_TOKEN);
        assert!(text.contains("2 change(s) were applied in memory but NOT saved"));
        assert!(text.contains("disk full"));
        assert!(!text.contains(NEW_TOKEN));
        assert!(!text.contains("restart"));
    }

    #[test]
    fn dry_run_summary_mentions_nothing_written() {
        let mut dry = outcome(NEW_TOKEN, false);
        dry.document_changed = true;
        dry.document_changes = 3;

        let text = harden_summary(&dry, true, OLD_TOKEN);
        assert!(text.contains("Dry run: 3 change(s) would be saved. No files were modified."));
        assert!(!text.contains(NEW_TOKEN));
        assert!(!text.contains("Backup:"));
    }

    #[test]
    fn nothing_to_do() {
        let text = harden_summary(&outcome(OLD_TOKEN, false), false, OLD_TOKEN);
        assert!(text.contains("No configuration changes were needed or applied."));
        assert!(!text.contains("restart"));
    }
}
