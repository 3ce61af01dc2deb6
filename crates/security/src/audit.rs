//! Read-only audit: every evaluator, in a fixed order, into one report.

use clawguard_core::{Component, FileMetadata, Report};
use serde_json::Value;

use crate::{channels, gateway, permissions, secrets};

/// Run all evaluators over `doc` and the file's metadata.
///
/// Never mutates anything and never stops early: a failing section does
/// not hide the ones after it.
pub fn run(doc: &Value, meta: &FileMetadata) -> Report {
    let mut report = Report::new(&meta.path);
    report.push(Component::Permissions, vec![permissions::evaluate(meta)]);
    report.push(Component::Gateway, gateway::evaluate(doc));
    report.push(Component::Channels, channels::evaluate(doc));
    report.push(Component::Secrets, secrets::scan(doc));

    tracing::debug!(
        findings = report.findings().count(),
        worst = %report.worst_severity(),
        "Audit complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use clawguard_core::{Category, Severity};
    use serde_json::json;

    fn meta(mode: u32) -> FileMetadata {
        FileMetadata::posix("/home/u/.openclaw/openclaw.json", mode)
    }

    #[test]
    fn sections_in_fixed_order() {
        let report = run(&json!({}), &meta(0o600));
        let order: Vec<_> = report.sections.iter().map(|s| s.component).collect();
        assert_eq!(
            order,
            vec![
                Component::Permissions,
                Component::Gateway,
                Component::Channels,
                Component::Secrets,
            ]
        );
    }

    #[test]
    fn failures_do_not_short_circuit() {
        let doc = json!({
            "gateway": {"bind": "0.0.0.0", "port": 18789, "auth": {"mode": "none"}},
            "channels": {"telegram": {"enabled": true, "dmPolicy": "open", "groupPolicy": "open"}},
            "models": {"openai": {"apiKey": "sk-abcdef1234567890"}}
        });
        let report = run(&doc, &meta(0o666));

        assert_eq!(report.worst_severity(), Severity::Critical);
        let categories: Vec<_> = report.findings().map(|f| (f.category, f.severity)).collect();
        assert_eq!(
            categories,
            vec![
                (Category::Permissions, Severity::Fail),
                (Category::GatewayBind, Severity::Fail),
                (Category::GatewayAuth, Severity::Critical),
                (Category::ChannelDm, Severity::Fail),
                (Category::ChannelGroup, Severity::Fail),
                (Category::SecretLeak, Severity::Warn),
            ]
        );
    }

    #[test]
    fn input_is_not_mutated() {
        let doc = json!({"gateway": {"bind": "all"}});
        let before = doc.clone();
        let _ = run(&doc, &meta(0o644));
        assert_eq!(doc, before);
    }

    #[test]
    fn clean_config_has_no_problems() {
        let doc = json!({
            "gateway": {"bind": "loopback", "auth": {"mode": "token", "token": "0123456789abcdef0123"}},
            "channels": {"slack": {"enabled": true, "dmPolicy": "allowlist"}}
        });
        let report = run(&doc, &meta(0o600));
        assert_eq!(report.problem_count(), 0);
        assert_eq!(report.worst_severity(), Severity::Pass);
    }
}
