//! Channel access policies: who may DM the bot or talk to it in groups.
//!
//! Disabled channels are skipped entirely: whatever their policy says,
//! they accept no traffic.

use clawguard_config::views::{channels, has_channels};
use clawguard_config::ChannelSection;
use clawguard_core::{Category, DocPath, FieldChange, Finding, Proposal, Severity};
use serde_json::Value;

/// DM policy applied to open channels.
pub const SAFE_DM_POLICY: &str = "pairing";

/// Group policy applied to open channels.
pub const SAFE_GROUP_POLICY: &str = "allowlist";

fn dm_path(name: &str) -> DocPath {
    DocPath::new(["channels", name, "dmPolicy"])
}
fn group_path(name: &str) -> DocPath {
    DocPath::new(["channels", name, "groupPolicy"])
}

/// Evaluate every enabled channel, in document order.
pub fn evaluate(doc: &Value) -> Vec<Finding> {
    if !has_channels(doc) {
        return vec![Finding::new(
            Category::ChannelDm,
            Severity::Info,
            "channels",
            "No channels configured.",
        )];
    }

    enabled(doc)
        .flat_map(|(name, settings)| [dm_finding(&name, &settings), group_finding(&name, &settings)])
        .collect()
}

/// Fixes for open DM and group policies.
pub fn proposals(doc: &Value) -> Vec<Proposal> {
    let mut out = Vec::new();

    for (name, settings) in enabled(doc) {
        let dm = dm_finding(&name, &settings);
        if dm.remediable {
            out.push(Proposal::new(
                dm,
                format!("Change '{name}' DM policy to '{SAFE_DM_POLICY}'?"),
                vec![FieldChange::new(dm_path(&name), SAFE_DM_POLICY)],
            ));
        }

        let group = group_finding(&name, &settings);
        if group.remediable {
            out.push(Proposal::new(
                group,
                format!("Change '{name}' group policy to '{SAFE_GROUP_POLICY}'?"),
                vec![FieldChange::new(group_path(&name), SAFE_GROUP_POLICY)],
            ));
        }
    }

    out
}

fn enabled(doc: &Value) -> impl Iterator<Item = (String, ChannelSection)> {
    channels(doc).into_iter().filter(|(name, settings)| {
        if !settings.enabled {
            tracing::debug!(channel = %name, "Skipping disabled channel");
        }
        settings.enabled
    })
}

fn dm_finding(name: &str, settings: &ChannelSection) -> Finding {
    let location = dm_path(name).to_string();
    match settings.dm_policy.as_str() {
        "open" => Finding::new(
            Category::ChannelDm,
            Severity::Fail,
            location,
            format!("'{name}' DM policy is 'open'. Anyone can message this bot."),
        )
        .remediable()
        .with_fix(format!("Set dmPolicy to '{SAFE_DM_POLICY}'")),
        "pairing" => Finding::new(
            Category::ChannelDm,
            Severity::Pass,
            location,
            format!("'{name}' DM policy is 'pairing' (requires auth code)."),
        ),
        "allowlist" => Finding::new(
            Category::ChannelDm,
            Severity::Pass,
            location,
            format!("'{name}' DM policy is 'allowlist' (strict)."),
        ),
        other => Finding::new(
            Category::ChannelDm,
            Severity::Warn,
            location,
            format!("'{name}' has unknown DM policy '{other}'."),
        ),
    }
}

fn group_finding(name: &str, settings: &ChannelSection) -> Finding {
    let location = group_path(name).to_string();
    match settings.group_policy.as_str() {
        "open" => Finding::new(
            Category::ChannelGroup,
            Severity::Fail,
            location,
            format!("'{name}' group policy is 'open'. Bot will reply to anyone in groups."),
        )
        .remediable()
        .with_fix(format!("Set groupPolicy to '{SAFE_GROUP_POLICY}'")),
        other => Finding::new(
            Category::ChannelGroup,
            Severity::Pass,
            location,
            format!("'{name}' group policy is '{other}'."),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn open_dm_fails() {
        let doc = json!({"channels": {"telegram": {"enabled": true, "dmPolicy": "open"}}});
        let findings = evaluate(&doc);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].category, Category::ChannelDm);
        assert_eq!(findings[0].severity, Severity::Fail);
        assert_eq!(findings[0].location, "channels.telegram.dmPolicy");
        assert!(findings[0].remediable);
        assert_eq!(findings[1].severity, Severity::Pass);
    }

    #[test]
    fn safe_dm_policies_pass() {
        for policy in ["pairing", "allowlist"] {
            let doc = json!({"channels": {"slack": {"enabled": true, "dmPolicy": policy}}});
            assert_eq!(evaluate(&doc)[0].severity, Severity::Pass);
            assert!(proposals(&doc).is_empty());
        }
    }

    #[test]
    fn unknown_dm_policy_warns_without_fix() {
        let doc = json!({"channels": {"slack": {"enabled": true, "dmPolicy": "friends"}}});
        let findings = evaluate(&doc);
        assert_eq!(findings[0].severity, Severity::Warn);
        assert!(!findings[0].remediable);
        assert!(proposals(&doc).is_empty());
    }

    #[test]
    fn open_group_fails_and_is_fixable() {
        let doc = json!({"channels": {"discord": {"enabled": true, "groupPolicy": "open"}}});
        let findings = evaluate(&doc);
        assert_eq!(findings[1].category, Category::ChannelGroup);
        assert_eq!(findings[1].severity, Severity::Fail);

        let proposals = proposals(&doc);
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].changes[0].location.to_string(), "channels.discord.groupPolicy");
        assert_eq!(proposals[0].changes[0].value, json!("allowlist"));
    }

    #[test]
    fn disabled_channels_are_silent() {
        let doc = json!({"channels": {
            "off": {"enabled": false, "dmPolicy": "open", "groupPolicy": "open"},
            "absent": {"dmPolicy": "open"}
        }});
        assert!(evaluate(&doc).is_empty());
        assert!(proposals(&doc).is_empty());
    }

    #[test]
    fn no_channels_is_info() {
        for doc in [json!({}), json!({"channels": {}})] {
            let findings = evaluate(&doc);
            assert_eq!(findings.len(), 1);
            assert_eq!(findings[0].severity, Severity::Info);
            assert!(proposals(&doc).is_empty());
        }
    }

    #[test]
    fn proposals_follow_channel_order() {
        let doc = json!({"channels": {
            "whatsapp": {"enabled": true, "dmPolicy": "open", "groupPolicy": "open"},
            "telegram": {"enabled": true, "dmPolicy": "open"}
        }});
        let locations: Vec<_> = proposals(&doc)
            .iter()
            .map(|p| p.changes[0].location.to_string())
            .collect();
        assert_eq!(
            locations,
            vec![
                "channels.whatsapp.dmPolicy",
                "channels.whatsapp.groupPolicy",
                "channels.telegram.dmPolicy",
            ]
        );
    }
}
