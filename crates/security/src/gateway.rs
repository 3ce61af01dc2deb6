//! Gateway policy: bind address exposure and authentication strength.
//!
//! Rules:
//! - Bound to every interface (`0.0.0.0`, `all`, `::`) → fail, rebind to `loopback`
//! - Bound to a local interface → pass
//! - Anything else is a custom address → warn, never changed automatically
//! - `auth.mode = "none"` → critical, enable token auth with a fresh token
//! - Token shorter than [`MIN_TOKEN_LEN`] → warn, rotate
//! - Any other auth mode is managed elsewhere → pass
//! - `gateway` or `gateway.auth` not an object → warn, left for the operator

use clawguard_config::GatewaySection;
use clawguard_core::{Category, DocPath, FieldChange, Finding, Proposal, Severity};
use serde_json::Value;

use crate::token::{is_strong, MIN_TOKEN_LEN};

/// Bind values that expose the gateway to the network.
pub const EXPOSED_BINDS: [&str; 3] = ["0.0.0.0", "all", "::"];

/// Bind values that keep the gateway on the local machine.
pub const LOCAL_BINDS: [&str; 3] = ["loopback", "localhost", "127.0.0.1"];

fn bind_path() -> DocPath {
    DocPath::new(["gateway", "bind"])
}
fn mode_path() -> DocPath {
    DocPath::new(["gateway", "auth", "mode"])
}
fn token_path() -> DocPath {
    DocPath::new(["gateway", "auth", "token"])
}

/// Evaluate the gateway section. Always yields a bind and an auth finding.
pub fn evaluate(doc: &Value) -> Vec<Finding> {
    let gateway = GatewaySection::from_document(doc);
    tracing::debug!(bind = %gateway.bind, mode = %gateway.auth.mode, "Evaluating gateway");
    vec![bind_finding(&gateway), auth_finding(&gateway)]
}

/// Fixes for the remediable gateway findings.
///
/// `new_token` is only called when a token is actually needed.
pub fn proposals(doc: &Value, new_token: impl FnOnce() -> String) -> Vec<Proposal> {
    let gateway = GatewaySection::from_document(doc);
    let mut out = Vec::new();

    let bind = bind_finding(&gateway);
    if bind.remediable {
        out.push(Proposal::new(
            bind,
            "Change bind to 'loopback' (localhost only)?",
            vec![FieldChange::new(bind_path(), "loopback")],
        ));
    }

    let auth = auth_finding(&gateway);
    if auth.remediable {
        let proposal = if gateway.auth.mode == "none" {
            Proposal::new(
                auth,
                "Enable token authentication?",
                vec![
                    FieldChange::new(mode_path(), "token"),
                    FieldChange::sensitive(token_path(), new_token()),
                ],
            )
        } else {
            Proposal::new(
                auth,
                "Rotate to a new strong token?",
                vec![FieldChange::sensitive(token_path(), new_token())],
            )
        };
        out.push(proposal);
    }

    out
}

fn bind_finding(gateway: &GatewaySection) -> Finding {
    let bind = gateway.bind.as_str();
    let location = bind_path().to_string();

    if gateway.malformed {
        Finding::new(
            Category::GatewayBind,
            Severity::Warn,
            "gateway",
            "Gateway section is not an object. Bind address cannot be verified.",
        )
        .with_fix("Replace gateway with an object, e.g. {\"bind\": \"loopback\"}")
    } else if EXPOSED_BINDS.contains(&bind) {
        Finding::new(
            Category::GatewayBind,
            Severity::Fail,
            location,
            format!(
                "Gateway bound to '{bind}' on port {}. Exposed to network!",
                gateway.port_display()
            ),
        )
        .remediable()
        .with_fix("Set gateway.bind to 'loopback'")
    } else if LOCAL_BINDS.contains(&bind) {
        Finding::new(
            Category::GatewayBind,
            Severity::Pass,
            location,
            format!("Gateway bound to local interface ({bind})."),
        )
    } else {
        Finding::new(
            Category::GatewayBind,
            Severity::Warn,
            location,
            format!("Custom bind address '{bind}'. Verify this is intended."),
        )
    }
}

fn auth_finding(gateway: &GatewaySection) -> Finding {
    if gateway.malformed || gateway.auth.malformed {
        return Finding::new(
            Category::GatewayAuth,
            Severity::Warn,
            "gateway.auth",
            "Gateway auth section is not an object. Authentication cannot be verified.",
        )
        .with_fix("Replace gateway.auth with an object, e.g. {\"mode\": \"token\", \"token\": \"...\"}");
    }

    let mode = gateway.auth.mode.as_str();

    match mode {
        "none" => Finding::new(
            Category::GatewayAuth,
            Severity::Critical,
            mode_path().to_string(),
            "Gateway authentication is DISABLED (mode='none'). Full remote control possible.",
        )
        .remediable()
        .with_fix("Switch gateway.auth.mode to 'token' with a generated token"),
        "token" if !is_strong(&gateway.auth.token) => Finding::new(
            Category::GatewayAuth,
            Severity::Warn,
            token_path().to_string(),
            format!("Gateway token appears short/weak (<{MIN_TOKEN_LEN} chars)."),
        )
        .remediable()
        .with_fix("Rotate gateway.auth.token to a generated token"),
        "token" => Finding::new(
            Category::GatewayAuth,
            Severity::Pass,
            mode_path().to_string(),
            "Gateway authentication enabled (token mode).",
        ),
        other => Finding::new(
            Category::GatewayAuth,
            Severity::Pass,
            mode_path().to_string(),
            format!("Gateway auth mode: {other}"),
        ),
    }
}
