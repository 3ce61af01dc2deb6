//! Hardcoded secret detection.
//!
//! Walks the whole document, untyped, and flags string values that start
//! with a well-known credential prefix. Detected values are only ever
//! rendered masked.

use clawguard_core::{Category, Finding, Severity};
use serde_json::Value;

/// Prefixes of vendor API keys and tokens.
pub const SECRET_PREFIXES: [&str; 5] = ["sk-", "AIza", "xoxb-", "xoxp-", "ghp_"];

/// Scan every string leaf of `doc` for embedded credentials.
///
/// Object members get `parent.key` locations, array elements
/// `parent[index]`.
pub fn scan(doc: &Value) -> Vec<Finding> {
    let mut findings = Vec::new();
    walk(doc, "", None, &mut findings);
    tracing::debug!(count = findings.len(), "Secret scan complete");
    findings
}

fn walk(node: &Value, path: &str, key: Option<&str>, out: &mut Vec<Finding>) {
    match node {
        Value::Object(map) => {
            for (k, v) in map {
                let child = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                walk(v, &child, Some(k), out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                walk(v, &format!("{path}[{i}]"), key, out);
            }
        }
        Value::String(s) => {
            if looks_like_secret(s) {
                out.push(secret_finding(path, s, key));
            }
        }
        Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}

/// Whether `value` starts with one of [`SECRET_PREFIXES`].
pub fn looks_like_secret(value: &str) -> bool {
    SECRET_PREFIXES.iter().any(|p| value.starts_with(p))
}

/// Render a secret as `<first4>...<last4>`.
///
/// Anything of 8 characters or fewer is fully hidden, otherwise the two
/// halves would add up to the whole value.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

fn secret_finding(path: &str, secret: &str, key: Option<&str>) -> Finding {
    let location = if path.is_empty() { "(root)" } else { path };
    let env_name = match key {
        Some(k) => format!("{}_KEY", k.to_uppercase()),
        None => "API_KEY".to_string(),
    };

    Finding::new(
        Category::SecretLeak,
        Severity::Warn,
        location,
        format!(
            "Found potential API key at '{location}': {}. Plaintext secrets in config files are easily leaked (git, backups, logs).",
            mask(secret)
        ),
    )
    .with_fix(format!(
        "Remove this key from the config file and set it as an environment variable instead, \
         e.g. export {env_name}=\"...\" (check the plugin docs for the exact variable name)"
    ))
}
