//! Typed read views of the `gateway` and `channels` sections.
//!
//! The config file belongs to another program, so every field is read
//! leniently: a value of the wrong JSON type never fails the load. Scalars
//! are rendered to their JSON text (and then evaluate as an unknown value).
//! A non-object `gateway` or `gateway.auth` is read as defaults with its
//! `malformed` flag set; a non-object channel counts as disabled.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// The gateway (control-plane listener) settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewaySection {
    #[serde(default = "default_bind", deserialize_with = "lenient_string")]
    pub bind: String,

    /// Informational only; rendered as text.
    #[serde(default, deserialize_with = "lenient_port")]
    pub port: Option<String>,

    #[serde(default, deserialize_with = "lenient_auth")]
    pub auth: AuthSection,

    /// `gateway` is present but not an object.
    #[serde(skip)]
    pub malformed: bool,
}

fn default_bind() -> String {
    "loopback".into()
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: None,
            auth: AuthSection::default(),
            malformed: false,
        }
    }
}

impl GatewaySection {
    /// Read `gateway` from the document root; defaults if absent or malformed.
    pub fn from_document(doc: &Value) -> Self {
        match doc.get("gateway") {
            None | Some(Value::Null) => Self::default(),
            Some(v) if v.is_object() => lenient_from_value(v.clone()),
            Some(_) => Self {
                malformed: true,
                ..Self::default()
            },
        }
    }

    /// Port for display, `unknown` when not set.
    pub fn port_display(&self) -> &str {
        self.port.as_deref().unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthSection {
    #[serde(default = "default_auth_mode", deserialize_with = "lenient_string")]
    pub mode: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub token: String,

    /// `auth` is present but not an object.
    #[serde(skip)]
    pub malformed: bool,
}

fn default_auth_mode() -> String {
    "token".into()
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            mode: default_auth_mode(),
            token: String::new(),
            malformed: false,
        }
    }
}

/// Settings of one communication channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelSection {
    /// Only a literal `true` enables a channel.
    #[serde(default, deserialize_with = "lenient_true")]
    pub enabled: bool,

    #[serde(
        rename = "dmPolicy",
        default = "default_dm_policy",
        deserialize_with = "lenient_string"
    )]
    pub dm_policy: String,

    #[serde(
        rename = "groupPolicy",
        default = "default_group_policy",
        deserialize_with = "lenient_string"
    )]
    pub group_policy: String,
}

fn default_dm_policy() -> String {
    "pairing".into()
}
fn default_group_policy() -> String {
    "allowlist".into()
}

impl Default for ChannelSection {
    fn default() -> Self {
        Self {
            enabled: false,
            dm_policy: default_dm_policy(),
            group_policy: default_group_policy(),
        }
    }
}

/// All entries of `channels`, in document order.
///
/// A channel whose settings are not an object is reported as disabled.
pub fn channels(doc: &Value) -> Vec<(String, ChannelSection)> {
    doc.get("channels")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .map(|(name, settings)| (name.clone(), lenient_from_value(settings.clone())))
                .collect()
        })
        .unwrap_or_default()
}

/// Whether `channels` exists and has at least one entry.
pub fn has_channels(doc: &Value) -> bool {
    doc.get("channels")
        .and_then(Value::as_object)
        .is_some_and(|map| !map.is_empty())
}

fn lenient_from_value<T: DeserializeOwned + Default>(value: Value) -> T {
    serde_json::from_value(value).unwrap_or_default()
}

fn scalar_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(scalar_text)
}

fn lenient_port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Value::deserialize(deserializer).map(|v| match v {
        Value::Null => None,
        other => Some(scalar_text(other)),
    })
}

fn lenient_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Value::deserialize(deserializer).map(|v| v == Value::Bool(true))
}

fn lenient_auth<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AuthSection, D::Error> {
    Value::deserialize(deserializer).map(|v| match v {
        Value::Null => AuthSection::default(),
        Value::Object(_) => lenient_from_value(v),
        _ => AuthSection {
            malformed: true,
            ..AuthSection::default()
        },
    })
}
