//! Finding model: the vocabulary every evaluator speaks.

use serde::{Deserialize, Serialize};

/// How bad a finding is. Ordered from harmless to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Pass,
    Info,
    Warn,
    Fail,
    Critical,
}

impl Severity {
    /// Short upper-case label used in terminal output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Fail => "FAIL",
            Self::Critical => "CRITICAL",
        }
    }

    /// All severities, in ascending order.
    pub const ALL: [Severity; 5] = [
        Self::Pass,
        Self::Info,
        Self::Warn,
        Self::Fail,
        Self::Critical,
    ];
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What area of the configuration a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Permissions,
    GatewayBind,
    GatewayAuth,
    ChannelDm,
    ChannelGroup,
    SecretLeak,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permissions => "permissions",
            Self::GatewayBind => "gateway-bind",
            Self::GatewayAuth => "gateway-auth",
            Self::ChannelDm => "channel-dm",
            Self::ChannelGroup => "channel-group",
            Self::SecretLeak => "secret-leak",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single risk finding produced by an evaluator.
///
/// Findings are value objects: evaluators build them with [`Finding::new`]
/// and the builder methods, nobody mutates them afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: Category,
    pub severity: Severity,
    /// Dotted path into the document, or a filesystem path.
    pub location: String,
    pub message: String,
    /// Whether an automatic, well-defined fix exists.
    pub remediable: bool,
    /// Human-readable suggested fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

impl Finding {
    pub fn new(
        category: Category,
        severity: Severity,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            severity,
            location: location.into(),
            message: message.into(),
            remediable: false,
            fix: None,
        }
    }

    /// Mark the finding as automatically fixable.
    pub fn remediable(mut self) -> Self {
        self.remediable = true;
        self
    }

    /// Attach a suggested fix.
    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    /// True for anything worse than `info`.
    pub fn is_problem(&self) -> bool {
        self.severity >= Severity::Warn
    }
}
