//! Audit report: findings grouped per component, in evaluation order.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::finding::{Finding, Severity};

/// The evaluator that produced a group of findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Permissions,
    Gateway,
    Channels,
    Secrets,
}

impl Component {
    /// Section heading for terminal output.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Permissions => "File Permissions",
            Self::Gateway => "Gateway (API) Security",
            Self::Channels => "Channel Policies",
            Self::Secrets => "Hardcoded Secrets",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub component: Component,
    pub findings: Vec<Finding>,
}

/// Complete result of one audit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// The config file that was audited.
    pub target: PathBuf,
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            sections: Vec::new(),
        }
    }

    /// Append a section. Sections keep insertion order.
    pub fn push(&mut self, component: Component, findings: Vec<Finding>) {
        self.sections.push(ReportSection {
            component,
            findings,
        });
    }

    pub fn section(&self, component: Component) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.component == component)
    }

    /// All findings across sections, in report order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.sections.iter().flat_map(|s| s.findings.iter())
    }

    /// Highest severity present, `Pass` for an empty report.
    pub fn worst_severity(&self) -> Severity {
        self.findings()
            .map(|f| f.severity)
            .max()
            .unwrap_or(Severity::Pass)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings().filter(|f| f.severity == severity).count()
    }

    /// Number of findings at `warn` or above.
    pub fn problem_count(&self) -> usize {
        self.findings().filter(|f| f.is_problem()).count()
    }
}
