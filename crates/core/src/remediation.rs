//! Remediation model: proposed edits to the config document.
//!
//! A [`Proposal`] is what the operator confirms or declines. It carries one
//! or more [`FieldChange`]s which are applied together, and nothing outside
//! those locations is ever touched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DocumentError;
use crate::finding::Finding;

/// A path of object keys into the JSON document, e.g. `gateway.auth.mode`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocPath(Vec<String>);

impl DocPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Set one location in the document to a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub location: DocPath,
    pub value: Value,
    /// Generated credentials: never render or log the value.
    #[serde(default)]
    pub sensitive: bool,
}

impl FieldChange {
    pub fn new(location: DocPath, value: impl Into<Value>) -> Self {
        Self {
            location,
            value: value.into(),
            sensitive: false,
        }
    }

    pub fn sensitive(location: DocPath, value: impl Into<Value>) -> Self {
        Self {
            sensitive: true,
            ..Self::new(location, value)
        }
    }

    /// Value for display, with sensitive values replaced.
    pub fn display_value(&self) -> String {
        if self.sensitive {
            match self.value.as_str() {
                Some(s) => format!("<generated, {} chars>", s.chars().count()),
                None => "<generated>".to_string(),
            }
        } else {
            self.value.to_string()
        }
    }

    /// Write the value at `location`, creating missing intermediate objects.
    ///
    /// A `null` intermediate counts as missing. Any other non-object on the
    /// way is an error and nothing is written.
    pub fn apply(&self, doc: &mut Value) -> Result<(), DocumentError> {
        let (last, parents) = self
            .location
            .segments()
            .split_last()
            .ok_or(DocumentError::EmptyLocation)?;

        let mut node = doc;
        for (depth, key) in parents.iter().enumerate() {
            let map = as_object(node, &self.location, depth)?;
            let child = map
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if child.is_null() {
                *child = Value::Object(Map::new());
            }
            node = child;
        }

        let map = as_object(node, &self.location, parents.len())?;
        map.insert(last.clone(), self.value.clone());
        Ok(())
    }
}

fn as_object<'a>(
    node: &'a mut Value,
    location: &DocPath,
    depth: usize,
) -> Result<&'a mut Map<String, Value>, DocumentError> {
    node.as_object_mut().ok_or_else(|| DocumentError::NotAMapping {
        location: if depth == 0 {
            "<root>".to_string()
        } else {
            location.segments()[..depth].join(".")
        },
    })
}

/// A remediation offered for a single remediable finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// The finding this proposal resolves.
    pub finding: Finding,
    /// Question shown to the operator, e.g. "Change bind to 'loopback'?".
    pub description: String,
    pub requires_confirmation: bool,
    pub changes: Vec<FieldChange>,
}

impl Proposal {
    pub fn new(finding: Finding, description: impl Into<String>, changes: Vec<FieldChange>) -> Self {
        Self {
            finding,
            description: description.into(),
            requires_confirmation: true,
            changes,
        }
    }

    /// Location label for logs: the finding's location.
    pub fn location(&self) -> &str {
        &self.finding.location
    }

    /// Apply all changes, or none of them.
    pub fn apply(&self, doc: &mut Value) -> Result<(), DocumentError> {
        let mut staged = doc.clone();
        for change in &self.changes {
            change.apply(&mut staged)?;
        }
        *doc = staged;
        Ok(())
    }
}
