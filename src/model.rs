use std::collections::BTreeMap;

use serde::Serialize;

/// Singular/plural descriptor for the tracked unit ("page"/"pages").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitName {
    pub name: String,
    pub plural: String,
}

impl UnitName {
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            plural: String::new(),
        }
    }
}

/// One node of the tracked-work tree.
///
/// A container only holds further groups; a leaf holds the unit mapping and
/// its declared capacity. Normalization guarantees a node is never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Group {
    Container {
        id: String,
        label: String,
        subgroups: Vec<Group>,
    },
    Leaf {
        id: String,
        label: String,
        total: u32,
        units: BTreeMap<String, u32>,
    },
}

impl Group {
    pub fn id(&self) -> &str {
        match self {
            Group::Container { id, .. } | Group::Leaf { id, .. } => id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Group::Container { label, .. } | Group::Leaf { label, .. } => label,
        }
    }
}

/// One independently-rendered progress report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub unit: UnitName,
    /// State value -> human-readable label. State 0 is the baseline.
    pub states: BTreeMap<u32, String>,
    /// Informational only; not enforced anywhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_state: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    /// Flat top-level units for sections too small to need grouping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<BTreeMap<String, u32>>,
}
