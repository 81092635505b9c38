// src/domain/subgroup.rs
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A named, colored category a note may belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subgroup {
    pub id: String,
    pub name: String,
    /// Display color token, e.g. "#3b82f6". Free-form, never interpreted.
    pub color: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields supplied when creating a subgroup; the remote store assigns the id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubgroupDraft {
    pub name: String,
    pub color: String,
}

/// A typed partial update for a subgroup. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubgroupUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl SubgroupUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    /// Merge this update into an existing subgroup record.
    pub fn apply(&self, subgroup: &mut Subgroup) {
        if let Some(name) = &self.name {
            subgroup.name = name.clone();
        }
        if let Some(color) = &self.color {
            subgroup.color = color.clone();
        }
    }
}
