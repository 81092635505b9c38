// src/domain/note.rs
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A note as held by the remote store and mirrored into the local cache.
///
/// `id` is remote-assigned and opaque; the cache never regenerates it.
/// Cache-only records created before migration carry a locally minted id
/// until they pass through the sync coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub subgroup_id: Option<String>,
    #[serde(default)]
    pub copy_count: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Note {
    /// Case-insensitive substring match against title and content.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
    }
}

/// Fields supplied when creating a note; the remote store assigns the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub subgroup_id: Option<String>,
}

/// A typed partial update for a note.
///
/// `None` means "leave unchanged". `subgroup_id` is doubly optional so the
/// update can distinguish "unchanged" (`None`) from "clear the assignment"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub subgroup_id: Option<Option<String>>,
    pub copy_count: Option<u64>,
}

impl NoteUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn subgroup(subgroup_id: Option<String>) -> Self {
        Self {
            subgroup_id: Some(subgroup_id),
            ..Self::default()
        }
    }

    pub fn copy_count(copy_count: u64) -> Self {
        Self {
            copy_count: Some(copy_count),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.subgroup_id.is_none()
            && self.copy_count.is_none()
    }

    /// Merge this update into an existing note record.
    pub fn apply(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(subgroup_id) = &self.subgroup_id {
            note.subgroup_id = subgroup_id.clone();
        }
        if let Some(copy_count) = self.copy_count {
            note.copy_count = copy_count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_note() -> Note {
        Note {
            id: "n1".to_string(),
            title: "Grocery List".to_string(),
            content: "Milk and eggs".to_string(),
            subgroup_id: None,
            copy_count: 0,
            created_at: datetime!(2024-01-01 10:00 UTC),
            updated_at: datetime!(2024-01-02 10:00 UTC),
        }
    }

    #[test]
    fn given_query_in_title_when_matching_then_is_case_insensitive() {
        let note = sample_note();

        assert!(note.matches("grocery"));
        assert!(note.matches("GROCERY"));
        assert!(!note.matches("meeting"));
    }

    #[test]
    fn given_query_in_content_when_matching_then_matches() {
        let note = sample_note();

        assert!(note.matches("milk"));
    }

    #[test]
    fn given_partial_update_when_applying_then_only_set_fields_change() {
        let mut note = sample_note();

        NoteUpdate::title("Shopping").apply(&mut note);

        assert_eq!(note.title, "Shopping");
        assert_eq!(note.content, "Milk and eggs");
        assert_eq!(note.subgroup_id, None);
    }

    #[test]
    fn given_subgroup_clear_update_when_applying_then_reference_is_removed() {
        let mut note = sample_note();
        note.subgroup_id = Some("g1".to_string());

        NoteUpdate::subgroup(None).apply(&mut note);

        assert_eq!(note.subgroup_id, None);
    }
}
