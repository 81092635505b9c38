// src/domain/projection.rs
//
// Pure, stateless view transforms over an in-memory note set. Filtering and
// sorting are always applied here, never pushed to the remote store.
use crate::domain::Note;

/// Criteria for narrowing a note set for presentation.
///
/// A note passes iff it belongs to the selected subgroup (when one is set)
/// and contains the query (when one is given) in its title or content.
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    pub subgroup_id: Option<String>,
    pub query: String,
}

impl NoteFilter {
    pub fn by_subgroup(subgroup_id: impl Into<String>) -> Self {
        Self {
            subgroup_id: Some(subgroup_id.into()),
            query: String::new(),
        }
    }

    pub fn by_query(query: impl Into<String>) -> Self {
        Self {
            subgroup_id: None,
            query: query.into(),
        }
    }

    fn accepts(&self, note: &Note) -> bool {
        let matches_subgroup = match &self.subgroup_id {
            None => true,
            Some(id) => note.subgroup_id.as_deref() == Some(id.as_str()),
        };
        let matches_query = self.query.trim().is_empty() || note.matches(&self.query);

        matches_subgroup && matches_query
    }
}

/// Sort order for note listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently updated first.
    #[default]
    Updated,
    /// Most recently created first.
    Created,
    /// Title, lexicographic ascending.
    Title,
}

/// Filter `notes` by subgroup and free-text query, preserving input order.
pub fn project(notes: &[Note], filter: &NoteFilter) -> Vec<Note> {
    notes
        .iter()
        .filter(|note| filter.accepts(note))
        .cloned()
        .collect()
}

/// Sort notes in place by the given key.
pub fn sort_notes(notes: &mut [Note], key: SortKey) {
    match key {
        SortKey::Updated => notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortKey::Created => notes.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Title => notes.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn note(id: &str, title: &str, content: &str, subgroup: Option<&str>) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            subgroup_id: subgroup.map(str::to_string),
            copy_count: 0,
            created_at: datetime!(2024-01-01 10:00 UTC),
            updated_at: datetime!(2024-01-01 10:00 UTC),
        }
    }

    #[test]
    fn given_empty_filter_when_projecting_then_returns_all_notes() {
        let notes = vec![note("1", "a", "", None), note("2", "b", "", Some("g1"))];

        let result = project(&notes, &NoteFilter::default());

        assert_eq!(result.len(), 2);
    }

    #[test]
    fn given_subgroup_filter_when_projecting_then_returns_only_members() {
        let notes = vec![
            note("1", "a", "", Some("g1")),
            note("2", "b", "", Some("g2")),
            note("3", "c", "", None),
        ];

        let result = project(&notes, &NoteFilter::by_subgroup("g1"));

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");
    }

    #[test]
    fn given_subgroup_and_query_when_projecting_then_both_must_match() {
        let notes = vec![
            note("1", "foo bar", "", Some("g1")),
            note("2", "foo", "", Some("g2")),
            note("3", "bar", "", Some("g1")),
        ];

        let filter = NoteFilter {
            subgroup_id: Some("g1".to_string()),
            query: "FOO".to_string(),
        };
        let result = project(&notes, &filter);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");
    }

    #[test]
    fn given_query_matching_content_when_projecting_then_note_passes() {
        let notes = vec![note("1", "title", "needle here", None)];

        let result = project(&notes, &NoteFilter::by_query("Needle"));

        assert_eq!(result.len(), 1);
    }

    #[test]
    fn given_title_sort_when_sorting_then_order_ignores_case() {
        let mut notes = vec![
            note("1", "banana", "", None),
            note("2", "Apple", "", None),
            note("3", "cherry", "", None),
        ];

        sort_notes(&mut notes, SortKey::Title);

        let titles: Vec<&str> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn given_updated_sort_when_sorting_then_most_recent_first() {
        let mut older = note("1", "old", "", None);
        older.updated_at = datetime!(2024-01-01 10:00 UTC);
        let mut newer = note("2", "new", "", None);
        newer.updated_at = datetime!(2024-06-01 10:00 UTC);
        let mut notes = vec![older, newer];

        sort_notes(&mut notes, SortKey::Updated);

        assert_eq!(notes[0].id, "2");
    }

    #[test]
    fn given_created_sort_when_sorting_then_most_recent_first() {
        let mut older = note("1", "old", "", None);
        older.created_at = datetime!(2024-01-01 10:00 UTC);
        let mut newer = note("2", "new", "", None);
        newer.created_at = datetime!(2024-06-01 10:00 UTC);
        let mut notes = vec![older, newer];

        sort_notes(&mut notes, SortKey::Created);

        assert_eq!(notes[0].id, "2");
    }
}
