// src/application/remote.rs
use crate::domain::{
    DomainError, Note, NoteDraft, NoteUpdate, Subgroup, SubgroupDraft, SubgroupUpdate,
};

/// Port to the authoritative, multi-user remote store.
///
/// The remote store owns identity: ids and server-side timestamps on every
/// returned record are authoritative. All calls are scoped to a single
/// authenticated `user_id`; implementations must not let a caller touch
/// another user's records.
///
/// No production adapter ships with this crate; the host application wires
/// in its backend. `util::testing::MockRemoteStore` provides a configurable
/// in-memory implementation for tests.
pub trait RemoteStore {
    /// All notes for the user, ordered by `updated_at` descending.
    fn list_notes(&mut self, user_id: &str) -> Result<Vec<Note>, DomainError>;

    /// All subgroups for the user, ordered by `created_at` ascending.
    fn list_subgroups(&mut self, user_id: &str) -> Result<Vec<Subgroup>, DomainError>;

    fn create_note(&mut self, user_id: &str, draft: NoteDraft) -> Result<Note, DomainError>;

    /// Apply a partial update; the server refreshes `updated_at`.
    fn update_note(
        &mut self,
        user_id: &str,
        id: &str,
        changes: NoteUpdate,
    ) -> Result<Note, DomainError>;

    fn delete_note(&mut self, user_id: &str, id: &str) -> Result<(), DomainError>;

    fn create_subgroup(
        &mut self,
        user_id: &str,
        draft: SubgroupDraft,
    ) -> Result<Subgroup, DomainError>;

    /// Batch create, used by the one-time subgroup migration.
    fn create_subgroups(
        &mut self,
        user_id: &str,
        drafts: Vec<SubgroupDraft>,
    ) -> Result<Vec<Subgroup>, DomainError>;

    fn update_subgroup(
        &mut self,
        user_id: &str,
        id: &str,
        changes: SubgroupUpdate,
    ) -> Result<Subgroup, DomainError>;

    fn delete_subgroup(&mut self, user_id: &str, id: &str) -> Result<(), DomainError>;

    /// Bulk reassign every note in `subgroup_id` to no subgroup. First step
    /// of the two-step subgroup deletion protocol.
    fn clear_note_subgroup(&mut self, user_id: &str, subgroup_id: &str)
        -> Result<(), DomainError>;
}

/// Port to the platform clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), DomainError>;
}
