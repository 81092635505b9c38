// src/application/sync.rs
use crate::application::{Clipboard, RemoteStore};
use crate::constants::{DEFAULT_SUBGROUPS, NEW_NOTE_TITLE};
use crate::domain::{
    DomainError, Note, NoteDraft, NoteUpdate, Subgroup, SubgroupDraft, SubgroupUpdate,
};
use crate::infrastructure::cache::{LocalCache, NoteSeed};
use tracing::{debug, info, instrument, warn};

/// The working set for one authenticated user.
///
/// Created only by [`SyncCoordinator::bootstrap`], passed to every mutation,
/// consumed by [`SyncCoordinator::sign_out`]. Never shared across users.
#[derive(Debug)]
pub struct Session {
    user_id: String,
    pub notes: Vec<Note>,
    pub subgroups: Vec<Subgroup>,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Keeps the local cache consistent with the authoritative remote store.
///
/// Every mutation is remote-first: the cache and the session working set are
/// touched only after the remote call succeeds, so a single operation can
/// never leave half-applied state. Failures are terminal for that invocation;
/// nothing is queued or retried.
pub struct SyncCoordinator<R: RemoteStore, C: Clipboard> {
    remote: R,
    cache: LocalCache,
    clipboard: C,
}

impl<R: RemoteStore, C: Clipboard> SyncCoordinator<R, C> {
    pub fn new(remote: R, cache: LocalCache, clipboard: C) -> Self {
        Self {
            remote,
            cache,
            clipboard,
        }
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Load the user's working set from the remote store and reconcile the
    /// local cache against it.
    ///
    /// Remote is authoritative: notes missing from the cache are seeded, and
    /// a cached note whose subgroup assignment disagrees with remote is
    /// overwritten. If the remote holds no subgroups, local-only subgroups
    /// are migrated up once (or the defaults are created).
    ///
    /// Remote failures degrade per list: the corresponding list comes back
    /// empty and no error escapes. Must not run concurrently with itself or
    /// with in-flight mutations.
    #[instrument(level = "debug", skip(self))]
    pub fn bootstrap(&mut self, user_id: &str) -> Session {
        let notes = match self.remote.list_notes(user_id) {
            Ok(notes) => {
                self.reconcile_notes(&notes);
                notes
            }
            Err(e) => {
                warn!(user_id, error = %e, "Loading notes failed, continuing with empty list");
                Vec::new()
            }
        };

        let subgroups = match self.remote.list_subgroups(user_id) {
            Ok(subgroups) if subgroups.is_empty() => self.migrate_subgroups(user_id),
            Ok(subgroups) => {
                self.mirror_subgroups(&subgroups);
                subgroups
            }
            Err(e) => {
                warn!(user_id, error = %e, "Loading subgroups failed, continuing with empty list");
                Vec::new()
            }
        };

        info!(
            user_id,
            notes = notes.len(),
            subgroups = subgroups.len(),
            "Session bootstrapped"
        );
        Session {
            user_id: user_id.to_string(),
            notes,
            subgroups,
        }
    }

    /// Seed cache entries for remote notes the cache has never seen, and
    /// overwrite cached subgroup assignments that disagree with remote.
    fn reconcile_notes(&self, remote_notes: &[Note]) {
        for note in remote_notes {
            match self.cache.note_by_id(&note.id) {
                None => {
                    debug!(note_id = %note.id, "Seeding cache entry from remote note");
                    if let Err(e) = self.cache.create_note(NoteSeed::from_remote(note)) {
                        warn!(note_id = %note.id, error = %e, "Failed to seed cache entry");
                    }
                }
                Some(cached) if cached.subgroup_id != note.subgroup_id => {
                    debug!(note_id = %note.id, "Overwriting cached subgroup assignment from remote");
                    let changes = NoteUpdate::subgroup(note.subgroup_id.clone());
                    if let Err(e) = self.cache.update_note(&note.id, &changes) {
                        warn!(note_id = %note.id, error = %e, "Failed to update cache entry");
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// One-time migration: push local-only subgroups to the remote store, or
    /// create the default set if the cache holds none either. Runs only when
    /// the remote subgroup list is empty, so it can never run twice for a
    /// user whose migration succeeded.
    fn migrate_subgroups(&mut self, user_id: &str) -> Vec<Subgroup> {
        let local = self.cache.all_subgroups();

        let drafts: Vec<SubgroupDraft> = if local.is_empty() {
            DEFAULT_SUBGROUPS
                .iter()
                .map(|(name, color)| SubgroupDraft {
                    name: name.to_string(),
                    color: color.to_string(),
                })
                .collect()
        } else {
            info!(
                user_id,
                count = local.len(),
                "Migrating local-only subgroups to remote store"
            );
            local
                .iter()
                .map(|subgroup| SubgroupDraft {
                    name: subgroup.name.clone(),
                    color: subgroup.color.clone(),
                })
                .collect()
        };

        match self.remote.create_subgroups(user_id, drafts) {
            Ok(created) => {
                // Local ids are discarded; only the remote-assigned records survive.
                self.mirror_subgroups(&created);
                created
            }
            Err(e) => {
                warn!(user_id, error = %e, "Subgroup migration failed, continuing with empty list");
                Vec::new()
            }
        }
    }

    /// Rebuild the cached subgroup collection from the remote working set.
    fn mirror_subgroups(&self, subgroups: &[Subgroup]) {
        if let Err(e) = self.cache.replace_subgroups(subgroups) {
            warn!(error = %e, "Failed to mirror subgroups into cache");
        }
    }

    /// Create a note under `initial_subgroup` (or unassigned) and mirror it
    /// into the cache. The new note is prepended to the session working set.
    #[instrument(level = "debug", skip(self, session), fields(user_id = session.user_id()))]
    pub fn create_note(
        &mut self,
        session: &mut Session,
        initial_subgroup: Option<&str>,
    ) -> Result<Note, DomainError> {
        let draft = NoteDraft {
            title: NEW_NOTE_TITLE.to_string(),
            content: String::new(),
            subgroup_id: initial_subgroup.map(str::to_string),
        };
        let note = self.remote.create_note(&session.user_id, draft)?;

        if let Err(e) = self.cache.create_note(NoteSeed::from_remote(&note)) {
            warn!(note_id = %note.id, error = %e, "Failed to mirror created note into cache");
        }
        session.notes.insert(0, note.clone());

        info!(note_id = %note.id, "Note created");
        Ok(note)
    }

    /// Apply a partial update remote-first. On success the cache entry is
    /// patched, or created from the returned record when the cache had no
    /// entry for this id (heal, don't fail).
    #[instrument(level = "debug", skip(self, session, changes), fields(user_id = session.user_id()))]
    pub fn update_note(
        &mut self,
        session: &mut Session,
        id: &str,
        changes: NoteUpdate,
    ) -> Result<Note, DomainError> {
        let note = self.remote.update_note(&session.user_id, id, changes.clone())?;

        let mirrored = match self.cache.note_by_id(id) {
            Some(_) => self.cache.update_note(id, &changes).map(|_| ()),
            None => {
                debug!(note_id = id, "Cache entry missing, healing from remote record");
                self.cache.create_note(NoteSeed::from_remote(&note)).map(|_| ())
            }
        };
        if let Err(e) = mirrored {
            warn!(note_id = id, error = %e, "Failed to mirror note update into cache");
        }

        if let Some(entry) = session.notes.iter_mut().find(|n| n.id == id) {
            *entry = note.clone();
        }

        Ok(note)
    }

    /// Delete remote-first; the cache removal is idempotent, so deleting an
    /// already-absent entry is a no-op.
    #[instrument(level = "debug", skip(self, session), fields(user_id = session.user_id()))]
    pub fn delete_note(&mut self, session: &mut Session, id: &str) -> Result<(), DomainError> {
        self.remote.delete_note(&session.user_id, id)?;

        if let Err(e) = self.cache.delete_note(id) {
            warn!(note_id = id, error = %e, "Failed to remove note from cache");
        }
        session.notes.retain(|n| n.id != id);

        info!(note_id = id, "Note deleted");
        Ok(())
    }

    /// Place `"{title}\n\n{content}"` on the clipboard, then persist the
    /// copy-count increment through the regular update path.
    ///
    /// A clipboard failure aborts before any store is touched. If the
    /// clipboard write succeeds but the remote update fails, the text stays
    /// on the clipboard with no persisted count change; that inconsistency
    /// is accepted.
    #[instrument(level = "debug", skip(self, session), fields(user_id = session.user_id()))]
    pub fn copy_note(&mut self, session: &mut Session, id: &str) -> Result<Note, DomainError> {
        let note = session
            .notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| DomainError::NotFoundLocally(id.to_string()))?;

        let text = format!("{}\n\n{}", note.title, note.content);
        self.clipboard.write_text(&text)?;

        self.update_note(session, id, NoteUpdate::copy_count(note.copy_count + 1))
    }

    #[instrument(level = "debug", skip(self, session, draft), fields(user_id = session.user_id()))]
    pub fn create_subgroup(
        &mut self,
        session: &mut Session,
        draft: SubgroupDraft,
    ) -> Result<Subgroup, DomainError> {
        let subgroup = self.remote.create_subgroup(&session.user_id, draft)?;

        session.subgroups.push(subgroup.clone());
        self.mirror_subgroups(&session.subgroups);

        info!(subgroup_id = %subgroup.id, "Subgroup created");
        Ok(subgroup)
    }

    #[instrument(level = "debug", skip(self, session, changes), fields(user_id = session.user_id()))]
    pub fn update_subgroup(
        &mut self,
        session: &mut Session,
        id: &str,
        changes: SubgroupUpdate,
    ) -> Result<Subgroup, DomainError> {
        let subgroup = self
            .remote
            .update_subgroup(&session.user_id, id, changes)?;

        if let Some(entry) = session.subgroups.iter_mut().find(|s| s.id == id) {
            *entry = subgroup.clone();
        }
        self.mirror_subgroups(&session.subgroups);

        Ok(subgroup)
    }

    /// Two-step deletion: every note referencing the subgroup is reassigned
    /// to null remotely before the record itself is removed, so no note ever
    /// references a nonexistent subgroup after this returns successfully.
    #[instrument(level = "debug", skip(self, session), fields(user_id = session.user_id()))]
    pub fn delete_subgroup(&mut self, session: &mut Session, id: &str) -> Result<(), DomainError> {
        self.remote.clear_note_subgroup(&session.user_id, id)?;
        self.remote.delete_subgroup(&session.user_id, id)?;

        if let Err(e) = self.cache.delete_subgroup(id) {
            warn!(subgroup_id = id, error = %e, "Failed to remove subgroup from cache");
        }

        session.subgroups.retain(|s| s.id != id);
        for note in session
            .notes
            .iter_mut()
            .filter(|n| n.subgroup_id.as_deref() == Some(id))
        {
            note.subgroup_id = None;
        }

        info!(subgroup_id = id, "Subgroup deleted, member notes unassigned");
        Ok(())
    }

    /// Tear down the session and clear both cache collections, so nothing
    /// from this user can leak into the next session on this device.
    #[instrument(level = "debug", skip(self, session), fields(user_id = session.user_id()))]
    pub fn sign_out(&mut self, session: Session) {
        if let Err(e) = self.cache.clear_all() {
            warn!(error = %e, "Failed to clear cache on sign-out");
        }
        info!(user_id = session.user_id(), "Signed out");
        drop(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{MockClipboard, MockRemoteStore, TestCache};

    const USER: &str = "user-1";

    #[test]
    fn given_remote_note_absent_locally_when_bootstrapping_then_cache_is_seeded() {
        // Arrange
        let cache = TestCache::new();
        let remote = MockRemoteStore::builder()
            .with_remote_note(USER, "n1", "Hello", "World", None)
            .build();
        let mut coordinator =
            SyncCoordinator::new(remote, cache.open(), MockClipboard::default());

        // Act
        let session = coordinator.bootstrap(USER);

        // Assert
        assert_eq!(session.notes.len(), 1);
        let cached = coordinator.cache().note_by_id("n1").expect("seeded");
        assert_eq!(cached.title, "Hello");
    }

    #[test]
    fn given_cached_assignment_disagrees_when_bootstrapping_then_remote_wins() {
        // Arrange
        let cache = TestCache::new();
        cache.seed_note("n1", "Hello", "World", Some("g-old"));
        let remote = MockRemoteStore::builder()
            .with_remote_note(USER, "n1", "Hello", "World", Some("g-new"))
            .build();
        let mut coordinator =
            SyncCoordinator::new(remote, cache.open(), MockClipboard::default());

        // Act
        coordinator.bootstrap(USER);

        // Assert
        let cached = coordinator.cache().note_by_id("n1").expect("present");
        assert_eq!(cached.subgroup_id.as_deref(), Some("g-new"));
    }

    #[test]
    fn given_remote_notes_unavailable_when_bootstrapping_then_list_is_empty() {
        // Arrange
        let cache = TestCache::new();
        let remote = MockRemoteStore::builder().with_notes_unavailable().build();
        let mut coordinator =
            SyncCoordinator::new(remote, cache.open(), MockClipboard::default());

        // Act
        let session = coordinator.bootstrap(USER);

        // Assert
        assert!(session.notes.is_empty());
    }

    #[test]
    fn given_no_subgroups_anywhere_when_bootstrapping_then_defaults_are_created() {
        // Arrange
        let cache = TestCache::new();
        let remote = MockRemoteStore::builder().build();
        let mut coordinator =
            SyncCoordinator::new(remote, cache.open(), MockClipboard::default());

        // Act
        let session = coordinator.bootstrap(USER);

        // Assert
        let names: Vec<&str> = session.subgroups.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Work", "Personal", "Ideas"]);
        assert!(session.subgroups.iter().all(|s| !s.id.is_empty()));
    }

    #[test]
    fn given_local_only_subgroups_when_bootstrapping_then_they_are_migrated_once() {
        // Arrange
        let cache = TestCache::new();
        cache.seed_subgroup("local-a", "Recipes", "#111111");
        cache.seed_subgroup("local-b", "Travel", "#222222");
        let remote = MockRemoteStore::builder().build();
        let mut coordinator =
            SyncCoordinator::new(remote, cache.open(), MockClipboard::default());

        // Act
        let session = coordinator.bootstrap(USER);

        // Assert: names survive, local ids do not
        let names: Vec<&str> = session.subgroups.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Recipes", "Travel"]);
        assert!(session
            .subgroups
            .iter()
            .all(|s| s.id != "local-a" && s.id != "local-b"));

        // Act: a second bootstrap sees a non-empty remote and must not re-migrate
        let second = coordinator.bootstrap(USER);

        // Assert
        assert_eq!(second.subgroups.len(), 2);
    }

    #[test]
    fn given_remote_failure_when_creating_note_then_nothing_is_mutated() {
        // Arrange
        let cache = TestCache::new();
        let remote = MockRemoteStore::builder().with_writes_rejected().build();
        let mut coordinator =
            SyncCoordinator::new(remote, cache.open(), MockClipboard::default());
        let mut session = coordinator.bootstrap(USER);
        let notes_before = session.notes.len();

        // Act
        let result = coordinator.create_note(&mut session, None);

        // Assert
        assert!(result.is_err());
        assert_eq!(session.notes.len(), notes_before);
        assert!(coordinator.cache().all_notes().is_empty());
    }

    #[test]
    fn given_clipboard_failure_when_copying_then_no_store_is_touched() {
        // Arrange
        let cache = TestCache::new();
        let remote = MockRemoteStore::builder()
            .with_remote_note(USER, "n1", "Hello", "World", None)
            .build();
        let mut coordinator =
            SyncCoordinator::new(remote, cache.open(), MockClipboard::unavailable());
        let mut session = coordinator.bootstrap(USER);

        // Act
        let result = coordinator.copy_note(&mut session, "n1");

        // Assert
        assert!(matches!(result, Err(DomainError::ClipboardUnavailable(_))));
        assert_eq!(session.notes[0].copy_count, 0);
        assert_eq!(coordinator.cache().note_by_id("n1").unwrap().copy_count, 0);
    }

    #[test]
    fn given_successful_copy_when_copying_then_count_is_persisted_everywhere() {
        // Arrange
        let cache = TestCache::new();
        let remote = MockRemoteStore::builder()
            .with_remote_note(USER, "n1", "Hello", "World", None)
            .build();
        let mut coordinator =
            SyncCoordinator::new(remote, cache.open(), MockClipboard::default());
        let mut session = coordinator.bootstrap(USER);

        // Act
        let updated = coordinator.copy_note(&mut session, "n1").expect("copy");

        // Assert
        assert_eq!(updated.copy_count, 1);
        assert_eq!(session.notes[0].copy_count, 1);
        assert_eq!(coordinator.cache().note_by_id("n1").unwrap().copy_count, 1);
    }

    #[test]
    fn given_deleted_note_when_deleting_again_then_second_call_is_a_noop() {
        // Arrange
        let cache = TestCache::new();
        let remote = MockRemoteStore::builder()
            .with_remote_note(USER, "n1", "Hello", "World", None)
            .build();
        let mut coordinator =
            SyncCoordinator::new(remote, cache.open(), MockClipboard::default());
        let mut session = coordinator.bootstrap(USER);

        // Act
        coordinator.delete_note(&mut session, "n1").expect("first delete");
        coordinator.delete_note(&mut session, "n1").expect("second delete");

        // Assert
        assert!(session.notes.is_empty());
        assert!(coordinator.cache().note_by_id("n1").is_none());
    }

    #[test]
    fn given_subgroup_with_members_when_deleting_then_references_are_cleared() {
        // Arrange
        let cache = TestCache::new();
        let remote = MockRemoteStore::builder()
            .with_remote_subgroup(USER, "g1", "Work", "#3b82f6")
            .with_remote_note(USER, "n1", "Hello", "World", Some("g1"))
            .build();
        let mut coordinator =
            SyncCoordinator::new(remote, cache.open(), MockClipboard::default());
        let mut session = coordinator.bootstrap(USER);

        // Act
        coordinator.delete_subgroup(&mut session, "g1").expect("delete");

        // Assert
        assert!(session.subgroups.is_empty());
        assert_eq!(session.notes[0].subgroup_id, None);
        assert_eq!(
            coordinator.cache().note_by_id("n1").unwrap().subgroup_id,
            None
        );
        assert!(coordinator.cache().subgroup_by_id("g1").is_none());
    }

    #[test]
    fn given_session_when_signing_out_then_cache_is_cleared() {
        // Arrange
        let cache = TestCache::new();
        let remote = MockRemoteStore::builder()
            .with_remote_note(USER, "n1", "Hello", "World", None)
            .build();
        let mut coordinator =
            SyncCoordinator::new(remote, cache.open(), MockClipboard::default());
        let session = coordinator.bootstrap(USER);

        // Act
        coordinator.sign_out(session);

        // Assert
        assert!(coordinator.cache().all_notes().is_empty());
        assert!(coordinator.cache().all_subgroups().is_empty());
    }
}
