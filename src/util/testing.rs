// src/util/testing.rs

use anyhow::Result;
use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{Clipboard, RemoteStore};
use crate::domain::{
    DomainError, Note, NoteDraft, NoteUpdate, Subgroup, SubgroupDraft, SubgroupUpdate,
};
use crate::infrastructure::cache::{LocalCache, NoteSeed, SubgroupSeed};

/// Shared in-memory remote store for testing the sync coordinator.
///
/// Holds per-user note and subgroup collections, assigns sequential
/// `remote-N` ids on create, and can be switched into failure modes to
/// exercise the degradation paths.
///
/// # Examples
///
/// ```
/// use phrasesnap::util::testing::MockRemoteStore;
///
/// let remote = MockRemoteStore::builder()
///     .with_remote_note("user-1", "n1", "Title", "Body", None)
///     .with_writes_rejected()
///     .build();
/// ```
pub struct MockRemoteStore {
    notes: HashMap<String, Vec<Note>>,
    subgroups: HashMap<String, Vec<Subgroup>>,
    next_id: u64,
    notes_unavailable: bool,
    subgroups_unavailable: bool,
    writes_rejected: bool,
}

impl MockRemoteStore {
    pub fn builder() -> MockRemoteStoreBuilder {
        MockRemoteStoreBuilder::new()
    }

    fn mint_id(&mut self) -> String {
        self.next_id += 1;
        format!("remote-{}", self.next_id)
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.writes_rejected {
            return Err(DomainError::RemoteRejected(
                "writes rejected by test configuration".to_string(),
            ));
        }
        Ok(())
    }

    /// A timestamp strictly after `previous`, even when the clock has not
    /// advanced between calls.
    fn after(previous: OffsetDateTime) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        if now > previous {
            now
        } else {
            previous + Duration::nanoseconds(1)
        }
    }
}

impl RemoteStore for MockRemoteStore {
    fn list_notes(&mut self, user_id: &str) -> Result<Vec<Note>, DomainError> {
        if self.notes_unavailable {
            return Err(DomainError::RemoteUnavailable(
                "notes unavailable by test configuration".to_string(),
            ));
        }
        let mut notes = self.notes.get(user_id).cloned().unwrap_or_default();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    fn list_subgroups(&mut self, user_id: &str) -> Result<Vec<Subgroup>, DomainError> {
        if self.subgroups_unavailable {
            return Err(DomainError::RemoteUnavailable(
                "subgroups unavailable by test configuration".to_string(),
            ));
        }
        let mut subgroups = self.subgroups.get(user_id).cloned().unwrap_or_default();
        subgroups.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(subgroups)
    }

    fn create_note(&mut self, user_id: &str, draft: NoteDraft) -> Result<Note, DomainError> {
        self.check_writable()?;
        let now = OffsetDateTime::now_utc();
        let note = Note {
            id: self.mint_id(),
            title: draft.title,
            content: draft.content,
            subgroup_id: draft.subgroup_id,
            copy_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.notes
            .entry(user_id.to_string())
            .or_default()
            .push(note.clone());
        Ok(note)
    }

    fn update_note(
        &mut self,
        user_id: &str,
        id: &str,
        changes: NoteUpdate,
    ) -> Result<Note, DomainError> {
        self.check_writable()?;
        let note = self
            .notes
            .entry(user_id.to_string())
            .or_default()
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| DomainError::RemoteRejected(format!("unknown note id {id}")))?;

        changes.apply(note);
        note.updated_at = Self::after(note.updated_at);
        Ok(note.clone())
    }

    fn delete_note(&mut self, user_id: &str, id: &str) -> Result<(), DomainError> {
        self.check_writable()?;
        self.notes
            .entry(user_id.to_string())
            .or_default()
            .retain(|n| n.id != id);
        Ok(())
    }

    fn create_subgroup(
        &mut self,
        user_id: &str,
        draft: SubgroupDraft,
    ) -> Result<Subgroup, DomainError> {
        self.check_writable()?;
        let subgroup = Subgroup {
            id: self.mint_id(),
            name: draft.name,
            color: draft.color,
            created_at: OffsetDateTime::now_utc(),
        };
        self.subgroups
            .entry(user_id.to_string())
            .or_default()
            .push(subgroup.clone());
        Ok(subgroup)
    }

    fn create_subgroups(
        &mut self,
        user_id: &str,
        drafts: Vec<SubgroupDraft>,
    ) -> Result<Vec<Subgroup>, DomainError> {
        drafts
            .into_iter()
            .map(|draft| self.create_subgroup(user_id, draft))
            .collect()
    }

    fn update_subgroup(
        &mut self,
        user_id: &str,
        id: &str,
        changes: SubgroupUpdate,
    ) -> Result<Subgroup, DomainError> {
        self.check_writable()?;
        let subgroup = self
            .subgroups
            .entry(user_id.to_string())
            .or_default()
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DomainError::RemoteRejected(format!("unknown subgroup id {id}")))?;

        changes.apply(subgroup);
        Ok(subgroup.clone())
    }

    fn delete_subgroup(&mut self, user_id: &str, id: &str) -> Result<(), DomainError> {
        self.check_writable()?;
        self.subgroups
            .entry(user_id.to_string())
            .or_default()
            .retain(|s| s.id != id);
        Ok(())
    }

    fn clear_note_subgroup(
        &mut self,
        user_id: &str,
        subgroup_id: &str,
    ) -> Result<(), DomainError> {
        self.check_writable()?;
        for note in self
            .notes
            .entry(user_id.to_string())
            .or_default()
            .iter_mut()
            .filter(|n| n.subgroup_id.as_deref() == Some(subgroup_id))
        {
            note.subgroup_id = None;
            note.updated_at = Self::after(note.updated_at);
        }
        Ok(())
    }
}

/// Builder for MockRemoteStore
///
/// Provides a fluent interface for configuring mock behavior.
pub struct MockRemoteStoreBuilder {
    notes: HashMap<String, Vec<Note>>,
    subgroups: HashMap<String, Vec<Subgroup>>,
    seq: u64,
    notes_unavailable: bool,
    subgroups_unavailable: bool,
    writes_rejected: bool,
}

impl MockRemoteStoreBuilder {
    pub fn new() -> Self {
        Self {
            notes: HashMap::new(),
            subgroups: HashMap::new(),
            seq: 0,
            notes_unavailable: false,
            subgroups_unavailable: false,
            writes_rejected: false,
        }
    }

    /// Pre-populate a note owned by `user_id`. Timestamps are spaced so
    /// insertion order is also creation order.
    pub fn with_remote_note(
        mut self,
        user_id: &str,
        id: &str,
        title: &str,
        content: &str,
        subgroup_id: Option<&str>,
    ) -> Self {
        self.seq += 1;
        let at = OffsetDateTime::now_utc() + Duration::nanoseconds(self.seq as i64);
        self.notes.entry(user_id.to_string()).or_default().push(Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            subgroup_id: subgroup_id.map(str::to_string),
            copy_count: 0,
            created_at: at,
            updated_at: at,
        });
        self
    }

    /// Pre-populate a subgroup owned by `user_id`.
    pub fn with_remote_subgroup(mut self, user_id: &str, id: &str, name: &str, color: &str) -> Self {
        self.seq += 1;
        let at = OffsetDateTime::now_utc() + Duration::nanoseconds(self.seq as i64);
        self.subgroups
            .entry(user_id.to_string())
            .or_default()
            .push(Subgroup {
                id: id.to_string(),
                name: name.to_string(),
                color: color.to_string(),
                created_at: at,
            });
        self
    }

    /// Make `list_notes` fail with `RemoteUnavailable`.
    pub fn with_notes_unavailable(mut self) -> Self {
        self.notes_unavailable = true;
        self
    }

    /// Make `list_subgroups` fail with `RemoteUnavailable`.
    pub fn with_subgroups_unavailable(mut self) -> Self {
        self.subgroups_unavailable = true;
        self
    }

    /// Make every mutation fail with `RemoteRejected`.
    pub fn with_writes_rejected(mut self) -> Self {
        self.writes_rejected = true;
        self
    }

    pub fn build(self) -> MockRemoteStore {
        MockRemoteStore {
            notes: self.notes,
            subgroups: self.subgroups,
            next_id: 1000,
            notes_unavailable: self.notes_unavailable,
            subgroups_unavailable: self.subgroups_unavailable,
            writes_rejected: self.writes_rejected,
        }
    }
}

impl Default for MockRemoteStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Clipboard double recording every write; can be switched unavailable.
#[derive(Debug, Clone, Default)]
pub struct MockClipboard {
    copied: Arc<Mutex<Vec<String>>>,
    unavailable: bool,
}

impl MockClipboard {
    pub fn unavailable() -> Self {
        Self {
            copied: Arc::default(),
            unavailable: true,
        }
    }

    /// Everything written so far, in order.
    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().expect("clipboard mutex").clone()
    }
}

impl Clipboard for MockClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), DomainError> {
        if self.unavailable {
            return Err(DomainError::ClipboardUnavailable(
                "unavailable by test configuration".to_string(),
            ));
        }
        self.copied
            .lock()
            .expect("clipboard mutex")
            .push(text.to_string());
        Ok(())
    }
}

/// Test fixture owning a temporary data directory for the local cache.
pub struct TestCache {
    _temp_dir: TempDir,
    cache: LocalCache,
}

impl TestCache {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let cache = LocalCache::new(temp_dir.path()).expect("Failed to open local cache");
        Self {
            _temp_dir: temp_dir,
            cache,
        }
    }

    /// A handle on the cache backed by this fixture's directory.
    pub fn open(&self) -> LocalCache {
        self.cache.clone()
    }

    /// Write a note directly into the cache blob, bypassing the coordinator.
    pub fn seed_note(&self, id: &str, title: &str, content: &str, subgroup_id: Option<&str>) {
        self.cache
            .create_note(NoteSeed {
                id: Some(id.to_string()),
                title: title.to_string(),
                content: content.to_string(),
                subgroup_id: subgroup_id.map(str::to_string),
                ..NoteSeed::default()
            })
            .expect("Failed to seed note");
    }

    /// Write a subgroup directly into the cache blob.
    pub fn seed_subgroup(&self, id: &str, name: &str, color: &str) {
        self.cache
            .create_subgroup(SubgroupSeed {
                id: Some(id.to_string()),
                name: name.to_string(),
                color: color.to_string(),
                ..SubgroupSeed::default()
            })
            .expect("Failed to seed subgroup");
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["mio", "hyper"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    // Build and set the subscriber
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
