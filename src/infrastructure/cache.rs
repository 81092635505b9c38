// src/infrastructure/cache.rs
//
// Device-local persistence for notes and subgroups: one serialized JSON
// collection per entity type, rewritten whole on every mutation. The cache
// is a derived, best-effort mirror of the remote store; it may be rebuilt
// from remote data at any session start. Single-process, single-writer.
use crate::constants::{
    DEFAULT_SUBGROUP_COLOR, DEFAULT_SUBGROUP_NAME, NOTES_FILE, SUBGROUPS_FILE,
    UNTITLED_NOTE_TITLE,
};
use crate::domain::{Note, NoteUpdate, Subgroup, SubgroupUpdate};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

/// Mint an id for a record that has never been assigned a remote id
/// (pre-migration local data). Time-ordered with a random suffix; once a
/// record passes through the sync coordinator its id is always the
/// remote-assigned one.
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

/// Input for seeding a cache entry. Fields left `None` get defaults:
/// a freshly minted id, zero copy count, both timestamps now.
#[derive(Debug, Clone, Default)]
pub struct NoteSeed {
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    pub subgroup_id: Option<String>,
    pub copy_count: Option<u64>,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

impl NoteSeed {
    /// Seed carrying every remote-origin field, for mirroring a record the
    /// remote store already owns.
    pub fn from_remote(note: &Note) -> Self {
        Self {
            id: Some(note.id.clone()),
            title: note.title.clone(),
            content: note.content.clone(),
            subgroup_id: note.subgroup_id.clone(),
            copy_count: Some(note.copy_count),
            created_at: Some(note.created_at),
            updated_at: Some(note.updated_at),
        }
    }
}

/// Input for seeding a cached subgroup.
#[derive(Debug, Clone, Default)]
pub struct SubgroupSeed {
    pub id: Option<String>,
    pub name: String,
    pub color: String,
    pub created_at: Option<OffsetDateTime>,
}

/// Snapshot of both collections, for backup and device transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub notes: Vec<Note>,
    pub subgroups: Vec<Subgroup>,
    #[serde(with = "time::serde::rfc3339")]
    pub exported_at: OffsetDateTime,
}

/// Synchronous key-value facade over the two collection blobs.
///
/// Reads are total: a missing file yields an empty collection and a corrupt
/// blob is logged and treated as empty (heal, don't fail). Writes propagate
/// I/O errors. `update_*`/`delete_*` on a missing id are no-ops.
#[derive(Debug, Clone)]
pub struct LocalCache {
    notes_path: PathBuf,
    subgroups_path: PathBuf,
}

impl LocalCache {
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = data_dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

        debug!(dir = %dir.display(), "Opening local cache");
        Ok(Self {
            notes_path: dir.join(NOTES_FILE),
            subgroups_path: dir.join(SUBGROUPS_FILE),
        })
    }

    // -- notes ------------------------------------------------------------

    pub fn all_notes(&self) -> Vec<Note> {
        read_collection(&self.notes_path)
    }

    pub fn note_by_id(&self, id: &str) -> Option<Note> {
        self.all_notes().into_iter().find(|note| note.id == id)
    }

    pub fn create_note(&self, seed: NoteSeed) -> Result<Note> {
        let now = OffsetDateTime::now_utc();
        let note = Note {
            id: seed.id.unwrap_or_else(generate_id),
            title: if seed.title.is_empty() {
                UNTITLED_NOTE_TITLE.to_string()
            } else {
                seed.title
            },
            content: seed.content,
            subgroup_id: seed.subgroup_id,
            copy_count: seed.copy_count.unwrap_or(0),
            created_at: seed.created_at.unwrap_or(now),
            updated_at: seed.updated_at.unwrap_or(now),
        };

        let mut notes = self.all_notes();
        notes.push(note.clone());
        write_collection(&self.notes_path, &notes)?;
        Ok(note)
    }

    /// Merge `changes` into the entry for `id` and refresh its `updated_at`.
    /// Returns `None` without touching the blob when the id is unknown.
    pub fn update_note(&self, id: &str, changes: &NoteUpdate) -> Result<Option<Note>> {
        let mut notes = self.all_notes();
        let Some(note) = notes.iter_mut().find(|note| note.id == id) else {
            return Ok(None);
        };

        changes.apply(note);
        note.updated_at = OffsetDateTime::now_utc();
        let updated = note.clone();

        write_collection(&self.notes_path, &notes)?;
        Ok(Some(updated))
    }

    /// Remove the entry for `id`. No-op when absent.
    pub fn delete_note(&self, id: &str) -> Result<()> {
        let mut notes = self.all_notes();
        notes.retain(|note| note.id != id);
        write_collection(&self.notes_path, &notes)
    }

    /// Notes assigned to `subgroup_id`, or the unassigned notes for `None`.
    pub fn notes_by_subgroup(&self, subgroup_id: Option<&str>) -> Vec<Note> {
        self.all_notes()
            .into_iter()
            .filter(|note| note.subgroup_id.as_deref() == subgroup_id)
            .collect()
    }

    /// Case-insensitive substring search over title and content. A blank
    /// query returns everything.
    pub fn search(&self, query: &str) -> Vec<Note> {
        if query.trim().is_empty() {
            return self.all_notes();
        }
        self.all_notes()
            .into_iter()
            .filter(|note| note.matches(query))
            .collect()
    }

    /// Bump the copy count for `id` and refresh its `updated_at`. Returns
    /// `None` when the id is unknown.
    pub fn increment_copy_count(&self, id: &str) -> Result<Option<Note>> {
        let mut notes = self.all_notes();
        let Some(note) = notes.iter_mut().find(|note| note.id == id) else {
            return Ok(None);
        };

        note.copy_count += 1;
        note.updated_at = OffsetDateTime::now_utc();
        let updated = note.clone();

        write_collection(&self.notes_path, &notes)?;
        Ok(Some(updated))
    }

    /// All notes, most-copied first.
    pub fn notes_by_copy_count(&self) -> Vec<Note> {
        let mut notes = self.all_notes();
        notes.sort_by(|a, b| b.copy_count.cmp(&a.copy_count));
        notes
    }

    // -- subgroups --------------------------------------------------------

    pub fn all_subgroups(&self) -> Vec<Subgroup> {
        read_collection(&self.subgroups_path)
    }

    pub fn subgroup_by_id(&self, id: &str) -> Option<Subgroup> {
        self.all_subgroups()
            .into_iter()
            .find(|subgroup| subgroup.id == id)
    }

    pub fn create_subgroup(&self, seed: SubgroupSeed) -> Result<Subgroup> {
        let subgroup = Subgroup {
            id: seed.id.unwrap_or_else(generate_id),
            name: if seed.name.is_empty() {
                DEFAULT_SUBGROUP_NAME.to_string()
            } else {
                seed.name
            },
            color: if seed.color.is_empty() {
                DEFAULT_SUBGROUP_COLOR.to_string()
            } else {
                seed.color
            },
            created_at: seed.created_at.unwrap_or_else(OffsetDateTime::now_utc),
        };

        let mut subgroups = self.all_subgroups();
        subgroups.push(subgroup.clone());
        write_collection(&self.subgroups_path, &subgroups)?;
        Ok(subgroup)
    }

    pub fn update_subgroup(&self, id: &str, changes: &SubgroupUpdate) -> Result<Option<Subgroup>> {
        let mut subgroups = self.all_subgroups();
        let Some(subgroup) = subgroups.iter_mut().find(|subgroup| subgroup.id == id) else {
            return Ok(None);
        };

        changes.apply(subgroup);
        let updated = subgroup.clone();

        write_collection(&self.subgroups_path, &subgroups)?;
        Ok(Some(updated))
    }

    /// Remove the subgroup and move its member notes to "unassigned", so no
    /// cached note is ever left referencing a nonexistent subgroup.
    pub fn delete_subgroup(&self, id: &str) -> Result<()> {
        let mut subgroups = self.all_subgroups();
        subgroups.retain(|subgroup| subgroup.id != id);
        write_collection(&self.subgroups_path, &subgroups)?;

        let mut notes = self.all_notes();
        let mut changed = false;
        for note in notes
            .iter_mut()
            .filter(|note| note.subgroup_id.as_deref() == Some(id))
        {
            note.subgroup_id = None;
            changed = true;
        }
        if changed {
            write_collection(&self.notes_path, &notes)?;
        }
        Ok(())
    }

    /// Overwrite the whole subgroup collection, discarding whatever was
    /// cached. Used when the remote working set is adopted wholesale.
    pub fn replace_subgroups(&self, subgroups: &[Subgroup]) -> Result<()> {
        write_collection(&self.subgroups_path, subgroups)
    }

    // -- utilities --------------------------------------------------------

    pub fn clear_all(&self) -> Result<()> {
        remove_if_present(&self.notes_path)?;
        remove_if_present(&self.subgroups_path)?;
        Ok(())
    }

    pub fn export_data(&self) -> ExportDocument {
        ExportDocument {
            notes: self.all_notes(),
            subgroups: self.all_subgroups(),
            exported_at: OffsetDateTime::now_utc(),
        }
    }

    /// Replace both collections with the document's contents.
    pub fn import_data(&self, document: &ExportDocument) -> Result<()> {
        write_collection(&self.notes_path, &document.notes)?;
        write_collection(&self.subgroups_path, &document.subgroups)?;
        Ok(())
    }
}

fn read_collection<T: serde::de::DeserializeOwned>(path: &Path) -> Vec<T> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read cache blob, treating as empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(collection) => collection,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Corrupt cache blob, treating as empty");
            Vec::new()
        }
    }
}

fn write_collection<T: Serialize>(path: &Path, collection: &[T]) -> Result<()> {
    let raw = serde_json::to_string(collection).context("Failed to serialize cache blob")?;
    std::fs::write(path, raw)
        .with_context(|| format!("Failed to write cache blob {}", path.display()))
}

fn remove_if_present(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to remove cache blob {}", path.display()))
        }
    }
}
