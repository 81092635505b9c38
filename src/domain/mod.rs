// src/domain/mod.rs
pub mod error;
pub mod note;
pub mod projection;
pub mod subgroup;

pub use error::DomainError;
pub use note::{Note, NoteDraft, NoteUpdate};
pub use projection::{project, sort_notes, NoteFilter, SortKey};
pub use subgroup::{Subgroup, SubgroupDraft, SubgroupUpdate};
