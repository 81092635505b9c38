// src/constants.rs
//
// Application-wide constants extracted from magic values throughout the codebase.
// Each constant is documented with its purpose and usage context.

/// Title assigned to a note created through the sync coordinator.
///
/// Used in: `application/sync.rs`
pub const NEW_NOTE_TITLE: &str = "New Note";

/// Title substituted when a cache-created note has an empty title.
///
/// Used in: `infrastructure/cache.rs`
pub const UNTITLED_NOTE_TITLE: &str = "Untitled";

/// Name substituted when a cache-created subgroup has an empty name.
///
/// Used in: `infrastructure/cache.rs`
pub const DEFAULT_SUBGROUP_NAME: &str = "New Group";

/// Color assigned when a cache-created subgroup carries no color token.
///
/// Used in: `infrastructure/cache.rs`
pub const DEFAULT_SUBGROUP_COLOR: &str = "#3b82f6";

/// Subgroups seeded for a user whose remote store and local cache both hold
/// none. Created exactly once, during bootstrap.
///
/// Used in: `application/sync.rs`
pub const DEFAULT_SUBGROUPS: [(&str, &str); 3] = [
    ("Work", "#3b82f6"),
    ("Personal", "#10b981"),
    ("Ideas", "#f59e0b"),
];

/// File name of the serialized notes collection inside the data directory.
///
/// Used in: `infrastructure/cache.rs`
pub const NOTES_FILE: &str = "notes.json";

/// File name of the serialized subgroups collection inside the data directory.
///
/// Used in: `infrastructure/cache.rs`
pub const SUBGROUPS_FILE: &str = "subgroups.json";

/// File name of the optional TOML configuration inside the data directory.
///
/// Used in: `infrastructure/config.rs`, `lib.rs`
pub const CONFIG_FILE: &str = "phrasesnap.toml";
