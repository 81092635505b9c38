// src/infrastructure/mod.rs
pub mod cache;
pub mod clipboard;
pub mod config;

pub use cache::{generate_id, ExportDocument, LocalCache, NoteSeed, SubgroupSeed};
pub use clipboard::SystemClipboard;
pub use config::Config;
