// src/application/mod.rs
pub mod remote;
pub mod sync;

pub use remote::{Clipboard, RemoteStore};
pub use sync::{Session, SyncCoordinator};
