// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(String),
    #[error("Remote store rejected the request: {0}")]
    RemoteRejected(String),
    #[error("Not found in local cache: {0}")]
    NotFoundLocally(String),
    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
}
