// src/ports/mod.rs
pub mod listing;

pub use listing::ListingPresenter;
