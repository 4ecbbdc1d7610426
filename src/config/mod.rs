//! Configuration — project-level settings from `.encrypted-storage.toml`.

pub mod settings;

pub use settings::{Backend, ListingPolicy, Settings, DEFAULT_RESOURCE_NAME};
