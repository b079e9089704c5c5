//! Configuration loaded from `cropass.toml` in the storage directory.

pub mod settings;

pub use settings::Settings;
