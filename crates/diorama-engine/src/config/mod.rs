//! Display and timing configuration.
//!
//! `Settings` is the full configuration an application runs with.
//! `SettingsPatch` is a partial update: only the fields it carries change.
//! Backend-specific keys travel in `options` untouched; the core never
//! interprets them.

pub(crate) mod settings;

pub use settings::{Settings, SettingsPatch, DEFAULT_SIZE, DEFAULT_TITLE};
