//! Enclosure Settings
//!
//! Loads and saves generator settings: the enclosure parameters plus where
//! and how the documents are written.

pub mod config;
pub mod error;

pub use config::{OutputSettings, Settings};
pub use error::{Result, SettingsError};
