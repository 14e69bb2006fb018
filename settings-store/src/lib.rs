//! Settings Store for BackSearch
//!
//! This crate provides the key-value persistence behind the user's settings
//! and the typed loading/saving helpers the tracker uses.
//!
//! # Features
//! - `SettingsStore` trait with change notifications
//! - In-memory and JSON file backends
//! - Parsing of newline-delimited pattern lists

pub mod parse;
pub mod store;
pub mod memory;
pub mod file;

pub use parse::*;
pub use store::*;
pub use memory::MemorySettingsStore;
pub use file::JsonFileSettingsStore;
