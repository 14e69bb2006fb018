//! Browser Connector module for BackSearch
//!
//! This module models everything exchanged with the browser host: the events
//! it delivers (navigations, commands, icon clicks, tab removal, settings
//! changes) and the navigation commands sent back to it.
//!
//! # Features
//! - Typed host events with an order-preserving single-consumer queue
//! - `TabController` trait for issuing tab navigations
//! - Line-delimited JSON protocol over any async reader/writer pair

pub mod traits;
pub mod events;
pub mod protocol;

pub use traits::*;
pub use events::*;
pub use protocol::*;
