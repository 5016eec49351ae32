//! domains
//!
//! Core entities, the derived tag index and the port traits of the moderation
//! backend. No I/O lives here.

pub mod errors;
pub mod models;
pub mod ports;
pub mod tag_index;
pub mod timestamp;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use ports::*;
pub use tag_index::TagIndex;
