//! storage-adapters
//!
//! JSON-file implementations of the store ports. Every store is read in full
//! and rewritten in full on each mutation, under a per-store lock.

pub mod entry_store;
pub mod json_file;
pub mod moderation_log;
pub mod word_list;

pub use entry_store::JsonEntryRepository;
pub use moderation_log::JsonModerationLog;
pub use word_list::FileWordList;
