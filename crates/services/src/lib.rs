//! services
//!
//! Moderation pipeline and deletion coordination over the domain ports.

pub mod deletion;
pub mod flagging;
pub mod normalizer;
pub mod signals;
pub mod submission;

pub use deletion::CascadeDeleteCoordinator;
pub use signals::{SignalCollector, SignalPolicy};
pub use submission::SubmissionService;
