//! classifier-adapters
//!
//! Implementations of the sentiment and toxicity ports: a model-backed HTTP
//! client and a deterministic stub for tests and offline runs.

pub mod labels;
pub mod stub;

#[cfg(feature = "classifier-http")]
pub mod http;

#[cfg(feature = "classifier-http")]
pub use http::{HttpClassifier, HttpClassifierConfig};
pub use stub::StubClassifier;
