//! Lens publishing workflow primitives.
//!
//! This crate owns the document and job models, the collaborator traits and
//! the publish workflow itself. It carries no AWS SDK or Lambda runtime
//! dependencies; those live in `lens_publish_lambda`.

pub mod config;
pub mod document;
pub mod error;
pub mod job;
pub mod ports;
pub mod workflow;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
