//! AWS integration for the lens publisher.
//!
//! This crate owns the SDK-backed collaborators (CodeCommit, Well-Architected,
//! CodePipeline) and the Lambda event handler. Workflow semantics live in
//! `lens_publish_core`.

pub mod adapters;
pub mod handlers;
