use std::fmt::Display;
use std::future::Future;

use lens_publish_core::error::RemoteError;

pub mod codecommit;
pub mod codepipeline;
pub mod wellarchitected;

/// Code used when an SDK failure carries no service error code, such as a
/// dispatch or timeout failure.
pub const UNCLASSIFIED_ERROR_CODE: &str = "SdkError";

/// Runs an SDK future to completion from the synchronous collaborator traits.
/// Requires the multi-thread tokio runtime.
pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

pub(crate) fn remote_error(
    code: Option<&str>,
    message: Option<&str>,
    context: impl Display,
) -> RemoteError {
    match code {
        Some(code) => RemoteError::new(code, message.unwrap_or_default()),
        None => RemoteError::new(UNCLASSIFIED_ERROR_CODE, context.to_string()),
    }
}
