use lens_publish_core::config::PublisherConfig;
use lens_publish_core::error::{EventError, PublishError};
use lens_publish_core::job::JobContext;
use lens_publish_core::ports::{JobReporter, LensCatalog, SourceRepository};
use lens_publish_core::workflow::publish_lens;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

/// Identity fields taken from the Lambda invocation context.
#[derive(Debug, Clone, Copy)]
pub struct InvocationIdentity<'a> {
    pub request_id: &'a str,
    pub invoked_function_arn: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishResponse {
    pub status: String,
    pub lens_arn: String,
    pub lens_version: String,
    pub created: bool,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}

pub fn handle_publish_event(
    event: Value,
    identity: InvocationIdentity<'_>,
    config: &PublisherConfig,
    source: &impl SourceRepository,
    catalog: &impl LensCatalog,
    reporter: &impl JobReporter,
) -> Result<PublishResponse, HandlerError> {
    // Without a parsed job id there is no job to fail, so this only propagates.
    let job = JobContext::from_invocation(
        event,
        identity.request_id,
        identity.invoked_function_arn,
        &config.region,
    )
    .inspect_err(|event_error| {
        error!(
            request_id = identity.request_id,
            error = %event_error,
            "rejected invocation event"
        );
    })?;

    let outcome = publish_lens(&job, &config.file_path, source, catalog, reporter)?;
    Ok(PublishResponse {
        status: "published".to_string(),
        lens_arn: outcome.lens_arn,
        lens_version: outcome.lens_version,
        created: outcome.created,
    })
}
