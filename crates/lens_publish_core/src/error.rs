use thiserror::Error;

/// A failed call to a remote collaborator, reduced to its service error code
/// and message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct RemoteError {
    pub code: String,
    pub message: String,
}

impl RemoteError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to fetch {file} from {repo}: {source}")]
    SourceFetch {
        repo: String,
        file: String,
        source: RemoteError,
    },
    #[error("Error getting file {file} from {repo}: Invalid JSON")]
    MalformedDocument {
        repo: String,
        file: String,
        source: serde_json::Error,
    },
    #[error("failed to publish lens '{lens_name}': {source}")]
    Publish {
        lens_name: String,
        source: RemoteError,
    },
    #[error("failed to create version {version} of {lens_arn}: {source}")]
    Version {
        lens_arn: String,
        version: String,
        source: RemoteError,
    },
    /// The draft delete issued after a version failure failed as well.
    #[error("failed to delete draft {lens_arn} after version failure ({version_error}): {source}")]
    Compensation {
        lens_arn: String,
        version_error: RemoteError,
        source: RemoteError,
    },
    #[error("failed to report status of job {job_id}: {source}")]
    Report { job_id: String, source: RemoteError },
}

impl PublishError {
    /// Message sent to the pipeline as the job failure details.
    pub fn job_failure_message(&self) -> String {
        match self {
            Self::SourceFetch { source, .. }
            | Self::Publish { source, .. }
            | Self::Version { source, .. }
            | Self::Report { source, .. } => source.to_string(),
            Self::MalformedDocument { .. } => self.to_string(),
            Self::Compensation { version_error, .. } => version_error.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("malformed CodePipeline job event: {0}")]
    Event(#[source] serde_json::Error),
    #[error("malformed UserParameters: {0}")]
    UserParameters(#[source] serde_json::Error),
    #[error("cannot derive account id from function ARN '{0}'")]
    FunctionArn(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
}
