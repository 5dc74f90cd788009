use aws_sdk_codepipeline::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_codepipeline::types::{FailureDetails, FailureType};
use lens_publish_core::error::RemoteError;
use lens_publish_core::ports::JobReporter;

use super::{block_on, remote_error};

pub struct CodePipelineReporter {
    client: aws_sdk_codepipeline::Client,
}

impl CodePipelineReporter {
    pub fn new(client: aws_sdk_codepipeline::Client) -> Self {
        Self { client }
    }
}

impl JobReporter for CodePipelineReporter {
    fn put_job_success(&self, job_id: &str) -> Result<(), RemoteError> {
        block_on(async {
            self.client
                .put_job_success_result()
                .job_id(job_id)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| {
                    remote_error(error.code(), error.message(), DisplayErrorContext(&error))
                })
        })
    }

    fn put_job_failure(
        &self,
        job_id: &str,
        message: &str,
        execution_id: &str,
    ) -> Result<(), RemoteError> {
        let failure_details = FailureDetails::builder()
            .r#type(FailureType::JobFailed)
            .message(message)
            .external_execution_id(execution_id)
            .build()
            .map_err(|error| RemoteError::new("InvalidFailureDetails", error.to_string()))?;

        block_on(async {
            self.client
                .put_job_failure_result()
                .job_id(job_id)
                .failure_details(failure_details)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| {
                    remote_error(error.code(), error.message(), DisplayErrorContext(&error))
                })
        })
    }
}
