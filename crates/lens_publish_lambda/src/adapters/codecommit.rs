use aws_sdk_codecommit::error::{DisplayErrorContext, ProvideErrorMetadata};
use lens_publish_core::error::RemoteError;
use lens_publish_core::ports::SourceRepository;

use super::{block_on, remote_error};

pub struct CodeCommitSource {
    client: aws_sdk_codecommit::Client,
}

impl CodeCommitSource {
    pub fn new(client: aws_sdk_codecommit::Client) -> Self {
        Self { client }
    }
}

impl SourceRepository for CodeCommitSource {
    fn get_file(&self, repository: &str, commit: &str, path: &str) -> Result<Vec<u8>, RemoteError> {
        block_on(async {
            self.client
                .get_file()
                .repository_name(repository)
                .commit_specifier(commit)
                .file_path(path)
                .send()
                .await
                .map(|output| output.file_content().as_ref().to_vec())
                .map_err(|error| {
                    remote_error(error.code(), error.message(), DisplayErrorContext(&error))
                })
        })
    }
}
