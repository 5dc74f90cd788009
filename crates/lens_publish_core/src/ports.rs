//! Collaborator seams for the publish workflow.
//!
//! Implementations block until the remote call returns. The Lambda crate
//! provides the AWS-backed versions; `test_helpers` provides recording fakes.

use std::collections::BTreeMap;

use crate::error::RemoteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LensStatus {
    All,
    Draft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LensSummary {
    pub lens_arn: String,
    pub lens_name: String,
}

pub trait SourceRepository {
    fn get_file(&self, repository: &str, commit: &str, path: &str) -> Result<Vec<u8>, RemoteError>;
}

pub trait LensCatalog {
    /// Lists `CUSTOM_SELF` lenses in `status` filtered by `lens_name`,
    /// across every result page.
    ///
    /// The service-side name filter is not trusted to be exact: callers pick
    /// the first summary whose name equals theirs, not simply the first one
    /// listed.
    fn list_custom_lenses(
        &self,
        status: LensStatus,
        lens_name: &str,
    ) -> Result<Vec<LensSummary>, RemoteError>;

    /// Imports `json_string`, updating `lens_alias` when given. Returns the
    /// lens ARN.
    fn import_lens(&self, json_string: &str, lens_alias: Option<&str>)
        -> Result<String, RemoteError>;

    fn tag_resource(&self, arn: &str, tags: &BTreeMap<String, String>) -> Result<(), RemoteError>;

    fn create_lens_version(
        &self,
        lens_alias: &str,
        version: &str,
        is_major_version: bool,
    ) -> Result<(), RemoteError>;

    fn delete_lens(&self, lens_alias: &str, status: LensStatus) -> Result<(), RemoteError>;
}

pub trait JobReporter {
    fn put_job_success(&self, job_id: &str) -> Result<(), RemoteError>;

    fn put_job_failure(
        &self,
        job_id: &str,
        message: &str,
        execution_id: &str,
    ) -> Result<(), RemoteError>;
}
