//! The lens publish workflow.
//!
//! One call runs `Fetching → Resolving → Publishing → Tagging → Versioning →
//! Done`. The first failing step is reported to the pipeline and returned to
//! the caller. A failed version additionally deletes the draft left behind by
//! the import.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{error, info, warn};

use crate::document::{lens_alias_arn, normalize_lens_name, LensDocument};
use crate::error::{PublishError, RemoteError};
use crate::job::JobContext;
use crate::ports::{JobReporter, LensCatalog, LensStatus, SourceRepository};

pub const TAG_LENS_ALIAS: &str = "LensAlias";
pub const TAG_REPOSITORY: &str = "Repository";
pub const TAG_BRANCH: &str = "Branch";
pub const TAG_COMMIT_ID: &str = "CommitId";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    Fetching,
    Resolving,
    Publishing,
    Tagging,
    Versioning,
    Compensating,
    Done,
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fetching => "fetching",
            Self::Resolving => "resolving",
            Self::Publishing => "publishing",
            Self::Tagging => "tagging",
            Self::Versioning => "versioning",
            Self::Compensating => "compensating",
            Self::Done => "done",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub lens_arn: String,
    pub lens_alias: String,
    pub lens_version: String,
    /// `false` when an existing entry was updated in place.
    pub created: bool,
}

/// Where a document lands in the catalog, computed before any catalog call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LensTarget {
    pub lens_name: String,
    pub lens_name_normalized: String,
    pub lens_alias: String,
    pub lens_version: String,
}

impl LensTarget {
    pub fn resolve(job: &JobContext, document: &LensDocument) -> Self {
        let lens_name_normalized = normalize_lens_name(document.name());
        Self {
            lens_name: document.name().to_string(),
            lens_alias: lens_alias_arn(&job.region, &job.account_id, &lens_name_normalized),
            lens_name_normalized,
            lens_version: document.version().to_string(),
        }
    }
}

pub fn lens_tags(job: &JobContext, target: &LensTarget) -> BTreeMap<String, String> {
    BTreeMap::from([
        (TAG_LENS_ALIAS.to_string(), target.lens_alias.clone()),
        (TAG_REPOSITORY.to_string(), job.repo_name.clone()),
        (TAG_BRANCH.to_string(), job.branch.clone()),
        (TAG_COMMIT_ID.to_string(), job.commit_id.clone()),
    ])
}

pub fn publish_lens(
    job: &JobContext,
    file_path: &str,
    source: &impl SourceRepository,
    catalog: &impl LensCatalog,
    reporter: &impl JobReporter,
) -> Result<PublishOutcome, PublishError> {
    info!(
        job_id = %job.job_id,
        repo = %job.repo_name,
        branch = %job.branch,
        commit_id = %job.commit_id,
        "deploying lens"
    );

    enter_stage(job, PublishStage::Fetching);
    let document = match fetch_document(job, file_path, source) {
        Ok(value) => value,
        Err(error) => return Err(fail(job, reporter, error)),
    };

    enter_stage(job, PublishStage::Resolving);
    let target = LensTarget::resolve(job, &document);
    // First exact name match, not the first summary listed.
    let update_target = match catalog.list_custom_lenses(LensStatus::All, &target.lens_name) {
        Ok(summaries) => summaries
            .into_iter()
            .find(|summary| summary.lens_name == target.lens_name)
            .map(|summary| summary.lens_arn),
        Err(source) => return Err(fail(job, reporter, publish_error(&target, source))),
    };

    enter_stage(job, PublishStage::Publishing);
    let json_string = match document.to_json_string() {
        Ok(value) => value,
        Err(source) => {
            let error = PublishError::MalformedDocument {
                repo: job.repo_name.clone(),
                file: file_path.to_string(),
                source,
            };
            return Err(fail(job, reporter, error));
        }
    };
    let lens_arn = match catalog.import_lens(&json_string, update_target.as_deref()) {
        Ok(value) => value,
        Err(source) => return Err(fail(job, reporter, publish_error(&target, source))),
    };
    info!(
        job_id = %job.job_id,
        lens_arn = %lens_arn,
        updated = update_target.is_some(),
        "lens imported"
    );

    enter_stage(job, PublishStage::Tagging);
    if let Err(source) = catalog.tag_resource(&lens_arn, &lens_tags(job, &target)) {
        return Err(fail(job, reporter, publish_error(&target, source)));
    }

    enter_stage(job, PublishStage::Versioning);
    if let Err(version_error) =
        catalog.create_lens_version(&lens_arn, &target.lens_version, true)
    {
        let error = PublishError::Version {
            lens_arn: lens_arn.clone(),
            version: target.lens_version.clone(),
            source: version_error.clone(),
        };
        log_failure(job, &error);
        report_failure(job, reporter, &error)?;

        enter_stage(job, PublishStage::Compensating);
        if let Err(source) = catalog.delete_lens(&lens_arn, LensStatus::Draft) {
            let error = PublishError::Compensation {
                lens_arn,
                version_error,
                source,
            };
            error!(job_id = %job.job_id, error = %error, "draft cleanup failed");
            return Err(error);
        }
        warn!(job_id = %job.job_id, lens_arn = %lens_arn, "deleted draft after version failure");
        return Err(error);
    }

    reporter
        .put_job_success(&job.job_id)
        .map_err(|source| PublishError::Report {
            job_id: job.job_id.clone(),
            source,
        })?;
    enter_stage(job, PublishStage::Done);

    Ok(PublishOutcome {
        lens_arn,
        lens_alias: target.lens_alias,
        lens_version: target.lens_version,
        created: update_target.is_none(),
    })
}

fn fetch_document(
    job: &JobContext,
    file_path: &str,
    source: &impl SourceRepository,
) -> Result<LensDocument, PublishError> {
    let content = source
        .get_file(&job.repo_name, &job.commit_id, file_path)
        .map_err(|source| PublishError::SourceFetch {
            repo: job.repo_name.clone(),
            file: file_path.to_string(),
            source,
        })?;

    LensDocument::from_slice(&content).map_err(|source| PublishError::MalformedDocument {
        repo: job.repo_name.clone(),
        file: file_path.to_string(),
        source,
    })
}

fn publish_error(target: &LensTarget, source: RemoteError) -> PublishError {
    PublishError::Publish {
        lens_name: target.lens_name.clone(),
        source,
    }
}

/// Logs and reports `error`, returning whichever error the caller should
/// propagate.
fn fail(job: &JobContext, reporter: &impl JobReporter, error: PublishError) -> PublishError {
    log_failure(job, &error);
    match report_failure(job, reporter, &error) {
        Ok(()) => error,
        Err(report_error) => report_error,
    }
}

fn report_failure(
    job: &JobContext,
    reporter: &impl JobReporter,
    error: &PublishError,
) -> Result<(), PublishError> {
    reporter
        .put_job_failure(&job.job_id, &error.job_failure_message(), &job.execution_id)
        .map_err(|source| PublishError::Report {
            job_id: job.job_id.clone(),
            source,
        })
}

fn log_failure(job: &JobContext, error: &PublishError) {
    error!(
        job_id = %job.job_id,
        execution_id = %job.execution_id,
        message = %error.job_failure_message(),
        "lens publish failed"
    );
}

fn enter_stage(job: &JobContext, stage: PublishStage) {
    info!(job_id = %job.job_id, stage = %stage, "stage");
}
