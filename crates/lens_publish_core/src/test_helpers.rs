//! Recording fakes for the collaborator traits.
//!
//! Every fake appends to a shared [`CallLog`] so tests can assert on the
//! exact order of remote calls across collaborators.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::error::RemoteError;
use crate::job::JobContext;
use crate::ports::{JobReporter, LensCatalog, LensStatus, LensSummary, SourceRepository};

pub const SAMPLE_LENS_ARN: &str =
    "arn:aws:wellarchitected:us-east-1:123456789012:lens/0123456789abcdef";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetFile {
        repository: String,
        commit: String,
        path: String,
    },
    ListLenses {
        status: LensStatus,
        lens_name: String,
    },
    ImportLens {
        json_string: String,
        lens_alias: Option<String>,
    },
    TagResource {
        arn: String,
        tags: BTreeMap<String, String>,
    },
    CreateLensVersion {
        lens_alias: String,
        version: String,
        is_major_version: bool,
    },
    DeleteLens {
        lens_alias: String,
        status: LensStatus,
    },
    JobSuccess {
        job_id: String,
    },
    JobFailure {
        job_id: String,
        message: String,
        execution_id: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn record(&self, call: Call) {
        self.calls.lock().expect("poisoned mutex").push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    pub fn failure_messages(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::JobFailure { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }
}

pub fn sample_job() -> JobContext {
    JobContext {
        job_id: "job-1".to_string(),
        execution_id: "request-1".to_string(),
        commit_id: "0f1e2d3c".to_string(),
        branch: "main".to_string(),
        repo_name: "well-architected-lens".to_string(),
        account_id: "123456789012".to_string(),
        region: "us-east-1".to_string(),
    }
}

pub fn not_found(message: &str) -> RemoteError {
    RemoteError::new("ResourceNotFoundException", message)
}

pub struct FakeSource {
    log: CallLog,
    response: Result<Vec<u8>, RemoteError>,
}

impl FakeSource {
    pub fn with_content(log: &CallLog, content: impl Into<Vec<u8>>) -> Self {
        Self {
            log: log.clone(),
            response: Ok(content.into()),
        }
    }

    pub fn failing(log: &CallLog, error: RemoteError) -> Self {
        Self {
            log: log.clone(),
            response: Err(error),
        }
    }
}

impl SourceRepository for FakeSource {
    fn get_file(&self, repository: &str, commit: &str, path: &str) -> Result<Vec<u8>, RemoteError> {
        self.log.record(Call::GetFile {
            repository: repository.to_string(),
            commit: commit.to_string(),
            path: path.to_string(),
        });
        self.response.clone()
    }
}

/// Catalog fake. Every operation succeeds unless a failure is queued for it.
pub struct FakeCatalog {
    log: CallLog,
    existing: Vec<LensSummary>,
    imported_arn: String,
    list_failure: Option<RemoteError>,
    import_failure: Option<RemoteError>,
    tag_failure: Option<RemoteError>,
    version_failure: Option<RemoteError>,
    delete_failure: Mutex<VecDeque<RemoteError>>,
}

impl FakeCatalog {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            existing: Vec::new(),
            imported_arn: SAMPLE_LENS_ARN.to_string(),
            list_failure: None,
            import_failure: None,
            tag_failure: None,
            version_failure: None,
            delete_failure: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_existing(mut self, lens_arn: &str, lens_name: &str) -> Self {
        self.existing.push(LensSummary {
            lens_arn: lens_arn.to_string(),
            lens_name: lens_name.to_string(),
        });
        self
    }

    pub fn with_imported_arn(mut self, lens_arn: &str) -> Self {
        self.imported_arn = lens_arn.to_string();
        self
    }

    pub fn failing_list(mut self, error: RemoteError) -> Self {
        self.list_failure = Some(error);
        self
    }

    pub fn failing_import(mut self, error: RemoteError) -> Self {
        self.import_failure = Some(error);
        self
    }

    pub fn failing_tag(mut self, error: RemoteError) -> Self {
        self.tag_failure = Some(error);
        self
    }

    pub fn failing_version(mut self, error: RemoteError) -> Self {
        self.version_failure = Some(error);
        self
    }

    pub fn failing_delete(self, error: RemoteError) -> Self {
        self.delete_failure
            .lock()
            .expect("poisoned mutex")
            .push_back(error);
        self
    }

    fn outcome(failure: &Option<RemoteError>) -> Result<(), RemoteError> {
        match failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl LensCatalog for FakeCatalog {
    fn list_custom_lenses(
        &self,
        status: LensStatus,
        lens_name: &str,
    ) -> Result<Vec<LensSummary>, RemoteError> {
        self.log.record(Call::ListLenses {
            status,
            lens_name: lens_name.to_string(),
        });
        Self::outcome(&self.list_failure)?;
        Ok(self.existing.clone())
    }

    fn import_lens(
        &self,
        json_string: &str,
        lens_alias: Option<&str>,
    ) -> Result<String, RemoteError> {
        self.log.record(Call::ImportLens {
            json_string: json_string.to_string(),
            lens_alias: lens_alias.map(str::to_string),
        });
        Self::outcome(&self.import_failure)?;
        Ok(lens_alias.unwrap_or(&self.imported_arn).to_string())
    }

    fn tag_resource(&self, arn: &str, tags: &BTreeMap<String, String>) -> Result<(), RemoteError> {
        self.log.record(Call::TagResource {
            arn: arn.to_string(),
            tags: tags.clone(),
        });
        Self::outcome(&self.tag_failure)
    }

    fn create_lens_version(
        &self,
        lens_alias: &str,
        version: &str,
        is_major_version: bool,
    ) -> Result<(), RemoteError> {
        self.log.record(Call::CreateLensVersion {
            lens_alias: lens_alias.to_string(),
            version: version.to_string(),
            is_major_version,
        });
        Self::outcome(&self.version_failure)
    }

    fn delete_lens(&self, lens_alias: &str, status: LensStatus) -> Result<(), RemoteError> {
        self.log.record(Call::DeleteLens {
            lens_alias: lens_alias.to_string(),
            status,
        });
        match self.delete_failure.lock().expect("poisoned mutex").pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

pub struct FakeReporter {
    log: CallLog,
    failure: Option<RemoteError>,
}

impl FakeReporter {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            failure: None,
        }
    }

    pub fn rejecting(log: &CallLog, error: RemoteError) -> Self {
        Self {
            log: log.clone(),
            failure: Some(error),
        }
    }

    fn outcome(&self) -> Result<(), RemoteError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl JobReporter for FakeReporter {
    fn put_job_success(&self, job_id: &str) -> Result<(), RemoteError> {
        self.log.record(Call::JobSuccess {
            job_id: job_id.to_string(),
        });
        self.outcome()
    }

    fn put_job_failure(
        &self,
        job_id: &str,
        message: &str,
        execution_id: &str,
    ) -> Result<(), RemoteError> {
        self.log.record(Call::JobFailure {
            job_id: job_id.to_string(),
            message: message.to_string(),
            execution_id: execution_id.to_string(),
        });
        self.outcome()
    }
}
