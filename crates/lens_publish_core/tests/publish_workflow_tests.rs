use lens_publish_core::error::{PublishError, RemoteError};
use lens_publish_core::ports::LensStatus;
use lens_publish_core::test_helpers::{
    not_found, sample_job, Call, CallLog, FakeCatalog, FakeReporter, FakeSource, SAMPLE_LENS_ARN,
};
use lens_publish_core::workflow::{publish_lens, TAG_LENS_ALIAS};
use serde_json::{json, Value};

const EXISTING_ARN: &str = "arn:aws:wellarchitected:us-east-1:123456789012:lens/existing";

fn lens_bytes(value: Value) -> Vec<u8> {
    value.to_string().into_bytes()
}

fn is_catalog_call(call: &Call) -> bool {
    matches!(
        call,
        Call::ListLenses { .. }
            | Call::ImportLens { .. }
            | Call::TagResource { .. }
            | Call::CreateLensVersion { .. }
            | Call::DeleteLens { .. }
    )
}

#[test]
fn new_lens_is_imported_tagged_versioned_and_reported() {
    let log = CallLog::default();
    let source = FakeSource::with_content(&log, lens_bytes(json!({"name": "My Lens"})));
    let catalog = FakeCatalog::new(&log);
    let reporter = FakeReporter::new(&log);

    let outcome = publish_lens(&sample_job(), "lens.json", &source, &catalog, &reporter)
        .expect("publish should succeed");

    assert!(outcome.created);
    assert_eq!(outcome.lens_arn, SAMPLE_LENS_ARN);
    assert_eq!(outcome.lens_version, "1.0");

    let calls = log.calls();
    assert_eq!(calls.len(), 6);
    assert_eq!(
        calls[0],
        Call::GetFile {
            repository: "well-architected-lens".to_string(),
            commit: "0f1e2d3c".to_string(),
            path: "lens.json".to_string(),
        }
    );
    assert_eq!(
        calls[1],
        Call::ListLenses {
            status: LensStatus::All,
            lens_name: "My Lens".to_string(),
        }
    );
    assert!(matches!(&calls[2], Call::ImportLens { lens_alias: None, .. }));
    assert!(matches!(&calls[3], Call::TagResource { arn, .. } if arn == SAMPLE_LENS_ARN));
    assert_eq!(
        calls[4],
        Call::CreateLensVersion {
            lens_alias: SAMPLE_LENS_ARN.to_string(),
            version: "1.0".to_string(),
            is_major_version: true,
        }
    );
    assert_eq!(
        calls[5],
        Call::JobSuccess {
            job_id: "job-1".to_string(),
        }
    );
}

#[test]
fn existing_lens_is_updated_through_first_listed_arn() {
    let log = CallLog::default();
    let source = FakeSource::with_content(&log, lens_bytes(json!({"name": "My Lens"})));
    let catalog = FakeCatalog::new(&log)
        .with_existing(EXISTING_ARN, "My Lens")
        .with_existing("arn:aws:wellarchitected:us-east-1:123456789012:lens/second", "My Lens");
    let reporter = FakeReporter::new(&log);

    let outcome = publish_lens(&sample_job(), "lens.json", &source, &catalog, &reporter)
        .expect("publish should succeed");

    assert!(!outcome.created);
    assert_eq!(outcome.lens_arn, EXISTING_ARN);
    assert!(log.calls().iter().any(|call| matches!(
        call,
        Call::ImportLens { lens_alias: Some(alias), .. } if alias == EXISTING_ARN
    )));
}

#[test]
fn listed_lenses_with_other_names_are_ignored() {
    let log = CallLog::default();
    let source = FakeSource::with_content(&log, lens_bytes(json!({"name": "My Lens"})));
    let catalog = FakeCatalog::new(&log)
        .with_existing("arn:aws:wellarchitected:us-east-1:123456789012:lens/other", "My Lens Extended")
        .with_existing(EXISTING_ARN, "My Lens");
    let reporter = FakeReporter::new(&log);

    let outcome = publish_lens(&sample_job(), "lens.json", &source, &catalog, &reporter)
        .expect("publish should succeed");

    assert_eq!(outcome.lens_arn, EXISTING_ARN);
}

#[test]
fn fetch_not_found_reports_and_skips_catalog() {
    let log = CallLog::default();
    let source = FakeSource::failing(&log, not_found("File lens.json does not exist"));
    let catalog = FakeCatalog::new(&log);
    let reporter = FakeReporter::new(&log);

    let error = publish_lens(&sample_job(), "lens.json", &source, &catalog, &reporter)
        .expect_err("fetch failure should propagate");

    assert!(matches!(error, PublishError::SourceFetch { .. }));
    assert_eq!(
        log.failure_messages(),
        vec!["ResourceNotFoundException: File lens.json does not exist".to_string()]
    );
    assert_eq!(log.count(is_catalog_call), 0);
    assert_eq!(log.count(|call| matches!(call, Call::JobSuccess { .. })), 0);
}

#[test]
fn invalid_json_reports_file_and_repo() {
    let log = CallLog::default();
    let source = FakeSource::with_content(&log, "{ not json");
    let catalog = FakeCatalog::new(&log);
    let reporter = FakeReporter::new(&log);

    let error = publish_lens(&sample_job(), "lens.json", &source, &catalog, &reporter)
        .expect_err("parse failure should propagate");

    assert!(matches!(error, PublishError::MalformedDocument { .. }));
    assert_eq!(
        log.failure_messages(),
        vec!["Error getting file lens.json from well-architected-lens: Invalid JSON".to_string()]
    );
    assert_eq!(log.count(is_catalog_call), 0);
}

#[test]
fn failure_report_carries_execution_id() {
    let log = CallLog::default();
    let source = FakeSource::failing(&log, not_found("missing"));
    let catalog = FakeCatalog::new(&log);
    let reporter = FakeReporter::new(&log);

    publish_lens(&sample_job(), "lens.json", &source, &catalog, &reporter)
        .expect_err("fetch failure should propagate");

    assert!(log.calls().contains(&Call::JobFailure {
        job_id: "job-1".to_string(),
        message: "ResourceNotFoundException: missing".to_string(),
        execution_id: "request-1".to_string(),
    }));
}

#[test]
fn version_failure_deletes_draft_once_after_reporting() {
    let log = CallLog::default();
    let source = FakeSource::with_content(&log, lens_bytes(json!({"name": "My Lens"})));
    let catalog = FakeCatalog::new(&log).failing_version(RemoteError::new(
        "ConflictException",
        "Lens version 1.0 already exists",
    ));
    let reporter = FakeReporter::new(&log);

    let error = publish_lens(&sample_job(), "lens.json", &source, &catalog, &reporter)
        .expect_err("version failure should propagate");

    assert!(matches!(error, PublishError::Version { .. }));
    assert_eq!(
        log.failure_messages(),
        vec!["ConflictException: Lens version 1.0 already exists".to_string()]
    );

    let calls = log.calls();
    let deletes: Vec<_> = calls
        .iter()
        .filter(|call| matches!(call, Call::DeleteLens { .. }))
        .collect();
    assert_eq!(
        deletes,
        vec![&Call::DeleteLens {
            lens_alias: SAMPLE_LENS_ARN.to_string(),
            status: LensStatus::Draft,
        }]
    );

    let failure_at = calls
        .iter()
        .position(|call| matches!(call, Call::JobFailure { .. }))
        .expect("failure reported");
    let delete_at = calls
        .iter()
        .position(|call| matches!(call, Call::DeleteLens { .. }))
        .expect("draft deleted");
    assert!(failure_at < delete_at);
    assert_eq!(log.count(|call| matches!(call, Call::JobSuccess { .. })), 0);
}

#[test]
fn failed_draft_delete_surfaces_compensation_error() {
    let log = CallLog::default();
    let source = FakeSource::with_content(&log, lens_bytes(json!({"name": "My Lens"})));
    let catalog = FakeCatalog::new(&log)
        .failing_version(RemoteError::new("ValidationException", "bad version"))
        .failing_delete(RemoteError::new("AccessDeniedException", "not allowed"));
    let reporter = FakeReporter::new(&log);

    let error = publish_lens(&sample_job(), "lens.json", &source, &catalog, &reporter)
        .expect_err("compensation failure should propagate");

    match error {
        PublishError::Compensation {
            version_error,
            source,
            ..
        } => {
            assert_eq!(version_error.code, "ValidationException");
            assert_eq!(source.code, "AccessDeniedException");
        }
        other => panic!("expected compensation error, got {other:?}"),
    }
    assert_eq!(log.failure_messages(), vec!["ValidationException: bad version".to_string()]);
}

#[test]
fn import_failure_is_reported_without_compensation() {
    let log = CallLog::default();
    let source = FakeSource::with_content(&log, lens_bytes(json!({"name": "My Lens"})));
    let catalog = FakeCatalog::new(&log)
        .failing_import(RemoteError::new("ValidationException", "Invalid pillar"));
    let reporter = FakeReporter::new(&log);

    let error = publish_lens(&sample_job(), "lens.json", &source, &catalog, &reporter)
        .expect_err("import failure should propagate");

    assert!(matches!(error, PublishError::Publish { .. }));
    assert_eq!(log.failure_messages(), vec!["ValidationException: Invalid pillar".to_string()]);
    assert_eq!(log.count(|call| matches!(call, Call::TagResource { .. })), 0);
    assert_eq!(log.count(|call| matches!(call, Call::DeleteLens { .. })), 0);
}

#[test]
fn tag_failure_takes_the_publish_path() {
    let log = CallLog::default();
    let source = FakeSource::with_content(&log, lens_bytes(json!({"name": "My Lens"})));
    let catalog =
        FakeCatalog::new(&log).failing_tag(RemoteError::new("ThrottlingException", "Rate exceeded"));
    let reporter = FakeReporter::new(&log);

    let error = publish_lens(&sample_job(), "lens.json", &source, &catalog, &reporter)
        .expect_err("tag failure should propagate");

    assert!(matches!(error, PublishError::Publish { .. }));
    assert_eq!(log.failure_messages(), vec!["ThrottlingException: Rate exceeded".to_string()]);
    assert_eq!(log.count(|call| matches!(call, Call::CreateLensVersion { .. })), 0);
    assert_eq!(log.count(|call| matches!(call, Call::DeleteLens { .. })), 0);
}

#[test]
fn list_failure_is_reported() {
    let log = CallLog::default();
    let source = FakeSource::with_content(&log, lens_bytes(json!({"name": "My Lens"})));
    let catalog = FakeCatalog::new(&log)
        .failing_list(RemoteError::new("AccessDeniedException", "not authorized"));
    let reporter = FakeReporter::new(&log);

    let error = publish_lens(&sample_job(), "lens.json", &source, &catalog, &reporter)
        .expect_err("list failure should propagate");

    assert!(matches!(error, PublishError::Publish { .. }));
    assert_eq!(log.count(|call| matches!(call, Call::ImportLens { .. })), 0);
}

#[test]
fn rejected_failure_report_skips_draft_delete() {
    let log = CallLog::default();
    let source = FakeSource::with_content(&log, lens_bytes(json!({"name": "My Lens"})));
    let catalog =
        FakeCatalog::new(&log).failing_version(RemoteError::new("ConflictException", "exists"));
    let reporter =
        FakeReporter::rejecting(&log, RemoteError::new("JobNotFoundException", "no such job"));

    let error = publish_lens(&sample_job(), "lens.json", &source, &catalog, &reporter)
        .expect_err("report failure should propagate");

    assert!(matches!(error, PublishError::Report { .. }));
    assert_eq!(log.count(|call| matches!(call, Call::DeleteLens { .. })), 0);
}

#[test]
fn rejected_success_report_fails_the_run() {
    let log = CallLog::default();
    let source = FakeSource::with_content(&log, lens_bytes(json!({"name": "My Lens"})));
    let catalog = FakeCatalog::new(&log);
    let reporter =
        FakeReporter::rejecting(&log, RemoteError::new("InvalidJobStateException", "done"));

    let error = publish_lens(&sample_job(), "lens.json", &source, &catalog, &reporter)
        .expect_err("report failure should propagate");

    match error {
        PublishError::Report { job_id, source } => {
            assert_eq!(job_id, "job-1");
            assert_eq!(source.code, "InvalidJobStateException");
        }
        other => panic!("expected report error, got {other:?}"),
    }
}

#[test]
fn cost_lens_is_published_under_normalized_alias() {
    let log = CallLog::default();
    let document = json!({
        "schemaVersion": "2021-11-01",
        "name": "Cost Lens",
        "_version": "2.0",
        "description": "Cost review questions",
        "pillars": []
    });
    let source = FakeSource::with_content(&log, lens_bytes(document.clone()));
    let catalog = FakeCatalog::new(&log).with_imported_arn(EXISTING_ARN);
    let reporter = FakeReporter::new(&log);

    let outcome = publish_lens(&sample_job(), "lens.json", &source, &catalog, &reporter)
        .expect("publish should succeed");

    assert_eq!(
        outcome.lens_alias,
        "arn:aws:wellarchitected:us-east-1:123456789012:lens/cost-lens"
    );
    assert_eq!(outcome.lens_version, "2.0");

    let calls = log.calls();
    let forwarded = calls
        .iter()
        .find_map(|call| match call {
            Call::ImportLens { json_string, .. } => Some(json_string.clone()),
            _ => None,
        })
        .expect("import issued");
    assert_eq!(
        serde_json::from_str::<Value>(&forwarded).expect("forwarded json"),
        document
    );

    let tags = calls
        .iter()
        .find_map(|call| match call {
            Call::TagResource { tags, .. } => Some(tags.clone()),
            _ => None,
        })
        .expect("tags applied");
    assert!(tags[TAG_LENS_ALIAS].contains("lens/cost-lens"));
    assert_eq!(tags["Repository"], "well-architected-lens");
    assert_eq!(tags["Branch"], "main");
    assert_eq!(tags["CommitId"], "0f1e2d3c");

    assert!(calls.contains(&Call::CreateLensVersion {
        lens_alias: EXISTING_ARN.to_string(),
        version: "2.0".to_string(),
        is_major_version: true,
    }));
    assert_eq!(calls.last(), Some(&Call::JobSuccess { job_id: "job-1".to_string() }));
}
