use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EventError;

/// The subset of a CodePipeline Lambda invoke event this handler reads.
#[derive(Debug, Clone, Deserialize)]
pub struct CodePipelineEvent {
    #[serde(rename = "CodePipeline.job")]
    pub job: CodePipelineJob,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodePipelineJob {
    pub id: String,
    pub data: CodePipelineJobData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodePipelineJobData {
    pub action_configuration: ActionConfiguration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionConfiguration {
    pub configuration: ActionConfigurationValues,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionConfigurationValues {
    #[serde(rename = "UserParameters")]
    pub user_parameters: String,
}

/// JSON carried in `UserParameters`, filled from the source action's
/// output variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct UserParameters {
    pub commit_id: String,
    pub branch: String,
    pub repo: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobContext {
    pub job_id: String,
    pub execution_id: String,
    pub commit_id: String,
    pub branch: String,
    pub repo_name: String,
    pub account_id: String,
    pub region: String,
}

impl JobContext {
    pub fn from_invocation(
        event: Value,
        request_id: &str,
        invoked_function_arn: &str,
        region: &str,
    ) -> Result<Self, EventError> {
        let event: CodePipelineEvent = serde_json::from_value(event).map_err(EventError::Event)?;
        let parameters: UserParameters =
            serde_json::from_str(&event.job.data.action_configuration.configuration.user_parameters)
                .map_err(EventError::UserParameters)?;

        Ok(Self {
            job_id: event.job.id,
            execution_id: request_id.to_string(),
            commit_id: parameters.commit_id,
            branch: parameters.branch,
            repo_name: parameters.repo,
            account_id: account_id_from_function_arn(invoked_function_arn)?,
            region: region.to_string(),
        })
    }
}

/// `arn:aws:lambda:<region>:<account>:function:<name>` yields `<account>`.
pub fn account_id_from_function_arn(arn: &str) -> Result<String, EventError> {
    match arn.split(':').nth(4) {
        Some(account_id) if !account_id.is_empty() => Ok(account_id.to_string()),
        _ => Err(EventError::FunctionArn(arn.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FUNCTION_ARN: &str =
        "arn:aws:lambda:us-east-1:123456789012:function:LensDeploymentAction";

    fn sample_event(user_parameters: &str) -> Value {
        json!({
            "CodePipeline.job": {
                "id": "11111111-abcd-1111-abcd-111111abcdef",
                "accountId": "123456789012",
                "data": {
                    "actionConfiguration": {
                        "configuration": {
                            "FunctionName": "LensDeploymentAction",
                            "UserParameters": user_parameters
                        }
                    },
                    "inputArtifacts": [],
                    "outputArtifacts": []
                }
            }
        })
    }

    #[test]
    fn builds_context_from_invocation() {
        let event = sample_event(
            r#"{"CommitId":"abc123","Branch":"main","Repo":"well-architected-lens"}"#,
        );

        let context = JobContext::from_invocation(event, "request-1", FUNCTION_ARN, "us-east-1")
            .expect("event should parse");

        assert_eq!(
            context,
            JobContext {
                job_id: "11111111-abcd-1111-abcd-111111abcdef".to_string(),
                execution_id: "request-1".to_string(),
                commit_id: "abc123".to_string(),
                branch: "main".to_string(),
                repo_name: "well-architected-lens".to_string(),
                account_id: "123456789012".to_string(),
                region: "us-east-1".to_string(),
            }
        );
    }

    #[test]
    fn rejects_event_without_job() {
        let error = JobContext::from_invocation(json!({}), "request-1", FUNCTION_ARN, "us-east-1")
            .expect_err("missing job should fail");
        assert!(matches!(error, EventError::Event(_)));
    }

    #[test]
    fn rejects_user_parameters_missing_repo() {
        let event = sample_event(r#"{"CommitId":"abc123","Branch":"main"}"#);
        let error = JobContext::from_invocation(event, "request-1", FUNCTION_ARN, "us-east-1")
            .expect_err("missing repo should fail");
        assert!(matches!(error, EventError::UserParameters(_)));
    }

    #[test]
    fn extracts_account_id_from_function_arn() {
        assert_eq!(
            account_id_from_function_arn(FUNCTION_ARN).expect("valid arn"),
            "123456789012"
        );
    }

    #[test]
    fn rejects_short_function_arn() {
        let error = account_id_from_function_arn("arn:aws:lambda:us-east-1").expect_err("short");
        assert!(error.to_string().contains("arn:aws:lambda:us-east-1"));
    }
}
