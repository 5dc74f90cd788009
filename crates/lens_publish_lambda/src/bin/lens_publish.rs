use lambda_runtime::{service_fn, Error, LambdaEvent};
use lens_publish_core::config::PublisherConfig;
use lens_publish_lambda::adapters::codecommit::CodeCommitSource;
use lens_publish_lambda::adapters::codepipeline::CodePipelineReporter;
use lens_publish_lambda::adapters::wellarchitected::WellArchitectedCatalog;
use lens_publish_lambda::handlers::publish::{
    handle_publish_event, InvocationIdentity, PublishResponse,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Clients built once per execution environment and reused across invocations.
struct RuntimeDependencies {
    config: PublisherConfig,
    source: CodeCommitSource,
    catalog: WellArchitectedCatalog,
    reporter: CodePipelineReporter,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<PublishResponse, Error> {
    let (payload, context) = event.into_parts();
    let identity = InvocationIdentity {
        request_id: &context.request_id,
        invoked_function_arn: &context.invoked_function_arn,
    };

    let response = handle_publish_event(
        payload,
        identity,
        &deps.config,
        &deps.source,
        &deps.catalog,
        &deps.reporter,
    )?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let config = PublisherConfig::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        config,
        source: CodeCommitSource::new(aws_sdk_codecommit::Client::new(&aws_config)),
        catalog: WellArchitectedCatalog::new(aws_sdk_wellarchitected::Client::new(&aws_config)),
        reporter: CodePipelineReporter::new(aws_sdk_codepipeline::Client::new(&aws_config)),
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &deps))).await
}
