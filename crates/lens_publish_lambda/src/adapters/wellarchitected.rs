use std::collections::{BTreeMap, HashMap};

use aws_sdk_wellarchitected::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_wellarchitected::types::{self as sdk, LensStatusType, LensType};
use lens_publish_core::error::RemoteError;
use lens_publish_core::ports::{LensCatalog, LensStatus, LensSummary};

use super::{block_on, remote_error};

pub struct WellArchitectedCatalog {
    client: aws_sdk_wellarchitected::Client,
}

fn sdk_error<E>(error: &E) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    remote_error(error.code(), error.message(), DisplayErrorContext(error))
}

fn status_type(status: LensStatus) -> LensStatusType {
    match status {
        LensStatus::All => LensStatusType::All,
        LensStatus::Draft => LensStatusType::Draft,
    }
}

/// Summaries without an ARN cannot be update targets and are dropped.
fn summaries_from_page(page: &[sdk::LensSummary]) -> Vec<LensSummary> {
    page.iter()
        .filter_map(|summary| {
            Some(LensSummary {
                lens_arn: summary.lens_arn()?.to_string(),
                lens_name: summary.lens_name().unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Calls `fetch_page` with the previous page's token until a page returns no
/// token or an empty one.
fn collect_lens_pages<F>(mut fetch_page: F) -> Result<Vec<LensSummary>, RemoteError>
where
    F: FnMut(Option<String>) -> Result<(Vec<LensSummary>, Option<String>), RemoteError>,
{
    let mut summaries = Vec::new();
    let mut next_token = None;
    loop {
        let (page, token) = fetch_page(next_token.take())?;
        summaries.extend(page);
        match token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => return Ok(summaries),
        }
    }
}

impl WellArchitectedCatalog {
    pub fn new(client: aws_sdk_wellarchitected::Client) -> Self {
        Self { client }
    }

    fn list_lenses_page(
        &self,
        status: LensStatus,
        lens_name: &str,
        next_token: Option<String>,
    ) -> Result<(Vec<LensSummary>, Option<String>), RemoteError> {
        block_on(async {
            self.client
                .list_lenses()
                .lens_type(LensType::CustomSelf)
                .lens_status(status_type(status))
                .lens_name(lens_name)
                .set_next_token(next_token)
                .send()
                .await
                .map(|output| {
                    (
                        summaries_from_page(output.lens_summaries()),
                        output.next_token().map(str::to_string),
                    )
                })
                .map_err(|error| sdk_error(&error))
        })
    }
}

impl LensCatalog for WellArchitectedCatalog {
    fn list_custom_lenses(
        &self,
        status: LensStatus,
        lens_name: &str,
    ) -> Result<Vec<LensSummary>, RemoteError> {
        collect_lens_pages(|next_token| self.list_lenses_page(status, lens_name, next_token))
    }

    fn import_lens(
        &self,
        json_string: &str,
        lens_alias: Option<&str>,
    ) -> Result<String, RemoteError> {
        let output = block_on(async {
            self.client
                .import_lens()
                .json_string(json_string)
                .set_lens_alias(lens_alias.map(str::to_string))
                .send()
                .await
                .map_err(|error| sdk_error(&error))
        })?;

        output
            .lens_arn()
            .map(str::to_string)
            .ok_or_else(|| RemoteError::new("MissingLensArn", "ImportLens returned no LensArn"))
    }

    fn tag_resource(&self, arn: &str, tags: &BTreeMap<String, String>) -> Result<(), RemoteError> {
        let tags: HashMap<String, String> = tags
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        block_on(async {
            self.client
                .tag_resource()
                .workload_arn(arn)
                .set_tags(Some(tags))
                .send()
                .await
                .map(|_| ())
                .map_err(|error| sdk_error(&error))
        })
    }

    fn create_lens_version(
        &self,
        lens_alias: &str,
        version: &str,
        is_major_version: bool,
    ) -> Result<(), RemoteError> {
        block_on(async {
            self.client
                .create_lens_version()
                .lens_alias(lens_alias)
                .lens_version(version)
                .is_major_version(is_major_version)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| sdk_error(&error))
        })
    }

    fn delete_lens(&self, lens_alias: &str, status: LensStatus) -> Result<(), RemoteError> {
        block_on(async {
            self.client
                .delete_lens()
                .lens_alias(lens_alias)
                .lens_status(status_type(status))
                .send()
                .await
                .map(|_| ())
                .map_err(|error| sdk_error(&error))
        })
    }
}
