use crate::document::LENS_FILE_NAME;
use crate::error::ConfigError;

pub const REGION_ENV: &str = "AWS_REGION";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    pub region: String,
    pub file_path: String,
}

impl PublisherConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let region = lookup(REGION_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing(REGION_ENV))?;

        Ok(Self {
            region,
            file_path: LENS_FILE_NAME.to_string(),
        })
    }
}
