use serde::de::Error as _;
use serde_json::{Map, Value};

pub const LENS_FILE_NAME: &str = "lens.json";
pub const DEFAULT_LENS_VERSION: &str = "1.0";

const NAME_FIELD: &str = "name";
const VERSION_FIELD: &str = "_version";

/// A custom lens document as stored in the source repository.
///
/// The parsed object is kept as-is, in source key order, and forwarded to the
/// catalog unchanged. Only `name` and `_version` are read from it.
#[derive(Debug, Clone, PartialEq)]
pub struct LensDocument {
    fields: Map<String, Value>,
}

impl LensDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let fields: Map<String, Value> = serde_json::from_slice(bytes)?;

        if !matches!(fields.get(NAME_FIELD), Some(Value::String(_))) {
            return Err(serde_json::Error::custom("lens `name` must be a string"));
        }
        if !matches!(
            fields.get(VERSION_FIELD),
            None | Some(Value::Null) | Some(Value::String(_))
        ) {
            return Err(serde_json::Error::custom("lens `_version` must be a string"));
        }

        Ok(Self { fields })
    }

    pub fn name(&self) -> &str {
        self.fields
            .get(NAME_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// `_version`, or [`DEFAULT_LENS_VERSION`] when it is missing or null.
    pub fn version(&self) -> &str {
        self.fields
            .get(VERSION_FIELD)
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_LENS_VERSION)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.fields)
    }
}

pub fn normalize_lens_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

pub fn lens_alias_arn(region: &str, account_id: &str, normalized_name: &str) -> String {
    format!("arn:aws:wellarchitected:{region}:{account_id}:lens/{normalized_name}")
}
