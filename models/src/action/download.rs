use crate::codec::null_as_default;
use crate::validation::{field, require, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Fetch `from` (a URI) into `to` on the container, as `user`.
/// `cache_key` lets the agent reuse a previously fetched copy.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DownloadAction {
    /// Display name of the artifact for progress output.
    #[serde(deserialize_with = "null_as_default")]
    pub artifact: String,
    #[serde(deserialize_with = "null_as_default")]
    pub from: String,
    #[serde(deserialize_with = "null_as_default")]
    pub to: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cache_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user: String,
}

impl DownloadAction {
    pub fn with_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.artifact = artifact.into();
        self
    }
    pub fn with_cache_key(mut self, cache_key: impl Into<String>) -> Self {
        self.cache_key = cache_key.into();
        self
    }
}

impl Validator for DownloadAction {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.from, field::FROM)?;
        require(&self.to, field::TO)?;
        require(&self.user, field::USER)
    }
}
