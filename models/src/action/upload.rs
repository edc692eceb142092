use crate::codec::null_as_default;
use crate::validation::{field, require, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Send the local path `from` to the URI `to`, reading as `user`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UploadAction {
    #[serde(deserialize_with = "null_as_default")]
    pub artifact: String,
    #[serde(deserialize_with = "null_as_default")]
    pub from: String,
    #[serde(deserialize_with = "null_as_default")]
    pub to: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user: String,
}

impl UploadAction {
    pub fn with_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.artifact = artifact.into();
        self
    }
}

impl Validator for UploadAction {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.from, field::FROM)?;
        require(&self.to, field::TO)?;
        require(&self.user, field::USER)
    }
}
