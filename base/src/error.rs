use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionSpecError {
    /// The wrapped document's key names no registered action variant.
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("InvalidEnvelope({0})")]
    InvalidEnvelope(String),
    /// The tree or document nests deeper than the codec accepts.
    #[error("DepthLimitExceeded({0})")]
    DepthLimitExceeded(String),
    #[error("serde_json error({0:?})")]
    SerdeJsonError(serde_json::error::Error),
    #[error("ConfigError({0})")]
    ConfigError(String),
    #[error("BlobStoreUnauthorized({0})")]
    BlobStoreUnauthorized(String),
    #[error("ReqwestError({0:?})")]
    ReqwestError(reqwest::Error),
    #[error("OtherError({0})")]
    OtherError(String),
}

impl ActionSpecError {
    /// Returns true if the error came from decoding a document
    /// (unknown tag, bad envelope, too deep or malformed payload).
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            ActionSpecError::UnknownAction(_)
                | ActionSpecError::InvalidEnvelope(_)
                | ActionSpecError::DepthLimitExceeded(_)
                | ActionSpecError::SerdeJsonError(_)
        )
    }
}

impl From<serde_json::Error> for ActionSpecError {
    fn from(e: serde_json::Error) -> Self {
        ActionSpecError::SerdeJsonError(e)
    }
}
impl From<reqwest::Error> for ActionSpecError {
    fn from(e: reqwest::Error) -> Self {
        ActionSpecError::ReqwestError(e)
    }
}
impl From<envy::Error> for ActionSpecError {
    fn from(e: envy::Error) -> Self {
        ActionSpecError::ConfigError(e.to_string())
    }
}
