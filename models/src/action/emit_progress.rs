use crate::action::Action;
use crate::codec::null_as_default;
use crate::validation::{validate_nested, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Report progress around the nested action: `start_message` before it runs,
/// `success_message` when it succeeds, `failure_message_prefix` plus the
/// error when it fails. Empty messages are not emitted.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct EmitProgressAction {
    #[serde(deserialize_with = "null_as_default")]
    pub start_message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub success_message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub failure_message_prefix: String,
    pub action: Option<Box<Action>>,
}

impl Validator for EmitProgressAction {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_nested(self.action.as_deref())
    }
}
