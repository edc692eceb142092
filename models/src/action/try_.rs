use crate::action::Action;
use crate::validation::{validate_nested, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Run the nested action and ignore its failure.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TryAction {
    pub action: Option<Box<Action>>,
}

impl Validator for TryAction {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_nested(self.action.as_deref())
    }
}
