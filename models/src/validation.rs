use crate::action::Action;
use std::borrow::Cow;
use thiserror::Error;

/// Field tokens reported by [`ValidationError::InvalidField`].
pub mod field {
    pub const FROM: &str = "from";
    pub const TO: &str = "to";
    pub const USER: &str = "user";
    pub const PATH: &str = "path";
    pub const TIMEOUT: &str = "timeout";
    pub const ACTION: &str = "action";
    pub const ACTIONS: &str = "actions";
}

/// The first offending field of an action tree.
///
/// Only one error is reported per `validate()` call: fix it and validate
/// again to find the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid field: {0}")]
    InvalidField(&'static str),
    /// An absent member of a composite action's list.
    #[error("Invalid field: action at index {0}")]
    AbsentActionAt(usize),
}

impl ValidationError {
    /// The offending field token, e.g. `user` or `action at index 2`.
    pub fn field(&self) -> Cow<'static, str> {
        match self {
            ValidationError::InvalidField(name) => Cow::Borrowed(*name),
            ValidationError::AbsentActionAt(index) => {
                Cow::Owned(format!("action at index {}", index))
            }
        }
    }
}

pub trait Validator {
    fn validate(&self) -> Result<(), ValidationError>;
}

pub(crate) fn require(value: &str, name: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::InvalidField(name))
    } else {
        Ok(())
    }
}

/// Decorator slot: must hold an action, and that action must be valid.
pub(crate) fn validate_nested(action: Option<&Action>) -> Result<(), ValidationError> {
    action
        .ok_or(ValidationError::InvalidField(field::ACTION))?
        .validate()
}

/// Composite list: non-empty, no absent member, every member valid.
/// A member's own error is returned as is; only absence carries the index.
pub(crate) fn validate_members(actions: Option<&[Option<Action>]>) -> Result<(), ValidationError> {
    let actions = match actions {
        Some(actions) if !actions.is_empty() => actions,
        _ => return Err(ValidationError::InvalidField(field::ACTIONS)),
    };
    for (index, action) in actions.iter().enumerate() {
        action
            .as_ref()
            .ok_or(ValidationError::AbsentActionAt(index))?
            .validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::upload::UploadAction;

    #[test]
    fn test_error_field_tokens() {
        assert_eq!(ValidationError::InvalidField(field::USER).field(), "user");
        assert_eq!(
            ValidationError::AbsentActionAt(3).field(),
            "action at index 3"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ValidationError::InvalidField(field::FROM).to_string(),
            "Invalid field: from"
        );
        assert_eq!(
            ValidationError::AbsentActionAt(0).to_string(),
            "Invalid field: action at index 0"
        );
    }

    #[test]
    fn test_require() {
        assert!(require("x", field::PATH).is_ok());
        assert_eq!(
            require("", field::PATH),
            Err(ValidationError::InvalidField(field::PATH))
        );
    }

    #[test]
    fn test_validate_members_reports_first_problem_in_order() {
        let invalid: Action = UploadAction {
            to: "web_location".to_string(),
            ..Default::default()
        }
        .into();
        let members = vec![Some(invalid), None];
        assert_eq!(
            validate_members(Some(members.as_slice())),
            Err(ValidationError::InvalidField(field::FROM))
        );

        let members = vec![None, Some(Action::from(UploadAction::default()))];
        assert_eq!(
            validate_members(Some(members.as_slice())),
            Err(ValidationError::AbsentActionAt(0))
        );
    }

    #[test]
    fn test_validate_members_empty() {
        assert_eq!(
            validate_members(None),
            Err(ValidationError::InvalidField(field::ACTIONS))
        );
        assert_eq!(
            validate_members(Some(&[][..])),
            Err(ValidationError::InvalidField(field::ACTIONS))
        );
    }

    #[test]
    fn test_validate_nested_absent() {
        assert_eq!(
            validate_nested(None),
            Err(ValidationError::InvalidField(field::ACTION))
        );
    }
}
