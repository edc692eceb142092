use crate::action::Action;
use crate::validation::{field, validate_nested, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bound the nested action's run time. Encoded in nanoseconds.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutAction {
    pub action: Option<Box<Action>>,
    #[serde(with = "crate::codec::duration_nanos")]
    pub timeout: Duration,
}

impl Validator for TimeoutAction {
    fn validate(&self) -> Result<(), ValidationError> {
        // the nested action is checked before the duration
        validate_nested(self.action.as_deref())?;
        if self.timeout.is_zero() {
            return Err(ValidationError::InvalidField(field::TIMEOUT));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::upload::UploadAction;

    fn upload() -> UploadAction {
        UploadAction {
            from: "local_location".to_string(),
            to: "web_location".to_string(),
            user: "someone".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid() {
        let action = TimeoutAction {
            action: Some(Box::new(upload().into())),
            timeout: Duration::from_secs(1),
        };
        assert_eq!(action.validate(), Ok(()));
    }

    #[test]
    fn test_invalid_cases() {
        let cases = [
            (
                "action",
                TimeoutAction {
                    action: None,
                    timeout: Duration::from_secs(1),
                },
            ),
            (
                "from",
                TimeoutAction {
                    action: Some(Box::new(
                        UploadAction {
                            to: "web_location".to_string(),
                            ..Default::default()
                        }
                        .into(),
                    )),
                    timeout: Duration::from_secs(1),
                },
            ),
            (
                "timeout",
                TimeoutAction {
                    action: Some(Box::new(upload().into())),
                    timeout: Duration::ZERO,
                },
            ),
            // absent action wins over zero timeout
            ("action", TimeoutAction::default()),
        ];
        for (expected, action) in cases {
            assert_eq!(action.validate().unwrap_err().field(), expected);
        }
    }
}
