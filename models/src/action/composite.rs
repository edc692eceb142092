//! Actions holding an ordered list of members.
//!
//! The list itself may be absent (`null` on the wire) and so may each
//! member. Absent members keep their slot so errors can point at an index.

use crate::action::Action;
use crate::validation::{validate_members, ValidationError, Validator};
use serde::{Deserialize, Serialize};

macro_rules! composite_action {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
        #[serde(default)]
        pub struct $name {
            /// `None` encodes as `null`, `Some(vec![])` as `[]`.
            pub actions: Option<Vec<Option<Action>>>,
        }

        impl $name {
            /// Member slots; empty when the list is absent.
            pub fn slots(&self) -> &[Option<Action>] {
                self.actions.as_deref().unwrap_or_default()
            }
        }

        impl Validator for $name {
            fn validate(&self) -> Result<(), ValidationError> {
                validate_members(self.actions.as_deref())
            }
        }
    };
}

composite_action!(
    /// Members run concurrently; the action fails if any member fails.
    ParallelAction
);
composite_action!(
    /// Members run one at a time in order; the first failure stops the rest.
    SerialAction
);
composite_action!(
    /// Members run concurrently and share a fate: when any member
    /// finishes, successfully or not, the others are stopped.
    CodependentAction
);
