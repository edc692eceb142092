//! Action tree model for the execution agent: variants, validation,
//! and the tagged wire codec (`{"<tag>": <payload>}`).

pub mod action;
pub mod blob_store;
pub mod codec;
pub mod constructors;
pub mod validation;

pub use action::{
    composite::{CodependentAction, ParallelAction, SerialAction},
    download::DownloadAction,
    emit_progress::EmitProgressAction,
    run::{EnvironmentVariable, ResourceLimits, RunAction},
    timeout::TimeoutAction,
    try_::TryAction,
    upload::UploadAction,
    Action, ActionType, ActionVariant,
};
pub use codec::{
    action_from_value, action_to_value, marshal_action, marshal_optional_action,
    unmarshal_action, unmarshal_optional_action, MAX_ACTION_DEPTH,
};
pub use validation::{ValidationError, Validator};
