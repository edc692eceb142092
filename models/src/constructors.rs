//! Shorthands for assembling action trees.
//!
//! Nothing here validates: build the tree, then call `validate()` on it.

use crate::action::{
    composite::{CodependentAction, ParallelAction, SerialAction},
    download::DownloadAction,
    emit_progress::EmitProgressAction,
    run::RunAction,
    timeout::TimeoutAction,
    try_::TryAction,
    upload::UploadAction,
    Action,
};
use std::time::Duration;

pub fn download(
    from: impl Into<String>,
    to: impl Into<String>,
    user: impl Into<String>,
) -> DownloadAction {
    DownloadAction {
        from: from.into(),
        to: to.into(),
        user: user.into(),
        ..Default::default()
    }
}

pub fn upload(
    from: impl Into<String>,
    to: impl Into<String>,
    user: impl Into<String>,
) -> UploadAction {
    UploadAction {
        from: from.into(),
        to: to.into(),
        user: user.into(),
        ..Default::default()
    }
}

pub fn run(path: impl Into<String>, user: impl Into<String>) -> RunAction {
    RunAction {
        path: path.into(),
        user: user.into(),
        ..Default::default()
    }
}

pub fn timeout(action: Option<Action>, timeout: Duration) -> TimeoutAction {
    TimeoutAction {
        action: action.map(Box::new),
        timeout,
    }
}

pub fn try_(action: Option<Action>) -> TryAction {
    TryAction {
        action: action.map(Box::new),
    }
}

pub fn emit_progress_for(
    action: Option<Action>,
    start_message: impl Into<String>,
    success_message: impl Into<String>,
    failure_message_prefix: impl Into<String>,
) -> EmitProgressAction {
    EmitProgressAction {
        start_message: start_message.into(),
        success_message: success_message.into(),
        failure_message_prefix: failure_message_prefix.into(),
        action: action.map(Box::new),
    }
}

fn members(actions: impl IntoIterator<Item = Action>) -> Option<Vec<Option<Action>>> {
    Some(actions.into_iter().map(Some).collect())
}

pub fn parallel(actions: impl IntoIterator<Item = Action>) -> ParallelAction {
    ParallelAction {
        actions: members(actions),
    }
}

pub fn serial(actions: impl IntoIterator<Item = Action>) -> SerialAction {
    SerialAction {
        actions: members(actions),
    }
}

pub fn codependent(actions: impl IntoIterator<Item = Action>) -> CodependentAction {
    CodependentAction {
        actions: members(actions),
    }
}
