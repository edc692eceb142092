pub mod composite;
pub mod download;
pub mod emit_progress;
pub mod run;
pub mod timeout;
pub mod try_;
pub mod upload;

use crate::validation::{ValidationError, Validator};
use composite::{CodependentAction, ParallelAction, SerialAction};
use download::DownloadAction;
use emit_progress::EmitProgressAction;
use run::RunAction;
use serde::{de::DeserializeOwned, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};
use timeout::TimeoutAction;
use try_::TryAction;
use upload::UploadAction;

/// Wire tag of an action variant. These strings never change.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ActionType {
    Download,
    Upload,
    Run,
    Timeout,
    Try,
    EmitProgress,
    Parallel,
    Serial,
    Codependent,
}

/// A node of an action tree.
///
/// Leaves (`Download`, `Upload`, `Run`) describe work; decorators
/// (`Timeout`, `Try`, `EmitProgress`) wrap one action; composites
/// (`Parallel`, `Serial`, `Codependent`) hold an ordered list. How the
/// tree is executed is up to the agent consuming it.
///
/// Encoded as `{"<tag>": <payload>}`, see [`crate::codec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Download(DownloadAction),
    Upload(UploadAction),
    Run(RunAction),
    Timeout(TimeoutAction),
    Try(TryAction),
    EmitProgress(EmitProgressAction),
    Parallel(ParallelAction),
    Serial(SerialAction),
    Codependent(CodependentAction),
}

/// Implemented by each concrete payload type.
pub trait ActionVariant: Validator + Serialize + DeserializeOwned + Into<Action> {
    const ACTION_TYPE: ActionType;

    fn action_type(&self) -> ActionType {
        Self::ACTION_TYPE
    }
}

macro_rules! action_variant {
    ($variant:ident, $payload:ty) => {
        impl ActionVariant for $payload {
            const ACTION_TYPE: ActionType = ActionType::$variant;
        }
        impl From<$payload> for Action {
            fn from(value: $payload) -> Self {
                Action::$variant(value)
            }
        }
    };
}

action_variant!(Download, DownloadAction);
action_variant!(Upload, UploadAction);
action_variant!(Run, RunAction);
action_variant!(Timeout, TimeoutAction);
action_variant!(Try, TryAction);
action_variant!(EmitProgress, EmitProgressAction);
action_variant!(Parallel, ParallelAction);
action_variant!(Serial, SerialAction);
action_variant!(Codependent, CodependentAction);

impl Action {
    pub fn action_type(&self) -> ActionType {
        match self {
            Action::Download(_) => ActionType::Download,
            Action::Upload(_) => ActionType::Upload,
            Action::Run(_) => ActionType::Run,
            Action::Timeout(_) => ActionType::Timeout,
            Action::Try(_) => ActionType::Try,
            Action::EmitProgress(_) => ActionType::EmitProgress,
            Action::Parallel(_) => ActionType::Parallel,
            Action::Serial(_) => ActionType::Serial,
            Action::Codependent(_) => ActionType::Codependent,
        }
    }

    /// Directly nested actions that are present, in order.
    pub fn children(&self) -> Vec<&Action> {
        match self {
            Action::Download(_) | Action::Upload(_) | Action::Run(_) => vec![],
            Action::Timeout(a) => a.action.as_deref().into_iter().collect(),
            Action::Try(a) => a.action.as_deref().into_iter().collect(),
            Action::EmitProgress(a) => a.action.as_deref().into_iter().collect(),
            Action::Parallel(a) => a.slots().iter().flatten().collect(),
            Action::Serial(a) => a.slots().iter().flatten().collect(),
            Action::Codependent(a) => a.slots().iter().flatten().collect(),
        }
    }

    /// Number of action levels in the tree; a leaf is 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((action, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            pending.extend(action.children().into_iter().map(|c| (c, depth + 1)));
        }
        deepest
    }

    /// Visit this action and every present descendant, pre-order.
    pub fn walk<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Action),
    {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }
}

impl Validator for Action {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Action::Download(a) => a.validate(),
            Action::Upload(a) => a.validate(),
            Action::Run(a) => a.validate(),
            Action::Timeout(a) => a.validate(),
            Action::Try(a) => a.validate(),
            Action::EmitProgress(a) => a.validate(),
            Action::Parallel(a) => a.validate(),
            Action::Serial(a) => a.validate(),
            Action::Codependent(a) => a.validate(),
        }
    }
}
