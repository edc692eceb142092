use crate::codec::null_as_default;
use crate::validation::{field, require, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Spawn `path` with `args` in `dir` as `user`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RunAction {
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub args: Vec<String>,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub dir: String,
    /// Ordered: later entries override earlier ones with the same name.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub env: Vec<EnvironmentVariable>,
    #[serde(deserialize_with = "null_as_default")]
    pub user: String,
    /// Always encoded, `{}` when no limit is set.
    #[serde(deserialize_with = "null_as_default")]
    pub resource_limits: ResourceLimits,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct EnvironmentVariable {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}

impl EnvironmentVariable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Process limits the agent applies to a run. Unset limits are left to the agent.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ResourceLimits {
    /// Max open file descriptors (RLIMIT_NOFILE).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nofile: Option<u64>,
    /// Max processes for the user (RLIMIT_NPROC).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nproc: Option<u64>,
}

impl ResourceLimits {
    pub fn is_empty(&self) -> bool {
        self.nofile.is_none() && self.nproc.is_none()
    }
}

impl RunAction {
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = dir.into();
        self
    }
    pub fn with_env(mut self, env: Vec<EnvironmentVariable>) -> Self {
        self.env = env;
        self
    }
    pub fn with_resource_limits(mut self, resource_limits: ResourceLimits) -> Self {
        self.resource_limits = resource_limits;
        self
    }
}

impl Validator for RunAction {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.path, field::PATH)?;
        require(&self.user, field::USER)
    }
}
