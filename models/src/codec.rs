//! Tagged wire codec for [`Action`].
//!
//! An action is encoded as a single-key object `{"<tag>": <payload>}`.
//! Action-typed fields nested in other actions use the same shape (or
//! `null` when absent), so decoding recurses through the registry at
//! every level.
//!
//! Trees deeper than [`MAX_ACTION_DEPTH`] are rejected by both the
//! encoding and the decoding entry points.

use crate::action::{
    composite::{CodependentAction, ParallelAction, SerialAction},
    download::DownloadAction,
    emit_progress::EmitProgressAction,
    run::RunAction,
    timeout::TimeoutAction,
    try_::TryAction,
    upload::UploadAction,
    Action, ActionType, ActionVariant,
};
use actionspec_base::error::ActionSpecError;
use once_cell::sync::Lazy;
use serde::{
    de::{DeserializeOwned, Deserializer, Error as _},
    ser::{SerializeMap, Serializer},
    Deserialize, Serialize,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// Deepest action tree the codec encodes or decodes.
pub const MAX_ACTION_DEPTH: usize = 100;

// composites take three containers per level ({tag, {payload, [actions),
// a run leaf takes four ({tag, {payload, [env, {var)
const MAX_DOCUMENT_DEPTH: usize = 3 * MAX_ACTION_DEPTH + 1;

type DecodeFn = fn(Value) -> Result<Action, serde_json::Error>;

fn decode_variant<T: ActionVariant>(payload: Value) -> Result<Action, serde_json::Error> {
    serde_json::from_value::<T>(payload).map(Into::into)
}

fn decoder_for(action_type: ActionType) -> DecodeFn {
    match action_type {
        ActionType::Download => decode_variant::<DownloadAction>,
        ActionType::Upload => decode_variant::<UploadAction>,
        ActionType::Run => decode_variant::<RunAction>,
        ActionType::Timeout => decode_variant::<TimeoutAction>,
        ActionType::Try => decode_variant::<TryAction>,
        ActionType::EmitProgress => decode_variant::<EmitProgressAction>,
        ActionType::Parallel => decode_variant::<ParallelAction>,
        ActionType::Serial => decode_variant::<SerialAction>,
        ActionType::Codependent => decode_variant::<CodependentAction>,
    }
}

// tag -> payload decoder, built once and never modified
static ACTION_REGISTRY: Lazy<HashMap<&'static str, DecodeFn>> = Lazy::new(|| {
    ActionType::iter()
        .map(|action_type| (<&'static str>::from(action_type), decoder_for(action_type)))
        .collect()
});

/// Tags the codec can decode.
pub fn registered_tags() -> Vec<&'static str> {
    let mut tags: Vec<&'static str> = ACTION_REGISTRY.keys().copied().collect();
    tags.sort_unstable();
    tags
}

fn decode_wrapped(wrapped: Map<String, Value>) -> Result<Action, ActionSpecError> {
    if wrapped.len() != 1 {
        tracing::warn!("rejected action envelope with {} keys", wrapped.len());
        return Err(ActionSpecError::InvalidEnvelope(format!(
            "expected exactly one action tag, found {}",
            wrapped.len()
        )));
    }
    let (tag, payload) = wrapped.into_iter().next().ok_or_else(|| {
        ActionSpecError::InvalidEnvelope("expected exactly one action tag, found 0".to_string())
    })?;
    let decode = ACTION_REGISTRY.get(tag.as_str()).ok_or_else(|| {
        tracing::warn!("unknown action tag: {}", tag);
        ActionSpecError::UnknownAction(tag.clone())
    })?;
    tracing::debug!("decoding action: {}", tag);
    // a null payload decodes to the zero-valued variant
    let payload = match payload {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    decode(payload).map_err(ActionSpecError::from)
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let tag: &'static str = self.action_type().into();
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Action::Download(a) => map.serialize_entry(tag, a)?,
            Action::Upload(a) => map.serialize_entry(tag, a)?,
            Action::Run(a) => map.serialize_entry(tag, a)?,
            Action::Timeout(a) => map.serialize_entry(tag, a)?,
            Action::Try(a) => map.serialize_entry(tag, a)?,
            Action::EmitProgress(a) => map.serialize_entry(tag, a)?,
            Action::Parallel(a) => map.serialize_entry(tag, a)?,
            Action::Serial(a) => map.serialize_entry(tag, a)?,
            Action::Codependent(a) => map.serialize_entry(tag, a)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wrapped = Map::<String, Value>::deserialize(deserializer)?;
        decode_wrapped(wrapped).map_err(|e| match e {
            ActionSpecError::SerdeJsonError(e) => D::Error::custom(e),
            other => D::Error::custom(other),
        })
    }
}

fn check_depth(action: &Action) -> Result<(), ActionSpecError> {
    let depth = action.depth();
    if depth > MAX_ACTION_DEPTH {
        tracing::warn!("rejected action tree of depth {}", depth);
        return Err(ActionSpecError::DepthLimitExceeded(format!(
            "action tree depth {} exceeds {}",
            depth, MAX_ACTION_DEPTH
        )));
    }
    Ok(())
}

// deepest object/array nesting, brackets inside strings excluded
fn nesting_depth(data: &[u8]) -> usize {
    let (mut depth, mut deepest) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for &b in data {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

// serde_json's own recursion limit is lifted so that every tree within
// MAX_ACTION_DEPTH parses; the byte scan bounds the stack instead
fn parse_document<T: DeserializeOwned>(data: &[u8]) -> Result<T, ActionSpecError> {
    let depth = nesting_depth(data);
    if depth > MAX_DOCUMENT_DEPTH {
        tracing::warn!("rejected document nested {} levels deep", depth);
        return Err(ActionSpecError::DepthLimitExceeded(format!(
            "document nesting {} exceeds {}",
            depth, MAX_DOCUMENT_DEPTH
        )));
    }
    let mut de = serde_json::Deserializer::from_slice(data);
    de.disable_recursion_limit();
    let parsed = T::deserialize(&mut de)?;
    de.end()?;
    Ok(parsed)
}

fn decode_checked(wrapped: Map<String, Value>) -> Result<Action, ActionSpecError> {
    let action = decode_wrapped(wrapped)?;
    check_depth(&action)?;
    Ok(action)
}

/// Encode an action document: `{"<tag>": <payload>}`.
pub fn marshal_action(action: &Action) -> Result<Vec<u8>, ActionSpecError> {
    check_depth(action)?;
    serde_json::to_vec(action).map_err(ActionSpecError::from)
}

/// Encode an action slot; an absent action encodes as `null`.
pub fn marshal_optional_action(action: Option<&Action>) -> Result<Vec<u8>, ActionSpecError> {
    if let Some(action) = action {
        check_depth(action)?;
    }
    serde_json::to_vec(&action).map_err(ActionSpecError::from)
}

/// Decode an action document.
///
/// Fails with [`ActionSpecError::UnknownAction`] when the tag is not
/// registered, [`ActionSpecError::InvalidEnvelope`] when the object does not
/// hold exactly one tag, [`ActionSpecError::DepthLimitExceeded`] when the
/// tree is deeper than [`MAX_ACTION_DEPTH`], and
/// [`ActionSpecError::SerdeJsonError`] when the bytes or the payload do not
/// match the expected shape.
pub fn unmarshal_action(data: &[u8]) -> Result<Action, ActionSpecError> {
    let wrapped: Map<String, Value> = parse_document(data)?;
    decode_checked(wrapped)
}

/// Decode an action slot; `null` decodes to `None`.
pub fn unmarshal_optional_action(data: &[u8]) -> Result<Option<Action>, ActionSpecError> {
    let wrapped: Option<Map<String, Value>> = parse_document(data)?;
    wrapped.map(decode_checked).transpose()
}

pub fn action_to_value(action: &Action) -> Result<Value, ActionSpecError> {
    check_depth(action)?;
    serde_json::to_value(action).map_err(ActionSpecError::from)
}

pub fn action_from_value(value: Value) -> Result<Action, ActionSpecError> {
    match value {
        Value::Object(wrapped) => decode_checked(wrapped),
        other => Err(ActionSpecError::InvalidEnvelope(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

/// `null` is accepted wherever a plain value has a default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// `Duration` as signed integer nanoseconds.
pub(crate) mod duration_nanos {
    use serde::{
        de::{self, Deserializer},
        ser::{self, Serializer},
        Deserialize,
    };
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos = i64::try_from(duration.as_nanos()).map_err(|_| {
            <S::Error as ser::Error>::custom(format!(
                "duration {:?} overflows i64 nanoseconds",
                duration
            ))
        })?;
        serializer.serialize_i64(nanos)
    }

    // null decodes to zero, negative values are malformed
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = Option::<i64>::deserialize(deserializer)?.unwrap_or(0);
        u64::try_from(nanos)
            .map(Duration::from_nanos)
            .map_err(|_| {
                <D::Error as de::Error>::custom(format!(
                    "negative timeout: {} nanoseconds",
                    nanos
                ))
            })
    }
}
