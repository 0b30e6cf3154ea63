// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parameter schemas and the validation contract.
//!
//! Each step type declares its parameters as data: a set of named fields,
//! each required or optional, with an expected primitive kind. Validation
//! of a `(step type, params)` pair runs four checks in order:
//!
//! 1. the params object must be present (not null);
//! 2. every key must appear in the schema — unknown keys are rejected,
//!    which catches typos like `verison` before any server sees the step;
//! 3. every required field must be present and non-zero (empty string,
//!    zero number, empty list all count as missing);
//! 4. the values must parse into the handler's typed params struct.
//!
//! The same schema table backs the coordinator's upfront batch validation
//! and the per-handler parse at execute time.

use ripple_core::StepDefinition;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::handlers::echo::EchoParams;
use crate::handlers::file_write::FileWriteParams;
use crate::handlers::script::ScriptParams;
use crate::handlers::sleep::SleepParams;
use crate::handlers::yum_upgrade::YumUpgradeParams;

/// Reserved key injected into every step's params by the activity layer.
/// Accepted by all schemas so injection never trips the unknown-key check.
pub const SERVER_ID_PARAM: &str = "server_id";

/// Primitive kinds a parameter value can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Bool,
    StringList,
}

/// One parameter in a step schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: ParamKind) -> Self {
        Self { name, kind, required: true }
    }

    pub const fn optional(name: &'static str, kind: ParamKind) -> Self {
        Self { name, kind, required: false }
    }
}

/// Validation failure for a single params object.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("parameters cannot be nil")]
    Nil,
    #[error("unsupported parameters: {}", keys.join(", "))]
    Unsupported { keys: Vec<String> },
    #[error("missing required parameter: {0}")]
    MissingRequired(&'static str),
    #[error("failed to parse parameters: {0}")]
    TypeMismatch(String),
}

/// Validation failure for a step or an ordered step list.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unknown step type: {0}")]
    UnknownStepType(String),
    #[error("validation failed for step '{name}' (type: {step_type}): {source}")]
    InvalidParams {
        name: String,
        step_type: String,
        source: ParamError,
    },
    #[error("step {index}: {source}")]
    Step {
        /// 1-based position in the request's step list.
        index: usize,
        source: Box<ValidationError>,
    },
}

/// Schema for one step type.
pub struct StepSchema {
    pub step_type: &'static str,
    pub fields: &'static [FieldSpec],
    /// Typed parse used as the final check; the generic machinery lives
    /// in [`typed_check`] so the table stays plain data.
    check: fn(&Map<String, Value>) -> Result<(), ParamError>,
}

impl StepSchema {
    /// Run the full validation contract against a raw params object.
    pub fn validate(&self, params: Option<&Map<String, Value>>) -> Result<(), ParamError> {
        let map = params.ok_or(ParamError::Nil)?;
        self.check_keys(map)?;
        self.check_required(map)?;
        (self.check)(map)
    }

    /// Validate and parse into the handler's typed params struct.
    pub fn parse<T: DeserializeOwned>(&self, params: &Map<String, Value>) -> Result<T, ParamError> {
        self.check_keys(params)?;
        self.check_required(params)?;
        from_map(params)
    }

    fn check_keys(&self, params: &Map<String, Value>) -> Result<(), ParamError> {
        let keys: Vec<String> = params
            .keys()
            .filter(|key| {
                key.as_str() != SERVER_ID_PARAM
                    && !self.fields.iter().any(|f| f.name == key.as_str())
            })
            .cloned()
            .collect();
        if keys.is_empty() {
            Ok(())
        } else {
            Err(ParamError::Unsupported { keys })
        }
    }

    fn check_required(&self, params: &Map<String, Value>) -> Result<(), ParamError> {
        for field in self.fields.iter().filter(|f| f.required) {
            let missing = match params.get(field.name) {
                None => true,
                Some(value) => is_zero(field.kind, value),
            };
            if missing {
                return Err(ParamError::MissingRequired(field.name));
            }
        }
        Ok(())
    }
}

/// Whether a value counts as the zero value for its expected kind.
/// Values of the wrong type are left for the typed parse to reject.
fn is_zero(kind: ParamKind, value: &Value) -> bool {
    match value {
        Value::Null => true,
        _ => match kind {
            ParamKind::String => value.as_str().is_some_and(|s| s.is_empty()),
            ParamKind::Number => value.as_f64().is_some_and(|n| n == 0.0),
            ParamKind::Bool => value.as_bool().is_some_and(|b| !b),
            ParamKind::StringList => value.as_array().is_some_and(|a| a.is_empty()),
        },
    }
}

fn from_map<T: DeserializeOwned>(params: &Map<String, Value>) -> Result<T, ParamError> {
    serde_json::from_value(Value::Object(params.clone()))
        .map_err(|err| ParamError::TypeMismatch(err.to_string()))
}

fn typed_check<T: DeserializeOwned>(params: &Map<String, Value>) -> Result<(), ParamError> {
    from_map::<T>(params).map(|_| ())
}

pub static ECHO_SCHEMA: StepSchema = StepSchema {
    step_type: crate::handlers::ECHO,
    fields: &[FieldSpec::required("message", ParamKind::String)],
    check: typed_check::<EchoParams>,
};

pub static SLEEP_SCHEMA: StepSchema = StepSchema {
    step_type: crate::handlers::SLEEP,
    fields: &[FieldSpec::required("duration", ParamKind::Number)],
    check: typed_check::<SleepParams>,
};

pub static FILE_WRITE_SCHEMA: StepSchema = StepSchema {
    step_type: crate::handlers::FILE_WRITE,
    fields: &[
        FieldSpec::required("path", ParamKind::String),
        FieldSpec::required("content", ParamKind::String),
    ],
    check: typed_check::<FileWriteParams>,
};

pub static SCRIPT_SCHEMA: StepSchema = StepSchema {
    step_type: crate::handlers::SCRIPT,
    fields: &[
        FieldSpec::required("script", ParamKind::String),
        FieldSpec::optional("args", ParamKind::StringList),
        FieldSpec::optional("rollback_script", ParamKind::String),
    ],
    check: typed_check::<ScriptParams>,
};

pub static YUM_UPGRADE_SCHEMA: StepSchema = StepSchema {
    step_type: crate::handlers::YUM_UPGRADE,
    fields: &[
        FieldSpec::required("package", ParamKind::String),
        FieldSpec::required("version", ParamKind::String),
    ],
    check: typed_check::<YumUpgradeParams>,
};

static SCHEMAS: &[&StepSchema] = &[
    &ECHO_SCHEMA,
    &SLEEP_SCHEMA,
    &FILE_WRITE_SCHEMA,
    &SCRIPT_SCHEMA,
    &YUM_UPGRADE_SCHEMA,
];

/// Look up the schema for a step type.
pub fn schema_for(step_type: &str) -> Option<&'static StepSchema> {
    SCHEMAS.iter().copied().find(|s| s.step_type == step_type)
}

/// Validate a single step's params against its type's schema.
pub fn validate_step(step: &StepDefinition) -> Result<(), ValidationError> {
    let schema = schema_for(&step.step_type)
        .ok_or_else(|| ValidationError::UnknownStepType(step.step_type.clone()))?;
    schema
        .validate(step.params.as_ref())
        .map_err(|source| ValidationError::InvalidParams {
            name: step.name.clone(),
            step_type: step.step_type.clone(),
            source,
        })
}

/// Validate an ordered step list, returning the first failure prefixed
/// with the 1-based step index.
pub fn validate_steps(steps: &[StepDefinition]) -> Result<(), ValidationError> {
    for (i, step) in steps.iter().enumerate() {
        validate_step(step)
            .map_err(|source| ValidationError::Step { index: i + 1, source: Box::new(source) })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
