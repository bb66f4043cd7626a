//! Error kinds surfaced while turning a package description into a spec file.
//!
//! Every variant is fatal: validation runs to the first failure and nothing
//! is written to disk afterwards.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("unsupported language {0:?}: only python packages are supported")]
    UnsupportedLanguage(String),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType { field: String, expected: &'static str },

    #[error("unrecognized value {value:?} for `{field}`")]
    UnrecognizedValue {
        field: &'static str,
        value: String,
    },

    #[error("malformed input: {0}")]
    MalformedInput(#[from] serde_yaml::Error),
}
