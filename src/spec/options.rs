//! Closed option types for the enumerated fields of the package description.
//!
//! `python-setup` and `python-check` accept a fixed vocabulary; anything
//! else is rejected up front rather than silently dropped during rendering.

use crate::error::SpecError;
use std::fmt;

/// Build system declared by `python-setup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupTool {
    Setuptools,
    Other,
}

impl SetupTool {
    pub fn parse(field: &'static str, value: &str) -> Result<Self, SpecError> {
        match value {
            "setuptools" => Ok(SetupTool::Setuptools),
            "other" => Ok(SetupTool::Other),
            _ => Err(SpecError::UnrecognizedValue {
                field,
                value: value.to_string(),
            }),
        }
    }
}

/// Test runner declared by `python-check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckRunner {
    SetupPyTest,
    Nose,
    Pytest,
}

impl CheckRunner {
    pub fn parse(field: &'static str, value: &str) -> Result<Self, SpecError> {
        match value {
            "setup_py_test" => Ok(CheckRunner::SetupPyTest),
            "nose" => Ok(CheckRunner::Nose),
            "pytest" => Ok(CheckRunner::Pytest),
            _ => Err(SpecError::UnrecognizedValue {
                field,
                value: value.to_string(),
            }),
        }
    }

    /// Shell line for the `%check` scriptlet, one interpreter at a time.
    pub fn command(&self, version: &PythonVersion) -> String {
        let python = format!("%{{__python{}}}", version);
        match self {
            CheckRunner::SetupPyTest => format!("{} setup.py test", python),
            CheckRunner::Nose => format!("{} -m nose", python),
            CheckRunner::Pytest => format!("{} -m py.test", python),
        }
    }
}

/// One entry of `python-versions`, kept as the literal scalar text so that
/// `3.9` substitutes into macros exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonVersion(String);

impl PythonVersion {
    pub fn new(literal: impl Into<String>) -> Self {
        Self(literal.into())
    }

    /// Leading component parsed as an integer: `3` and `3.9` are both major 3.
    pub fn major(&self) -> Option<u32> {
        self.0.split('.').next()?.parse().ok()
    }

    /// Python 3 interpreters compile into `__pycache__`; Python 2 does not.
    pub fn is_python3(&self) -> bool {
        self.major() == Some(3)
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
