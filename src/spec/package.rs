//! Package description (input YAML) and its validated form.
//!
//! Document shape:
//!
//! ```yaml
//! language: python
//! version: "1.2.3"
//! release: "1"
//! summary: One-line summary
//! license: MIT
//! sources: [foo-1.2.3.tar.gz]
//! patches: [fix-tests.patch]        # optional
//! architectures: [x86_64, noarch]   # or null
//! description: Longer text
//! python-versions: [2, 3]
//! python-setup: setuptools          # or: other
//! python-check: pytest              # or: setup_py_test, nose
//! changelog-from-git: true
//! files:
//!   license: [LICENSE]
//!   docs: [README.md]
//!   other: []
//! modulename: foo                   # free-form variable, consumed for defaults
//! ```
//!
//! Every key not listed above is a free-form variable and is emitted as a
//! `%global` definition in document order. `modulename` must be among them.

use crate::error::SpecError;
use crate::spec::options::{CheckRunner, PythonVersion, SetupTool};
use serde_yaml::{Mapping, Value};

/// Raw package description: the YAML mapping, fields not yet extracted.
#[derive(Debug, Clone)]
pub struct PackageSpec {
    doc: Mapping,
}

/// `files:` section, each list defaulting to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLists {
    pub license: Vec<String>,
    pub docs: Vec<String>,
    pub other: Vec<String>,
}

/// Fully extracted description, defaults applied, ready for rendering.
#[derive(Debug, Clone)]
pub struct ValidatedSpec {
    pub version: String,
    pub release: String,
    pub summary: String,
    pub license: String,
    pub sources: Vec<String>,
    pub patches: Vec<String>,
    /// Space-joined `architectures`, None when null or empty.
    pub build_arch: Option<String>,
    pub description: String,
    pub python_versions: Vec<PythonVersion>,
    pub setup: SetupTool,
    pub check: CheckRunner,
    pub changelog_from_git: bool,
    pub files: FileLists,

    /// `Name:` value, macro form (`python-%{modulename}` when defaulted).
    pub name_macro: String,
    /// Literal name used for the output file name.
    pub name_expanded: String,
    pub egginfoname: String,
    pub modulename: String,
    pub url: String,

    /// Free-form variables, document order. Emitted as `%global` lines.
    pub vars: Vec<(String, String)>,
}

impl PackageSpec {
    /// Parse the YAML text. The document must be a mapping.
    pub fn parse(text: &str) -> Result<Self, SpecError> {
        let doc: Mapping = serde_yaml::from_str(text)?;
        Ok(Self { doc })
    }

    /// Extract every required field, apply defaults, decode the option
    /// enums. Fails on the first missing or mistyped field, before any
    /// output exists.
    pub fn validate_and_build(mut self) -> Result<ValidatedSpec, SpecError> {
        let language = take_scalar(&mut self.doc, "language")?;
        if language != "python" {
            return Err(SpecError::UnsupportedLanguage(language));
        }

        let version = take_scalar(&mut self.doc, "version")?;
        let release = take_scalar(&mut self.doc, "release")?;
        let summary = take_scalar(&mut self.doc, "summary")?;
        let license = take_scalar(&mut self.doc, "license")?;
        let sources = take_scalar_seq(&mut self.doc, "sources")?;
        let build_arch = take_architectures(&mut self.doc)?;
        let description = take_scalar(&mut self.doc, "description")?;
        let python_versions = take_versions(&mut self.doc)?;
        let setup = SetupTool::parse("python-setup", &take_scalar(&mut self.doc, "python-setup")?)?;
        let check = CheckRunner::parse("python-check", &take_scalar(&mut self.doc, "python-check")?)?;
        let changelog_from_git = take_bool(&mut self.doc, "changelog-from-git")?;
        let files = take_files(&mut self.doc)?;

        // Optional fields.
        let name = take_opt_scalar(&mut self.doc, "name")?;
        let egginfoname = take_opt_scalar(&mut self.doc, "egginfoname")?;
        let patches = take_opt_scalar_seq(&mut self.doc, "patches")?.unwrap_or_default();

        // Whatever is left becomes a %global variable, document order.
        let mut vars: Vec<(String, String)> = Vec::new();
        for (key, value) in &self.doc {
            let key = scalar_str(key).ok_or(SpecError::WrongType {
                field: "global variable name".to_string(),
                expected: "a scalar",
            })?;
            let value = scalar_str(value).ok_or_else(|| SpecError::WrongType {
                field: key.clone(),
                expected: "a scalar",
            })?;
            vars.push((key, value));
        }

        // modulename lives among the free-form variables but also seeds the
        // derived defaults below.
        let modulename = vars
            .iter()
            .find(|(k, _)| k == "modulename")
            .map(|(_, v)| v.clone())
            .ok_or(SpecError::MissingField("modulename"))?;

        let egginfoname = egginfoname.unwrap_or_else(|| modulename.clone());

        // The defaulted Name keeps the macro unexpanded for RPM; the file
        // name on disk needs the expanded literal.
        let (name_macro, name_expanded) = match name {
            Some(n) => (n.clone(), n),
            None => (
                "python-%{modulename}".to_string(),
                format!("python-{}", modulename),
            ),
        };

        let url = format!("https://pypi.python.org/pypi/{}", modulename);

        Ok(ValidatedSpec {
            version,
            release,
            summary,
            license,
            sources,
            patches,
            build_arch,
            description,
            python_versions,
            setup,
            check,
            changelog_from_git,
            files,
            name_macro,
            name_expanded,
            egginfoname,
            modulename,
            url,
            vars,
        })
    }
}

impl ValidatedSpec {
    /// Look up a free-form variable by name.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

fn key(field: &str) -> Value {
    Value::String(field.to_string())
}

// shift_remove keeps the order of the remaining entries; plain remove is a
// swap-remove and would scramble the free-form variable order.
fn take(doc: &mut Mapping, field: &'static str) -> Result<Value, SpecError> {
    doc.shift_remove(&key(field))
        .ok_or(SpecError::MissingField(field))
}

/// Stringify a YAML scalar; mappings and sequences yield None.
fn scalar_str(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn take_scalar(doc: &mut Mapping, field: &'static str) -> Result<String, SpecError> {
    let value = take(doc, field)?;
    scalar_str(&value).ok_or(SpecError::WrongType {
        field: field.to_string(),
        expected: "a scalar",
    })
}

fn take_opt_scalar(doc: &mut Mapping, field: &'static str) -> Result<Option<String>, SpecError> {
    match doc.shift_remove(&key(field)) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_str(&value)
            .map(Some)
            .ok_or(SpecError::WrongType {
                field: field.to_string(),
                expected: "a scalar",
            }),
    }
}

fn scalar_seq(field: &str, value: Value) -> Result<Vec<String>, SpecError> {
    let items = match value {
        Value::Sequence(items) => items,
        _ => {
            return Err(SpecError::WrongType {
                field: field.to_string(),
                expected: "a sequence",
            });
        }
    };

    items
        .iter()
        .map(|item| {
            scalar_str(item).ok_or(SpecError::WrongType {
                field: field.to_string(),
                expected: "a sequence of scalars",
            })
        })
        .collect()
}

fn take_scalar_seq(doc: &mut Mapping, field: &'static str) -> Result<Vec<String>, SpecError> {
    let value = take(doc, field)?;
    scalar_seq(field, value)
}

fn take_opt_scalar_seq(
    doc: &mut Mapping,
    field: &'static str,
) -> Result<Option<Vec<String>>, SpecError> {
    match doc.shift_remove(&key(field)) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_seq(field, value).map(Some),
    }
}

/// `architectures` may be absent or null; both mean the same as an empty
/// list (no BuildArch line).
fn take_architectures(doc: &mut Mapping) -> Result<Option<String>, SpecError> {
    match doc.shift_remove(&key("architectures")) {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Sequence(_)) => {
            let arches = scalar_seq("architectures", value)?;
            if arches.is_empty() {
                Ok(None)
            } else {
                Ok(Some(arches.join(" ")))
            }
        }
        Some(_) => Err(SpecError::WrongType {
            field: "architectures".to_string(),
            expected: "a sequence or null",
        }),
    }
}

fn take_versions(doc: &mut Mapping) -> Result<Vec<PythonVersion>, SpecError> {
    let literals = take_scalar_seq(doc, "python-versions")?;
    Ok(literals.into_iter().map(PythonVersion::new).collect())
}

fn take_bool(doc: &mut Mapping, field: &'static str) -> Result<bool, SpecError> {
    match take(doc, field)? {
        Value::Bool(b) => Ok(b),
        _ => Err(SpecError::WrongType {
            field: field.to_string(),
            expected: "a boolean",
        }),
    }
}

fn take_files(doc: &mut Mapping) -> Result<FileLists, SpecError> {
    let mut mapping = match take(doc, "files")? {
        Value::Mapping(m) => m,
        _ => {
            return Err(SpecError::WrongType {
                field: "files".to_string(),
                expected: "a mapping",
            });
        }
    };

    let mut list_for = |name: &'static str| -> Result<Vec<String>, SpecError> {
        match mapping.shift_remove(&key(name)) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => scalar_seq(name, value),
        }
    };

    Ok(FileLists {
        license: list_for("license")?,
        docs: list_for("docs")?,
        other: list_for("other")?,
    })
}
