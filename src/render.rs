//! Spec-file rendering: turn a validated description into ordered text lines.
//!
//! Macro placeholders such as `%{modulename}` and `%{version}` are emitted
//! verbatim; expanding them is the RPM build tool's job, not ours. The only
//! expansion done here is the output file name, which needs a literal.

use crate::changelog::Entry;
use crate::spec::{SetupTool, ValidatedSpec};
use anyhow::Context;
use std::path::Path;

/// Release suffix policy. RPM on Fedora wants `%{?dist}` appended to the
/// release; other targets may want a different tag or none at all.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub dist_tag: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dist_tag: "%{?dist}".to_string(),
        }
    }
}

/// Ordered line list, write-once. Serialized verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSpec {
    lines: Vec<String>,
}

impl RenderedSpec {
    fn new() -> Self {
        Self { lines: Vec::new() }
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn write(&self, path: &Path) -> crate::Result<()> {
        std::fs::write(path, self.text())
            .with_context(|| format!("write spec file {}", path.display()))
    }
}

/// Emit every section in order: globals, preamble, per-version subpackages,
/// scriptlets, file lists, changelog. Pure function of its inputs.
pub fn render(spec: &ValidatedSpec, opts: &RenderOptions, changelog: &[Entry]) -> RenderedSpec {
    let mut out = RenderedSpec::new();

    for (name, value) in &spec.vars {
        out.push(format!("%global {} {}", name, value));
    }
    out.blank();

    let release = if opts.dist_tag.is_empty() {
        spec.release.clone()
    } else {
        format!("{}{}", spec.release, opts.dist_tag)
    };

    out.push(format!("Name: {}", spec.name_macro));
    out.push(format!("Version: {}", spec.version));
    out.push(format!("Release: {}", release));
    out.push(format!("Summary: {}", spec.summary));
    out.blank();

    out.push(format!("License: {}", spec.license));
    out.push(format!("URL: {}", spec.url));

    for (i, source) in spec.sources.iter().enumerate() {
        out.push(format!("Source{}: {}", i, source));
    }
    for (i, patch) in spec.patches.iter().enumerate() {
        out.push(format!("Patch{}: {}", i, patch));
    }
    out.blank();

    if let Some(arch) = &spec.build_arch {
        out.push(format!("BuildArch: {}", arch));
        out.blank();
    }

    out.push(format!("Description: {}", spec.description));
    out.blank();

    for version in &spec.python_versions {
        let subpackage = format!("python{}-%{{modulename}}", version);

        out.push(format!("%package -n {}", subpackage));
        out.push(format!("Summary: {}", spec.description.trim()));
        out.push(format!(
            "%{{?python_provide:%python_provide {}}}",
            subpackage
        ));

        out.push(format!("BuildRequires: python{}-devel", version));
        if spec.setup == SetupTool::Setuptools {
            out.push(format!("BuildRequires: python{}-setup", version));
        }
        out.blank();

        out.push(format!(
            "%description -n {} {}",
            subpackage, spec.description
        ));
        out.push(format!("Python {} version", version));
        out.blank();
    }

    out.push("%prep");
    out.push(format!("%autosetup -n {}-%{{version}}", spec.modulename));
    out.blank();

    out.push("%build");
    for version in &spec.python_versions {
        out.push(format!("%py{}_build", version));
    }
    out.blank();

    out.push("%install");
    for version in &spec.python_versions {
        out.push(format!("%py{}_install", version));
    }
    out.blank();

    out.push("%check");
    for version in &spec.python_versions {
        out.push(spec.check.command(version));
    }
    out.blank();

    for version in &spec.python_versions {
        out.push(format!("%files -n python{}-%{{modulename}}", version));
        out.push(file_list_line("%license", &spec.files.license));
        out.push(file_list_line("%doc", &spec.files.docs));
        if !spec.files.other.is_empty() {
            out.push(spec.files.other.join(" "));
        }

        let sitelib = format!("%{{python{}_sitelib}}", version);
        out.push(format!("{}/{}-*.egg-info/", sitelib, spec.egginfoname));
        out.push(format!("{}/%{{modulename}}.py*", sitelib));

        if version.is_python3() {
            out.push(format!("{}/__pycache__/%{{modulename}}.*", sitelib));
        }
        out.blank();
    }

    if spec.changelog_from_git {
        out.push("%changelog");
        for entry in changelog {
            out.push(entry.header());
            for note in &entry.notes {
                out.push(format!("- {}", note));
            }
        }
    }

    out
}

/// `%license`/`%doc` headers are emitted even when the list is empty.
fn file_list_line(header: &str, paths: &[String]) -> String {
    if paths.is_empty() {
        header.to_string()
    } else {
        format!("{} {}", header, paths.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::Entry;
    use crate::spec::PackageSpec;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn sample_yaml() -> String {
        r#"
language: python
version: "1.0"
release: "1"
summary: S
license: MIT
sources: [a.tar.gz]
architectures: []
description: D
python-versions: [3]
python-setup: setuptools
python-check: pytest
changelog-from-git: false
files:
  license: []
  docs: []
  other: []
modulename: foo
"#
        .to_string()
    }

    fn rendered(yaml: &str) -> RenderedSpec {
        let spec = PackageSpec::parse(yaml)
            .unwrap()
            .validate_and_build()
            .unwrap();
        render(&spec, &RenderOptions::default(), &[])
    }

    fn count_prefixed(out: &RenderedSpec, prefix: &str) -> usize {
        out.lines().iter().filter(|l| l.starts_with(prefix)).count()
    }

    #[test]
    fn worked_example() {
        let out = rendered(&sample_yaml());
        let text = out.text();

        assert!(text.contains("Source0: a.tar.gz"));
        assert!(text.contains("%{__python3} -m py.test"));
        assert!(!text.contains("%changelog"));

        // No BuildArch for an empty architecture list.
        assert!(!text.contains("BuildArch"));
    }

    #[test]
    fn preamble_lines_in_order() {
        let out = rendered(&sample_yaml());
        let lines = out.lines();

        assert_eq!(lines[0], "%global modulename foo");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Name: python-%{modulename}");
        assert_eq!(lines[3], "Version: 1.0");
        assert_eq!(lines[4], "Release: 1%{?dist}");
        assert_eq!(lines[5], "Summary: S");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "License: MIT");
        assert_eq!(lines[8], "URL: https://pypi.python.org/pypi/foo");
    }

    #[test]
    fn sources_and_patches_numbered_from_zero() {
        let yaml = sample_yaml()
            .replace("sources: [a.tar.gz]", "sources: [a.tar.gz, b.tar.gz]")
            + "patches: [p0.patch, p1.patch, p2.patch]\n";
        let out = rendered(&yaml);

        assert_eq!(count_prefixed(&out, "Source"), 2);
        assert_eq!(count_prefixed(&out, "Patch"), 3);
        assert!(out.lines().contains(&"Source1: b.tar.gz".to_string()));
        assert!(out.lines().contains(&"Patch2: p2.patch".to_string()));
    }

    #[test]
    fn buildarch_joins_architectures() {
        let yaml = sample_yaml().replace("architectures: []", "architectures: [x86_64, noarch]");
        let out = rendered(&yaml);
        assert_eq!(count_prefixed(&out, "BuildArch"), 1);
        assert!(out.lines().contains(&"BuildArch: x86_64 noarch".to_string()));

        let yaml = sample_yaml().replace("architectures: []\n", "");
        let out = rendered(&yaml);
        assert_eq!(count_prefixed(&out, "BuildArch"), 0);
    }

    #[test]
    fn one_files_block_per_version_pycache_only_for_python3() {
        let yaml = sample_yaml().replace("python-versions: [3]", "python-versions: [2, 3]");
        let out = rendered(&yaml);

        assert_eq!(count_prefixed(&out, "%files"), 2);
        assert!(out.lines().contains(&"%files -n python2-%{modulename}".to_string()));
        assert!(out.lines().contains(&"%files -n python3-%{modulename}".to_string()));

        let pycache: Vec<&String> = out
            .lines()
            .iter()
            .filter(|l| l.contains("__pycache__"))
            .collect();
        assert_eq!(
            pycache,
            vec!["%{python3_sitelib}/__pycache__/%{modulename}.*"]
        );
    }

    #[test]
    fn dotted_python3_version_still_gets_pycache() {
        let yaml = sample_yaml().replace("python-versions: [3]", "python-versions: [3.9]");
        let out = rendered(&yaml);
        assert!(out
            .lines()
            .contains(&"%{python3.9_sitelib}/__pycache__/%{modulename}.*".to_string()));
        assert!(out.lines().contains(&"%py3.9_build".to_string()));
    }

    #[test]
    fn duplicate_versions_each_get_a_block() {
        let yaml = sample_yaml().replace("python-versions: [3]", "python-versions: [3, 3]");
        let out = rendered(&yaml);
        assert_eq!(count_prefixed(&out, "%package"), 2);
        assert_eq!(count_prefixed(&out, "%files"), 2);
    }

    #[test]
    fn setuptools_adds_per_version_build_requires() {
        let out = rendered(&sample_yaml());
        assert!(out.lines().contains(&"BuildRequires: python3-devel".to_string()));
        assert!(out.lines().contains(&"BuildRequires: python3-setup".to_string()));

        let yaml = sample_yaml().replace("python-setup: setuptools", "python-setup: other");
        let out = rendered(&yaml);
        assert!(out.lines().contains(&"BuildRequires: python3-devel".to_string()));
        assert!(!out.lines().contains(&"BuildRequires: python3-setup".to_string()));
    }

    #[test]
    fn check_runner_selects_command() {
        let yaml = sample_yaml().replace("python-check: pytest", "python-check: nose");
        let out = rendered(&yaml);
        assert!(out.lines().contains(&"%{__python3} -m nose".to_string()));

        let yaml = sample_yaml().replace("python-check: pytest", "python-check: setup_py_test");
        let out = rendered(&yaml);
        assert!(out.lines().contains(&"%{__python3} setup.py test".to_string()));
    }

    #[test]
    fn file_lists_emit_headers_even_when_empty() {
        let out = rendered(&sample_yaml());
        assert!(out.lines().contains(&"%license".to_string()));
        assert!(out.lines().contains(&"%doc".to_string()));

        let yaml = sample_yaml().replace(
            "files:\n  license: []\n  docs: []\n  other: []",
            "files:\n  license: [LICENSE]\n  docs: [README.md, NEWS]\n  other: [extra.conf]",
        );
        let out = rendered(&yaml);
        assert!(out.lines().contains(&"%license LICENSE".to_string()));
        assert!(out.lines().contains(&"%doc README.md NEWS".to_string()));
        assert!(out.lines().contains(&"extra.conf".to_string()));
    }

    #[test]
    fn egginfo_and_module_globs_per_version() {
        let out = rendered(&sample_yaml());
        assert!(out
            .lines()
            .contains(&"%{python3_sitelib}/foo-*.egg-info/".to_string()));
        assert!(out
            .lines()
            .contains(&"%{python3_sitelib}/%{modulename}.py*".to_string()));
    }

    #[test]
    fn changelog_rendered_only_when_requested() {
        let entry = Entry {
            date: NaiveDate::from_ymd_opt(2016, 5, 5).unwrap(),
            author: "Jane Doe <jane@example.com>".to_string(),
            evr: Some("1.0-1".to_string()),
            notes: vec!["Initial package".to_string()],
        };

        let spec = PackageSpec::parse(&sample_yaml())
            .unwrap()
            .validate_and_build()
            .unwrap();
        let out = render(&spec, &RenderOptions::default(), std::slice::from_ref(&entry));
        assert!(!out.text().contains("%changelog"));

        let yaml = sample_yaml().replace("changelog-from-git: false", "changelog-from-git: true");
        let spec = PackageSpec::parse(&yaml)
            .unwrap()
            .validate_and_build()
            .unwrap();
        let out = render(&spec, &RenderOptions::default(), std::slice::from_ref(&entry));
        let text = out.text();
        assert!(text.contains("%changelog"));
        assert!(text.contains("* Thu May 05 2016 Jane Doe <jane@example.com> - 1.0-1"));
        assert!(text.contains("- Initial package"));
    }

    #[test]
    fn empty_dist_tag_leaves_release_bare() {
        let spec = PackageSpec::parse(&sample_yaml())
            .unwrap()
            .validate_and_build()
            .unwrap();
        let opts = RenderOptions {
            dist_tag: String::new(),
        };
        let out = render(&spec, &opts, &[]);
        assert!(out.lines().contains(&"Release: 1".to_string()));
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = rendered(&sample_yaml());
        let b = rendered(&sample_yaml());
        assert_eq!(a, b);
        assert_eq!(a.text(), b.text());
    }

    #[test]
    fn global_lines_follow_document_order() {
        let yaml = format!("{}zeta: 1\nalpha: two\n", sample_yaml());
        let out = rendered(&yaml);
        assert_eq!(out.lines()[0], "%global modulename foo");
        assert_eq!(out.lines()[1], "%global zeta 1");
        assert_eq!(out.lines()[2], "%global alpha two");
    }
}
