//! `%changelog` entries.
//!
//! When the description sets `changelog-from-git`, entries come from the
//! git history of the directory holding the input file (subject line per
//! commit, newest first). Without usable history we fall back to a single
//! "Initial package" entry attributed to the `packager` variable.

use crate::Result;
use crate::spec::ValidatedSpec;
use anyhow::{Context, bail};
use chrono::{Local, NaiveDate};
use std::path::Path;
use std::process::Command;

const FALLBACK_PACKAGER: &str = "Unknown Packager <unknown@localhost>";

/// One `%changelog` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub date: NaiveDate,
    pub author: String,
    /// `<version>-<release>` shown in the header; git-derived entries omit
    /// it since historical versions are not recoverable from commits.
    pub evr: Option<String>,
    pub notes: Vec<String>,
}

impl Entry {
    pub fn initial(author: &str, evr: &str) -> Self {
        Self {
            date: Local::now().date_naive(),
            author: author.to_string(),
            evr: Some(evr.to_string()),
            notes: vec!["Initial package".to_string()],
        }
    }

    /// Header line, e.g. `* Thu May 05 2016 Jane Doe <jane@example.com> - 1.3.3-1`.
    pub fn header(&self) -> String {
        let stamp = self.date.format("%a %b %d %Y");
        match &self.evr {
            Some(evr) => format!("* {} {} - {}", stamp, self.author, evr),
            None => format!("* {} {}", stamp, self.author),
        }
    }
}

/// Gather entries for a spec whose `changelog-from-git` is set. Never fails:
/// a missing repository degrades to the initial-entry fallback with a
/// warning on stderr.
pub fn collect(input: &Path, spec: &ValidatedSpec) -> Vec<Entry> {
    let dir = match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    match from_git(dir) {
        Ok(entries) if !entries.is_empty() => entries,
        Ok(_) => {
            eprintln!("WARN: git history is empty; writing an initial changelog entry");
            vec![fallback_entry(spec)]
        }
        Err(err) => {
            eprintln!(
                "WARN: no git history for changelog ({}); writing an initial changelog entry",
                err
            );
            vec![fallback_entry(spec)]
        }
    }
}

fn fallback_entry(spec: &ValidatedSpec) -> Entry {
    let author = spec.var("packager").unwrap_or(FALLBACK_PACKAGER);
    let evr = format!("{}-{}", spec.version, spec.release);
    Entry::initial(author, &evr)
}

/// Read `git log` of `dir`, newest first.
fn from_git(dir: &Path) -> Result<Vec<Entry>> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["log", "--date=short", "--format=%ad\t%an <%ae>\t%s"])
        .output()
        .context("run git log")?;

    if !output.status.success() {
        bail!(
            "git log failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let text = String::from_utf8(output.stdout).context("decode git log output")?;
    let mut entries = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        entries.push(parse_git_line(line)?);
    }
    Ok(entries)
}

/// Parse one `%ad\t%an <%ae>\t%s` line.
fn parse_git_line(line: &str) -> Result<Entry> {
    let mut parts = line.splitn(3, '\t');
    let (date, author, subject) = match (parts.next(), parts.next(), parts.next()) {
        (Some(d), Some(a), Some(s)) => (d, a, s),
        _ => bail!("unexpected git log line: {:?}", line),
    };

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("bad commit date {:?}", date))?;

    Ok(Entry {
        date,
        author: author.to_string(),
        evr: None,
        notes: vec![subject.to_string()],
    })
}
