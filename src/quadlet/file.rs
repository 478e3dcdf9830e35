//! The Quadlet unit file format: ordered sections of `Key=Value` lines.

use crate::error::{PodsvcError, Result};
use std::fmt::Write as _;

/// One `[Name]` section. Entries keep their insertion order and a key may
/// appear any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Append a `key=value` line.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.entries.push((key.into(), value.to_string()));
    }

    /// Append a line only when `value` is present.
    pub fn push_opt<V: ToString>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A complete unit file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuadletFile {
    /// `#` comment lines written before the first section.
    pub header: Vec<String>,
    pub sections: Vec<Section>,
}

impl QuadletFile {
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Serialize to text. Sections are separated by a blank line and the
    /// output ends with a single newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.header {
            let _ = writeln!(out, "# {}", line);
        }
        if !self.header.is_empty() {
            out.push('\n');
        }
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "[{}]", section.name);
            for (key, value) in &section.entries {
                let _ = writeln!(out, "{}={}", key, value);
            }
        }
        out
    }

    /// Parse unit file text.
    ///
    /// Blank lines and `#`/`;` comments are skipped (leading comments are
    /// kept as the header). Line continuations are not supported.
    pub fn parse(text: &str) -> Result<Self> {
        let mut file = QuadletFile::default();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            let line_no = index + 1;

            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix('#').or_else(|| line.strip_prefix(';')) {
                if file.sections.is_empty() {
                    file.header.push(comment.trim().to_string());
                }
                continue;
            }
            if line.starts_with('[') {
                let name = line
                    .strip_prefix('[')
                    .and_then(|l| l.strip_suffix(']'))
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| {
                        PodsvcError::UserError(format!(
                            "line {}: malformed section header '{}'",
                            line_no, line
                        ))
                    })?;
                file.sections.push(Section::new(name));
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| {
                PodsvcError::UserError(format!(
                    "line {}: expected Key=Value, found '{}'",
                    line_no, line
                ))
            })?;
            let section = file.sections.last_mut().ok_or_else(|| {
                PodsvcError::UserError(format!(
                    "line {}: '{}' appears before any [Section]",
                    line_no, line
                ))
            })?;
            section.push(key.trim(), value.trim());
        }

        Ok(file)
    }
}
