//! `local.properties` reading
//!
//! Flutter writes `flutter.versionCode` and `flutter.versionName` here from
//! `pubspec.yaml`; the Flutter Gradle plugin exposes them to the app script.

use crate::error::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name Gradle and Flutter use
pub const LOCAL_PROPERTIES: &str = "local.properties";

/// Parsed Java-style properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalProperties {
    values: BTreeMap<String, String>,
    path: Option<PathBuf>,
}

impl LocalProperties {
    /// Parse properties text
    pub fn parse(content: &str) -> Self {
        let mut values = BTreeMap::new();
        let mut pending = String::new();

        for raw in content.lines() {
            let line = raw.trim_start();
            if pending.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
                continue;
            }

            // An odd run of trailing backslashes continues the logical line
            let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
            if trailing % 2 == 1 {
                pending.push_str(&line[..line.len() - 1]);
                continue;
            }
            pending.push_str(line);

            if let Some((key, value)) = split_entry(&pending) {
                values.insert(unescape(key.trim_end()), unescape(value.trim_start()));
            }
            pending.clear();
        }

        Self { values, path: None }
    }

    /// Read the first `local.properties` found in `dir` or its parent
    ///
    /// For `android/app/build.gradle.kts` that covers both `android/app/` and
    /// `android/`. Missing files yield empty properties.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = std::iter::once(dir).chain(dir.parent());
        for candidate in candidates {
            let path = candidate.join(LOCAL_PROPERTIES);
            if path.is_file() {
                let content = fs::read_to_string(&path)?;
                tracing::debug!(path = %path.display(), "read local properties");
                let mut props = Self::parse(&content);
                props.path = Some(path);
                return Ok(props);
            }
        }
        Ok(Self::default())
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Where the properties were read from
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// No entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Split at the first unescaped `=`, `:` or whitespace
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return Some((&line[..idx], &line[idx + 1..])),
            c if c.is_whitespace() => {
                let rest = line[idx..].trim_start();
                let rest = rest
                    .strip_prefix('=')
                    .or_else(|| rest.strip_prefix(':'))
                    .unwrap_or(rest);
                return Some((&line[..idx], rest));
            }
            _ => {}
        }
    }
    if line.is_empty() {
        None
    } else {
        Some((line, ""))
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
