//! Parsing of setuptools `requires.txt` metadata.
//!
//! Only package names are kept: version constraints and extras qualifiers
//! are stripped from every line.

use serde::Serialize;
use std::collections::BTreeMap;

/// Requirements read from one `requires.txt`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Requirements {
    /// Lines before the first `[group]` header.
    pub requires: Vec<String>,
    /// Lines under each `[group]` header.
    pub requires_extras: BTreeMap<String, Vec<String>>,
}

/// Reduce a requirement line to the bare package name.
///
/// ```
/// use py3graph::requirements::strip_version_constraints;
///
/// assert_eq!(strip_version_constraints("zope.foo >=4.0.0, <4.1.0a1"), "zope.foo");
/// assert_eq!(strip_version_constraints("zope.foo[docs] ==4.0"), "zope.foo");
/// ```
pub fn strip_version_constraints(requirement: &str) -> &str {
    let mut name = requirement;
    for stop in ['=', '<', '>', '['] {
        if let Some((head, _)) = name.split_once(stop) {
            name = head;
        }
    }
    name.trim()
}

/// Parse the contents of a `requires.txt` file.
pub fn parse_requires_txt(text: &str) -> Requirements {
    let mut parsed = Requirements::default();
    let mut group: Option<String> = None;

    for line in text.lines() {
        if let Some(header) = line.strip_prefix('[') {
            let name = header.split_once(']').map_or(header, |(name, _)| name);
            parsed.requires_extras.entry(name.to_string()).or_default();
            group = Some(name.to_string());
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        let requirement = strip_version_constraints(line).to_string();
        match &group {
            Some(name) => parsed
                .requires_extras
                .entry(name.clone())
                .or_default()
                .push(requirement),
            None => parsed.requires.push(requirement),
        }
    }

    parsed
}
