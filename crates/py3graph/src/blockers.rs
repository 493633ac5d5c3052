//! Blocker annotation.
//!
//! A blocker is a required package that does not support Python 3 yet. This
//! pass fills in `supports_py3`, the blocker lists and their inverse `blocks`
//! lists of every record, from the `supports` version lists.
//!
//! The set computed is the packages known *not* to support Python 3, so a
//! requirement that is not among the records at all is assumed to support it
//! and never reported as a blocker.

use crate::domain::PackageRecord;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

const PYTHON_CLASSIFIER: &str = "Programming Language :: Python :: ";
const PYPY_CLASSIFIER: &str = "Programming Language :: Python :: Implementation :: PyPy";

/// Record key holding trove classifiers, used when `supports` is empty.
pub const CLASSIFIERS_KEY: &str = "classifiers";

/// Whether a `supports` list mentions any Python 3 version.
pub fn declares_py3(supports: &[String]) -> bool {
    supports.iter().any(|version| version.starts_with('3'))
}

/// Python versions named by trove classifiers, in classifier order.
///
/// A bare major version is dropped when a detailed one of the same major
/// version is also listed. PyPy shows up as `pypy`.
///
/// ```
/// use py3graph::blockers::supported_versions;
///
/// let classifiers = [
///     "Programming Language :: Python :: 2",
///     "Programming Language :: Python :: 2.7",
///     "Programming Language :: Python :: 3",
/// ];
/// assert_eq!(supported_versions(&classifiers), vec!["2.7", "3"]);
/// ```
pub fn supported_versions<S: AsRef<str>>(classifiers: &[S]) -> Vec<String> {
    let mut versions = Vec::new();
    let mut detailed = HashSet::new();
    for classifier in classifiers.iter().map(AsRef::as_ref) {
        if classifier == PYPY_CLASSIFIER {
            versions.push("pypy");
            continue;
        }
        let Some(rest) = classifier.strip_prefix(PYTHON_CLASSIFIER) else {
            continue;
        };
        if !rest.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        if let Some((major, _)) = rest.split_once('.') {
            detailed.insert(major);
        }
        versions.push(rest);
    }
    versions
        .into_iter()
        .filter(|version| !detailed.contains(version))
        .map(str::to_string)
        .collect()
}

/// Fill empty `supports` lists from a record's `classifiers`, if it has any.
///
/// Returns how many records were filled.
pub fn fill_supports(records: &mut [PackageRecord]) -> usize {
    let mut filled = 0;
    for record in records.iter_mut().filter(|record| record.supports.is_empty()) {
        let Some(classifiers) = record
            .other
            .get(CLASSIFIERS_KEY)
            .and_then(serde_json::Value::as_array)
        else {
            continue;
        };
        let classifiers: Vec<&str> = classifiers
            .iter()
            .filter_map(serde_json::Value::as_str)
            .collect();
        record.supports = supported_versions(&classifiers);
        filled += 1;
    }
    debug!(filled, "derived supports from classifiers");
    filled
}

/// Annotate `records` in place.
///
/// Records keep their order; existing annotation fields are overwritten.
pub fn annotate(records: &mut [PackageRecord]) {
    let unsupported: HashSet<String> = records
        .iter()
        .filter(|record| !declares_py3(&record.supports))
        .map(|record| record.name.clone())
        .collect();

    for record in records.iter_mut() {
        record.blocks.clear();
        record.blocks_extras.clear();
        record.blocks_all.clear();

        if !unsupported.contains(&record.name) {
            record.supports_py3 = Some(true);
            record.blockers.clear();
            record.blockers_extras.clear();
            record.all_blockers.clear();
            continue;
        }

        record.supports_py3 = Some(false);
        record.blockers = record
            .requires
            .iter()
            .filter(|dep| unsupported.contains(*dep))
            .cloned()
            .collect();
        record.blockers_extras = record
            .requires_extras
            .values()
            .flatten()
            .filter(|dep| unsupported.contains(*dep))
            .cloned()
            .collect();
        record.all_blockers = record
            .blockers
            .iter()
            .chain(&record.blockers_extras)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
    }

    let position: HashMap<String, usize> = records
        .iter()
        .enumerate()
        .map(|(i, record)| (record.name.clone(), i))
        .collect();
    let inverse = |blockers_of: fn(&PackageRecord) -> &Vec<String>| -> Vec<(usize, String)> {
        let mut links = Vec::new();
        for record in records.iter() {
            for blocker in blockers_of(record) {
                if let Some(&i) = position.get(blocker) {
                    links.push((i, record.name.clone()));
                }
            }
        }
        links
    };
    let blocks = inverse(|record| &record.blockers);
    let blocks_extras = inverse(|record| &record.blockers_extras);
    let blocks_all = inverse(|record| &record.all_blockers);

    for (i, blocked) in blocks {
        records[i].blocks.push(blocked);
    }
    for (i, blocked) in blocks_extras {
        records[i].blocks_extras.push(blocked);
    }
    for (i, blocked) in blocks_all {
        records[i].blocks_all.push(blocked);
    }

    debug!(
        packages = records.len(),
        unsupported = unsupported.len(),
        "annotated blockers"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(name: &str, supports: &[&str], requires: &[&str]) -> PackageRecord {
        let mut record = PackageRecord::new(name).requires(requires.iter().copied());
        record.supports = supports.iter().map(|s| (*s).to_string()).collect();
        record
    }

    #[rstest]
    #[case::py3_only(&["3.3"], true)]
    #[case::mixed(&["2.7", "3.2"], true)]
    #[case::major_only(&["3"], true)]
    #[case::py2_only(&["2.6", "2.7"], false)]
    #[case::pypy(&["2.7", "pypy"], false)]
    #[case::empty(&[], false)]
    fn test_declares_py3(#[case] supports: &[&str], #[case] expected: bool) {
        let supports: Vec<String> = supports.iter().map(|s| (*s).to_string()).collect();
        assert_eq!(declares_py3(&supports), expected);
    }

    const ZOPE_INTERFACE_CLASSIFIERS: &[&str] = &[
        "Development Status :: 5 - Production/Stable",
        "Framework :: Zope3",
        "Intended Audience :: Developers",
        "License :: OSI Approved :: Zope Public License",
        "Operating System :: OS Independent",
        "Programming Language :: Python",
        "Programming Language :: Python :: 2",
        "Programming Language :: Python :: 2.6",
        "Programming Language :: Python :: 2.7",
        "Programming Language :: Python :: 3",
        "Programming Language :: Python :: 3.2",
        "Programming Language :: Python :: 3.3",
        "Programming Language :: Python :: Implementation :: CPython",
        "Programming Language :: Python :: Implementation :: PyPy",
        "Topic :: Software Development :: Libraries :: Python Modules",
    ];

    #[rstest]
    #[case::zope_interface(ZOPE_INTERFACE_CLASSIFIERS, &["2.6", "2.7", "3.2", "3.3", "pypy"])]
    #[case::no_specifics(
        &[
            "Programming Language :: Python :: 2",
            "Programming Language :: Python :: 2.7",
            "Programming Language :: Python :: 3",
        ],
        &["2.7", "3"]
    )]
    #[case::none(&["Framework :: Zope3"], &[])]
    fn test_supported_versions(#[case] classifiers: &[&str], #[case] expected: &[&str]) {
        assert_eq!(supported_versions(classifiers), expected);
    }

    #[test]
    fn test_fill_supports_only_touches_empty_lists() {
        let mut records: Vec<PackageRecord> = serde_json::from_str(
            r#"[
                {"name": "a", "classifiers": ["Programming Language :: Python :: 3.4"]},
                {"name": "b", "supports": ["2.7"],
                 "classifiers": ["Programming Language :: Python :: 3.4"]},
                {"name": "c"}
            ]"#,
        )
        .unwrap();

        assert_eq!(fill_supports(&mut records), 1);
        assert_eq!(records[0].supports, vec!["3.4"]);
        assert_eq!(records[1].supports, vec!["2.7"]);
        assert!(records[2].supports.is_empty());
    }

    #[test]
    fn test_annotate_blockers_and_inverse() {
        let mut records = vec![
            record("app", &["2.7"], &["lib", "ported", "external"]),
            record("lib", &["2.7"], &[]),
            record("ported", &["2.7", "3.3"], &["lib"]),
        ];
        records[0]
            .requires_extras
            .insert("test".to_string(), vec!["lib".to_string(), "tool".to_string()]);
        records.push(record("tool", &[], &[]));

        annotate(&mut records);

        let app = &records[0];
        assert_eq!(app.supports_py3, Some(false));
        assert_eq!(app.blockers, vec!["lib"]);
        assert_eq!(app.blockers_extras, vec!["lib", "tool"]);
        assert_eq!(app.all_blockers, vec!["lib", "tool"]);

        // A supporting package never has blockers, even with unported requirements.
        let ported = &records[2];
        assert_eq!(ported.supports_py3, Some(true));
        assert!(ported.blockers.is_empty());

        let lib = &records[1];
        assert_eq!(lib.blocks, vec!["app"]);
        assert_eq!(lib.blocks_extras, vec!["app"]);
        assert_eq!(lib.blocks_all, vec!["app"]);
        assert_eq!(records[3].blocks_all, vec!["app"]);
        assert!(records[3].blocks.is_empty());
    }

    #[test]
    fn test_annotate_is_repeatable() {
        let mut records = vec![record("a", &[], &["b"]), record("b", &[], &[])];
        annotate(&mut records);
        let first = records.clone();
        annotate(&mut records);
        assert_eq!(records, first);
    }
}
