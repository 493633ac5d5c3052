//! Domain types for dependency graphs.
//!
//! [`PackageRecord`] is the JSON shape exchanged with the rest of the porting
//! pipeline. [`NodeAttrs`] and [`EdgeAttrs`] are the attributes stored in a
//! [`Graph`](crate::graph::Graph): the two well-known keys are typed fields,
//! everything else is a free-form styling override in [`Attributes`].

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute key under which an edge's extra group is exposed.
pub const EXTRA_KEY: &str = "extra";

/// Attribute key under which a node's Python 3 support flag is exposed.
pub const SUPPORTS_PY3_KEY: &str = "supports_py3";

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Rendered quoted and escaped.
    Str(String),
    /// Rendered as `true` / `false`.
    Bool(bool),
    /// Rendered as a bare integer.
    Int(i64),
    /// Rendered as a bare number.
    Float(f64),
}

impl AttrValue {
    /// Whether the value counts as set: not false, zero or empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for AttrValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

/// Free-form key/value attributes, ordered by key.
pub type Attributes = BTreeMap<String, AttrValue>;

/// Attributes of an explicitly registered node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeAttrs {
    /// Tri-state Python 3 support: `None` means unknown.
    pub supports_py3: Option<bool>,

    /// Styling overrides.
    pub style: Attributes,
}

impl NodeAttrs {
    /// Attributes carrying only a support flag.
    pub fn with_support(supports_py3: Option<bool>) -> Self {
        Self {
            supports_py3,
            style: Attributes::new(),
        }
    }

    /// Merge `other` into `self`, last write wins per key.
    ///
    /// An unset `supports_py3` in `other` leaves the current value alone.
    pub fn merge(&mut self, other: NodeAttrs) {
        if other.supports_py3.is_some() {
            self.supports_py3 = other.supports_py3;
        }
        self.style.extend(other.style);
    }

    /// Look up an attribute by key, including the typed field.
    pub fn get(&self, key: &str) -> Option<AttrValue> {
        if key == SUPPORTS_PY3_KEY {
            return self.supports_py3.map(AttrValue::Bool);
        }
        self.style.get(key).cloned()
    }
}

/// Attributes of a dependency edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeAttrs {
    /// Extra group that introduced the edge; `None` for a mandatory requirement.
    pub extra: Option<String>,

    /// Styling overrides.
    pub style: Attributes,
}

impl EdgeAttrs {
    /// A mandatory dependency edge.
    pub fn mandatory() -> Self {
        Self::default()
    }

    /// An edge introduced by the extra group `name`.
    pub fn extra(name: impl Into<String>) -> Self {
        Self {
            extra: Some(name.into()),
            style: Attributes::new(),
        }
    }

    /// Add a styling override.
    #[must_use]
    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }

    /// Merge `other` into `self`, last write wins per key.
    ///
    /// An unset `extra` in `other` leaves the current value alone.
    pub fn merge(&mut self, other: EdgeAttrs) {
        if other.extra.is_some() {
            self.extra = other.extra;
        }
        self.style.extend(other.style);
    }

    /// Look up an attribute by key, including the typed field.
    pub fn get(&self, key: &str) -> Option<AttrValue> {
        if key == EXTRA_KEY {
            return self.extra.clone().map(AttrValue::Str);
        }
        self.style.get(key).cloned()
    }

    /// Whether the attribute `key` is present and truthy.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.is_truthy())
    }
}

/// One package as produced by the metadata-fetching stages of the pipeline.
///
/// Unknown keys are kept in [`other`](Self::other) so a record survives a
/// read/annotate/write cycle unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Package name. An empty name is rejected by the builder.
    #[serde(default)]
    pub name: String,

    /// Mandatory requirements.
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires: Vec<String>,

    /// Optional requirements keyed by extra group.
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_extras: BTreeMap<String, Vec<String>>,

    /// Python versions the package declares support for.
    #[serde(default, deserialize_with = "null_as_default")]
    pub supports: Vec<String>,

    /// Python 3 support: `None` when unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_py3: Option<bool>,

    /// Mandatory requirements that lack Python 3 support.
    #[serde(default, deserialize_with = "null_as_default")]
    pub blockers: Vec<String>,

    /// Extra requirements that lack Python 3 support.
    #[serde(default, deserialize_with = "null_as_default")]
    pub blockers_extras: Vec<String>,

    /// Sorted union of `blockers` and `blockers_extras`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub all_blockers: Vec<String>,

    /// Packages this one blocks through a mandatory requirement.
    #[serde(default, deserialize_with = "null_as_default")]
    pub blocks: Vec<String>,

    /// Packages this one blocks through an extra requirement.
    #[serde(default, deserialize_with = "null_as_default")]
    pub blocks_extras: Vec<String>,

    /// Packages this one blocks either way.
    #[serde(default, deserialize_with = "null_as_default")]
    pub blocks_all: Vec<String>,

    /// Any other keys, passed through untouched.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl PackageRecord {
    /// Create a record with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the mandatory requirements.
    #[must_use]
    pub fn requires<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Add an extra requirement group.
    #[must_use]
    pub fn extra<I, S>(mut self, group: impl Into<String>, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires_extras
            .insert(group.into(), deps.into_iter().map(Into::into).collect());
        self
    }

    /// Set the Python 3 support flag.
    #[must_use]
    pub fn supports_py3(mut self, supports: Option<bool>) -> Self {
        self.supports_py3 = supports;
        self
    }
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
