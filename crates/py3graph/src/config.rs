//! Configuration for py3graph.
//!
//! All defaults the driver and renderer rely on live in [`Config`]. It can be
//! read from a YAML file; command-line flags override individual values.

use crate::error::{Error, Result};
use crate::render::RenderOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default Graphviz layout engine.
pub const DEFAULT_LAYOUT: &str = "neato";

/// Default graph title when no packages are named.
pub const DEFAULT_TITLE: &str = "all deps";

/// Requirements ignored unless configured otherwise.
pub const DEFAULT_IGNORED: &[&str] = &["setuptools"];

/// Driver and renderer defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Graphviz layout engine.
    pub layout: String,

    /// Switch to big nodes when at most this many nodes are rendered; 0 disables.
    pub big_node_threshold: usize,

    /// Title used when no packages are named.
    pub default_title: String,

    /// Requirements that never become edges.
    pub ignored_requirements: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: DEFAULT_LAYOUT.to_string(),
            big_node_threshold: 0,
            default_title: DEFAULT_TITLE.to_string(),
            ignored_requirements: DEFAULT_IGNORED.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.layout.trim().is_empty() {
            return Err(Error::Config("layout cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Whether `node_count` rendered nodes call for big nodes.
    pub fn wants_big_nodes(&self, node_count: usize, forced: bool) -> bool {
        forced || (self.big_node_threshold > 0 && node_count <= self.big_node_threshold)
    }

    /// Title for a graph seeded from `packages`.
    pub fn title_for(&self, packages: &[String]) -> String {
        if packages.is_empty() {
            self.default_title.clone()
        } else {
            format!("{} deps", packages.join(" "))
        }
    }

    /// Render options for a graph of `node_count` nodes.
    pub fn render_options(&self, title: String, node_count: usize, force_big: bool) -> RenderOptions {
        RenderOptions {
            title,
            layout: self.layout.clone(),
            big_nodes: self.wants_big_nodes(node_count, force_big),
            directed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.layout, "neato");
        assert_eq!(config.big_node_threshold, 0);
        assert_eq!(config.ignored_requirements, vec!["setuptools"]);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("py3graph.yaml");

        let original = Config {
            layout: "dot".to_string(),
            big_node_threshold: 40,
            ..Config::default()
        };
        original.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(original, loaded);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("big-node-threshold: 40"));
    }

    #[test]
    fn test_config_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("py3graph.yaml");
        fs::write(&path, "layout: fdp\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.layout, "fdp");
        assert_eq!(config.default_title, DEFAULT_TITLE);
    }

    #[test]
    fn test_config_rejects_bad_yaml_and_empty_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("py3graph.yaml");

        fs::write(&path, "big-node-threshold: lots\n").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config(_))));

        fs::write(&path, "layout: ''\n").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
    }

    #[rstest]
    #[case::forced(0, 500, true, true)]
    #[case::disabled(0, 3, false, false)]
    #[case::under_threshold(10, 10, false, true)]
    #[case::over_threshold(10, 11, false, false)]
    fn test_wants_big_nodes(
        #[case] threshold: usize,
        #[case] nodes: usize,
        #[case] forced: bool,
        #[case] expected: bool,
    ) {
        let config = Config {
            big_node_threshold: threshold,
            ..Config::default()
        };
        assert_eq!(config.wants_big_nodes(nodes, forced), expected);
    }

    #[test]
    fn test_title_for() {
        let config = Config::default();
        assert_eq!(config.title_for(&[]), "all deps");
        assert_eq!(
            config.title_for(&["zope.a".to_string(), "zope.b".to_string()]),
            "zope.a zope.b deps"
        );
    }
}
