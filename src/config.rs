//! TOML configuration.
//!
//! Every section is optional; [`Config::default`] is the minimal configuration
//! (embedded corpus, default search weights, analytics flush every five
//! minutes, HTTP bind on `127.0.0.1:7341`).
//!
//! ```toml
//! [corpus]
//! dir = "./corpus"
//!
//! [search]
//! title_weight = 1.0
//! description_weight = 0.7
//! content_weight = 0.5
//! code_weight = 0.3
//! default_limit = 10
//!
//! [analytics]
//! flush_interval_secs = 300
//! top_resources = 10
//! snapshot_path = "./data/analytics.json"
//!
//! [server]
//! bind = "127.0.0.1:7341"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorpusConfig {
    /// Directory of `NN-slug.md` section files. The embedded corpus is used when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Relevance weights for the search index.
///
/// Scores are normalized by the sum of the weights, so only their ratios
/// matter. Title matches should outweigh content matches, which should
/// outweigh code matches.
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_title_weight")]
    pub title_weight: f64,
    #[serde(default = "default_description_weight")]
    pub description_weight: f64,
    #[serde(default = "default_content_weight")]
    pub content_weight: f64,
    #[serde(default = "default_code_weight")]
    pub code_weight: f64,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            title_weight: default_title_weight(),
            description_weight: default_description_weight(),
            content_weight: default_content_weight(),
            code_weight: default_code_weight(),
            default_limit: default_limit(),
        }
    }
}

fn default_title_weight() -> f64 {
    1.0
}
fn default_description_weight() -> f64 {
    0.7
}
fn default_content_weight() -> f64 {
    0.5
}
fn default_code_weight() -> f64 {
    0.3
}
fn default_limit() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    /// Seconds between flushes. `0` disables the background flush task.
    #[serde(default = "default_flush_interval")]
    pub flush_interval_secs: u64,
    /// Length of the `topResources` list in summaries.
    #[serde(default = "default_top_resources")]
    pub top_resources: usize,
    /// Where flushes write a JSON snapshot. Logging only when unset.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: default_flush_interval(),
            top_resources: default_top_resources(),
            snapshot_path: None,
        }
    }
}

fn default_flush_interval() -> u64 {
    300
}
fn default_top_resources() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

impl Config {
    /// Configuration used when no file is given.
    pub fn minimal() -> Self {
        Self::default()
    }
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&content).with_context(|| "Failed to parse config file")?;

    // Relative corpus paths resolve against the config file's directory
    let config = match (&config.corpus.dir, path.parent()) {
        (Some(dir), Some(parent)) if dir.is_relative() => {
            let mut resolved = config.clone();
            resolved.corpus.dir = Some(parent.join(dir));
            resolved
        }
        _ => config,
    };

    validate(&config)?;
    Ok(config)
}

/// Parse configuration text without touching the filesystem.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

/// Check value ranges and referenced paths.
pub fn validate(config: &Config) -> Result<()> {
    let s = &config.search;
    let weights = [
        ("title_weight", s.title_weight),
        ("description_weight", s.description_weight),
        ("content_weight", s.content_weight),
        ("code_weight", s.code_weight),
    ];
    for (name, w) in weights {
        if !w.is_finite() || w < 0.0 {
            anyhow::bail!("search.{} must be a non-negative number", name);
        }
    }
    if weights.iter().all(|(_, w)| *w == 0.0) {
        anyhow::bail!("search weights must not all be zero");
    }
    if s.default_limit == 0 {
        anyhow::bail!("search.default_limit must be >= 1");
    }

    if config.analytics.top_resources == 0 {
        anyhow::bail!("analytics.top_resources must be >= 1");
    }

    if let Some(dir) = &config.corpus.dir {
        if !dir.is_dir() {
            anyhow::bail!("corpus.dir does not exist: {}", dir.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert!(cfg.corpus.dir.is_none());
        assert_eq!(cfg.search.default_limit, 10);
        assert_eq!(cfg.analytics.flush_interval_secs, 300);
        assert_eq!(cfg.server.bind, "127.0.0.1:7341");
        validate(&cfg).unwrap();
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let cfg = parse_config("[search]\ncode_weight = 0.1\n").unwrap();
        assert!((cfg.search.code_weight - 0.1).abs() < 1e-9);
        assert!((cfg.search.title_weight - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_negative_weight() {
        let cfg = parse_config("[search]\ntitle_weight = -1.0\n").unwrap();
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("title_weight"));
    }

    #[test]
    fn test_rejects_all_zero_weights() {
        let cfg = parse_config(
            "[search]\ntitle_weight = 0.0\ndescription_weight = 0.0\ncontent_weight = 0.0\ncode_weight = 0.0\n",
        )
        .unwrap();
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_rejects_missing_corpus_dir() {
        let cfg = parse_config("[corpus]\ndir = \"/definitely/not/here\"\n").unwrap();
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_load_resolves_relative_corpus_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("sections")).unwrap();
        let path = tmp.path().join("design.toml");
        std::fs::write(&path, "[corpus]\ndir = \"sections\"\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.corpus.dir.unwrap(), tmp.path().join("sections"));
    }
}
