//! Configuration loading for topic-atlas.
//!
//! Layered config: defaults -> config file -> explicit file -> env vars.
//! The default config file lives at ~/.config/topic-atlas/config.{toml,json,yaml}.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::TopicError;

/// Which set of sources enrichment joins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentVariant {
    /// Topics, authors, alt counts, strict and loose aggregations, locations,
    /// related topics and events
    #[default]
    Full,
    /// Topics, authors, alt counts, strict and loose aggregations only
    Basic,
}

impl EnrichmentVariant {
    /// Number of sources joined by this variant.
    pub fn source_count(&self) -> usize {
        match self {
            EnrichmentVariant::Full => 8,
            EnrichmentVariant::Basic => 5,
        }
    }
}

/// How links sharing the same (source, target) pair are collapsed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LinkDedupPolicy {
    /// Keep every emitted link, including id- and name-derived duplicates
    #[default]
    KeepAll,
    /// Keep the first link emitted for a pair (id-derived links come first)
    KeepFirst,
    /// Keep one link per pair at the position of the first, with the
    /// largest weight seen
    MaxWeight,
}

/// Enrichment settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichmentSettings {
    #[serde(default)]
    pub variant: EnrichmentVariant,
}

/// Graph construction settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSettings {
    #[serde(default)]
    pub link_dedup: LinkDedupPolicy,
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub enrichment: EnrichmentSettings,

    #[serde(default)]
    pub graph: GraphSettings,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            enrichment: EnrichmentSettings::default(),
            graph: GraphSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/topic-atlas/config)
    /// 3. Caller-specified config file (optional)
    /// 4. Environment variables (TOPICS_*)
    pub fn load(config_path: Option<&str>) -> Result<Self, TopicError> {
        let config_dir = ProjectDirs::from("", "", "topic-atlas")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("log_level", default_log_level())
            .map_err(|e| TopicError::Config(e.to_string()))?
            .set_default("enrichment.variant", "full")
            .map_err(|e| TopicError::Config(e.to_string()))?
            .set_default("graph.link_dedup", "keep_all")
            .map_err(|e| TopicError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // TOPICS_LOG_LEVEL, TOPICS_ENRICHMENT__VARIANT, TOPICS_GRAPH__LINK_DEDUP
        builder = builder.add_source(
            Environment::with_prefix("TOPICS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| TopicError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| TopicError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), TopicError> {
        if self.log_level.trim().is_empty() {
            return Err(TopicError::Config("log_level must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.enrichment.variant, EnrichmentVariant::Full);
        assert_eq!(settings.graph.link_dedup, LinkDedupPolicy::KeepAll);
    }

    #[test]
    fn test_load_with_defaults() {
        let settings = Settings::load(None).unwrap();
        assert!(!settings.log_level.is_empty());
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("atlas.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "log_level = \"debug\"\n[enrichment]\nvariant = \"basic\"\n[graph]\nlink_dedup = \"max_weight\""
        )
        .unwrap();

        let settings = Settings::load(Some(&path.to_string_lossy())).unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.enrichment.variant, EnrichmentVariant::Basic);
        assert_eq!(settings.graph.link_dedup, LinkDedupPolicy::MaxWeight);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = Settings::load(Some("/nonexistent/topic-atlas/config.toml"));
        assert!(matches!(result, Err(TopicError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_log_level() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());
        settings.log_level = "  ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_variant_source_count() {
        assert_eq!(EnrichmentVariant::Full.source_count(), 8);
        assert_eq!(EnrichmentVariant::Basic.source_count(), 5);
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"keep_all\""));
        let decoded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.graph.link_dedup, LinkDedupPolicy::KeepAll);
    }
}
