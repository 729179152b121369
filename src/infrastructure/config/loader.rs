use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::{Config, StoreBackend};

/// Project-local configuration directory
pub const CONFIG_DIR: &str = ".ragline";

/// Prefix for environment overrides, e.g. `RAGLINE_STORE__BACKEND=postgres`
pub const ENV_PREFIX: &str = "RAGLINE_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid chunking configuration: {0}")]
    InvalidChunking(String),

    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid similarity_threshold: {0}. Must be between -1.0 and 1.0")]
    InvalidThreshold(f32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Snapshot path cannot be empty")]
    EmptySnapshotPath,

    #[error("store.postgres.url is required when the postgres backend is selected")]
    MissingPostgresUrl,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error(
        "Embedding dimension ({embedding}) does not match store.postgres.dimension ({store})"
    )]
    DimensionMismatch { embedding: usize, store: usize },

    #[error("Invalid embedding dimension: {0}. Must be at least 1")]
    InvalidDimension(usize),

    #[error("Invalid max_batch_size: {0}. Must be at least 1")]
    InvalidBatchSize(usize),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .ragline/config.yaml (project config)
    /// 3. .ragline/local.yaml (project local overrides, optional)
    /// 4. Environment variables (RAGLINE_* prefix, `__` separates nested keys)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("config.yaml")))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring environment
    /// overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        anyhow::ensure!(path.exists(), "Config file {} not found", path.display());

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        config
            .chunking
            .validate()
            .map_err(|e| ConfigError::InvalidChunking(e.to_string()))?;

        if config.retrieval.top_k == 0 {
            return Err(ConfigError::InvalidTopK(config.retrieval.top_k));
        }

        if let Some(threshold) = config.retrieval.similarity_threshold {
            if !(-1.0..=1.0).contains(&threshold) {
                return Err(ConfigError::InvalidThreshold(threshold));
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        if config.embedding.dimension == 0 {
            return Err(ConfigError::InvalidDimension(config.embedding.dimension));
        }

        if config.embedding.max_batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(config.embedding.max_batch_size));
        }

        if config.embedding.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "embedding.model cannot be empty".to_string(),
            ));
        }

        match config.store.backend {
            StoreBackend::File => {
                if config.store.file.snapshot_path.as_os_str().is_empty() {
                    return Err(ConfigError::EmptySnapshotPath);
                }
            }
            StoreBackend::Postgres => {
                let postgres = &config.store.postgres;
                if postgres.url.as_deref().is_none_or(|url| url.trim().is_empty()) {
                    return Err(ConfigError::MissingPostgresUrl);
                }
                if postgres.max_connections == 0 {
                    return Err(ConfigError::InvalidMaxConnections(postgres.max_connections));
                }
                if postgres.dimension != config.embedding.dimension {
                    return Err(ConfigError::DimensionMismatch {
                        embedding: config.embedding.dimension,
                        store: postgres.dimension,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::EmbeddingProviderKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "{contents}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chunking.chunk_size, 800);
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Hashing);
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
chunking:
  chunk_size: 256
  overlap: 32
  keep_separator: false
store:
  backend: postgres
  postgres:
    url: postgres://localhost/rag
    dimension: 1536
embedding:
  provider: openai
  dimension: 1536
retrieval:
  top_k: 8
  similarity_threshold: 0.25
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.chunking.chunk_size, 256);
        assert_eq!(config.chunking.overlap, 32);
        assert_eq!(config.chunking.min_chunk_size_chars, 5);
        assert!(!config.chunking.keep_separator);
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert_eq!(config.store.postgres.table, "vector_store");
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Openai);
        assert_eq!(config.retrieval.top_k, 8);
        assert_eq!(config.retrieval.similarity_threshold, Some(0.25));
        assert_eq!(config.logging.level, "debug");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_bad_chunking() {
        let mut config = Config::default();
        config.chunking.overlap = config.chunking.chunk_size;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidChunking(_))
        ));
    }

    #[test]
    fn test_validate_retrieval() {
        let mut config = Config::default();
        config.retrieval.top_k = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTopK(0))
        ));

        let mut config = Config::default();
        config.retrieval.similarity_threshold = Some(1.5);
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_validate_postgres_backend() {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Postgres;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::MissingPostgresUrl)
        ));

        config.store.postgres.url = Some("postgres://localhost/rag".to_string());
        config.store.postgres.dimension = 1536;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::DimensionMismatch {
                embedding: 384,
                store: 1536
            })
        ));

        config.embedding.dimension = 1536;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_load_from_missing_file() {
        assert!(ConfigLoader::load_from_file("/nonexistent/ragline.yaml").is_err());
    }

    #[test]
    fn test_hierarchical_merging() {
        let base_file = yaml_file("retrieval:\n  top_k: 6\nlogging:\n  level: info\n  format: json\n");
        let override_file = yaml_file("retrieval:\n  top_k: 9\nlogging:\n  level: debug\n");

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.retrieval.top_k, 9, "Override should win");
        assert_eq!(
            config.logging.level, "debug",
            "Override should win for nested fields"
        );
        assert_eq!(
            config.logging.format,
            crate::domain::models::LogFormat::Json,
            "Base value should persist when not overridden"
        );
    }

    #[test]
    fn test_env_override() {
        let file = yaml_file("retrieval:\n  top_k: 6\n");

        temp_env::with_vars(
            [
                ("RAGLINE_RETRIEVAL__TOP_K", Some("11")),
                ("RAGLINE_CHUNKING__CHUNK_SIZE", Some("300")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.retrieval.top_k, 11);
                assert_eq!(config.chunking.chunk_size, 300);
                assert_eq!(config.chunking.overlap, 100);
            },
        );
    }
}
