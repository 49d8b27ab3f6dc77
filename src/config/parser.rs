use crate::classify::SourceId;
use crate::config::types::{Config, SourceConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable overriding the database path
pub const DATABASE_PATH_ENV: &str = "DISCOVERY_DATABASE_PATH";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use docs_discovery::config::load_config;
///
/// let config = load_config(Path::new("discovery.toml")).unwrap();
/// println!("Sources: {}", config.sources.len());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Builds the effective configuration for a run
///
/// Starts from the file at `path` (or the defaults when `None`), applies the
/// process environment overrides and validates the result.
pub fn resolve_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    validate(&config)?;

    Ok(config)
}

/// Applies sitemap URL and database path overrides
///
/// `lookup` resolves an environment variable name to its value. A sitemap
/// override for a source that is not configured adds that source.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for source in SourceId::ALL {
        let Some(url) = lookup(source.sitemap_env_var()) else {
            continue;
        };

        tracing::debug!("{} overrides sitemap URL for {}", source.sitemap_env_var(), source);

        match config
            .sources
            .iter_mut()
            .find(|entry| entry.source == source.to_db_string())
        {
            Some(entry) => entry.sitemap_url = url,
            None => config
                .sources
                .push(SourceConfig::new(source.to_db_string(), url)),
        }
    }

    if let Some(path) = lookup(DATABASE_PATH_ENV) {
        config.output.database_path = path;
    }
}

/// Computes a SHA-256 fingerprint of the effective configuration
///
/// Only settings that influence what a run discovers are hashed: the fetcher
/// identity and the ordered source list.
pub fn compute_config_hash(config: &Config) -> String {
    let mut hasher = Sha256::new();
    hasher.update(config.fetcher.user_agent.as_bytes());
    hasher.update(config.fetcher.timeout_secs.to_le_bytes());
    for entry in &config.sources {
        hasher.update(b"\0");
        hasher.update(entry.source.as_bytes());
        hasher.update(b"=");
        hasher.update(entry.sitemap_url.as_bytes());
    }
    hex::encode(hasher.finalize())
}
