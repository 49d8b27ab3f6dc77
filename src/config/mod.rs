//! Configuration module
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment overrides. The result is validated before any network or
//! database work starts.
//!
//! # Example
//!
//! ```no_run
//! use docs_discovery::config::resolve_config;
//!
//! let config = resolve_config(None).unwrap();
//! for source in &config.sources {
//!     println!("{} -> {}", source.source, source.sitemap_url);
//! }
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, FetcherConfig, OutputConfig, SourceConfig};

pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, resolve_config, DATABASE_PATH_ENV,
};
pub use validation::validate;
