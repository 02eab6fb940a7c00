//! # rca-config
//!
//! Layered configuration loading for root-cause context resolution using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RCA_*` prefix, `__` as separator)
//! 2. Project-level `.rootcause/config.toml`
//! 3. User-level `~/.config/rootcause/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `RCA_RESOLVER__TIMEZONE` -> `resolver.timezone`,
//! `RCA_SESSION__OWNER` -> `session.owner`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use rca_config::RcaConfig;
//!
//! let config = RcaConfig::load_with_dotenv().expect("config");
//! let zone = config.resolver.zone().expect("valid timezone");
//! println!("{zone:?}, compare mode {}", config.resolver.compare_mode);
//! ```

mod error;
mod records;
mod resolver;
mod session;

pub use error::ConfigError;
pub use records::RecordsConfig;
pub use resolver::{ResolverConfig, Zone};
pub use session::SessionConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RcaConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub records: RecordsConfig,
}

impl RcaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or a field has
    /// the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".rootcause/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("RCA_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rootcause").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) looking for a `.env`
    /// file, then falls back to the current directory. Silently does nothing
    /// if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
