//! Configuration loading for the migration runner.
//!
//! Settings come from an optional TOML file, overlaid with environment
//! variables prefixed with `MERLINN__` (nested keys are separated by `__`,
//! e.g. `MERLINN__DATABASE__URL` maps to `database.url`).

use std::path::Path;

use config::{Config, Environment, File};
use merlinn_db::DbConfig;
use serde::Deserialize;
use tracing::info;

use crate::error::MigrateError;

/// File looked up in the working directory when no path is given.
const DEFAULT_CONFIG_FILE: &str = "merlinn";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MigrateConfig {
    pub database: DbConfig,
}

/// Loads the configuration.
///
/// An explicit `path` must exist; the default `merlinn.*` file is optional.
pub fn load_config(path: Option<&Path>) -> Result<MigrateConfig, MigrateError> {
    let file = match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            File::from(path).required(true)
        }
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(Environment::with_prefix("MERLINN").separator("__"))
        .build()?
        .try_deserialize()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[database]\nurl = \"db.internal:8000\"\nnamespace = \"staging\""
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.database.url, "db.internal:8000");
        assert_eq!(config.database.namespace, "staging");
        assert_eq!(config.database.database, DbConfig::default().database);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        assert!(matches!(
            load_config(Some(&missing)),
            Err(MigrateError::Config(_))
        ));
    }
}
