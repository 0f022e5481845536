//! WTStation configuration.
//!
//! TOML configuration for the host window, chrome layout, embedded
//! surfaces, and the consistency check. Every section uses serde defaults
//! so partial configs work out of the box.
//!
//! ```rust,no_run
//! let config = wtstation_config::load_config(None).expect("config");
//! println!("{}", config.window.title);
//! ```

mod file;
pub mod schema;
mod template;
pub mod validation;

pub use file::{default_config_path, load_from_path, load_or_create};
pub use schema::{StationConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use wtstation_common::ConfigError;

/// Load `path` when given. Otherwise use the platform default location,
/// creating a documented default file on first run.
pub fn load_config(path: Option<&Path>) -> Result<StationConfig, ConfigError> {
    match path {
        Some(p) => load_from_path(p),
        None => load_or_create(&default_config_path()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn default_template_parses_to_defaults() {
        let config: StationConfig = toml::from_str(template::default_config_toml()).unwrap();
        assert_eq!(config.window.width, StationConfig::default().window.width);
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }
}
