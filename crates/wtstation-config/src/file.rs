//! Reading, creating and writing `config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use wtstation_common::ConfigError;

use crate::schema::StationConfig;
use crate::template::default_config_toml;
use crate::validation;

/// `<platform config dir>/wtstation/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("wtstation").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Parse the file at `path`.
///
/// Sections holding out-of-range values are reset to their defaults and
/// each problem is logged; the rest of the file still applies.
pub fn load_from_path(path: &Path) -> Result<StationConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(io_error("read", path, e)),
    };

    let mut config: StationConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    for problem in validation::repair(&mut config) {
        warn!(path = %path.display(), "{problem}; using section defaults");
    }

    info!(path = %path.display(), "Config loaded");
    Ok(config)
}

/// Load `path`, writing the commented default file first if it is missing.
pub fn load_or_create(path: &Path) -> Result<StationConfig, ConfigError> {
    if !path.exists() {
        write_atomically(path, default_config_toml())?;
        info!(path = %path.display(), "Default config written");
        return Ok(StationConfig::default());
    }
    load_from_path(path)
}

fn write_atomically(path: &Path, contents: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create", parent, e))?;
    }

    let tmp = path.with_extension("toml.tmp");
    fs::write(&tmp, contents).map_err(|e| io_error("write", &tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        // Cross-volume renames fail on Windows.
        warn!(error = %e, "Atomic config rename failed, writing in place");
        fs::write(path, contents).map_err(|e| io_error("write", path, e))?;
        let _ = fs::remove_file(&tmp);
    }
    Ok(())
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::ParseError(format!("{action} {}: {e}", path.display()))
}
