use std::fs;
use std::path::PathBuf;

use wtstation_common::PlatformError;

const APP_NAME: &str = "wtstation";

fn base(dir: Option<PathBuf>, what: &str) -> Result<PathBuf, PlatformError> {
    dir.map(|p| p.join(APP_NAME))
        .ok_or_else(|| PlatformError::PathError(format!("could not determine {what} directory")))
}

/// Returns the platform-specific configuration directory.
///
/// - macOS: `~/Library/Application Support/wtstation`
/// - Linux: `$XDG_CONFIG_HOME/wtstation` (defaults to `~/.config/wtstation`)
/// - Windows: `%APPDATA%\wtstation`
pub fn config_dir() -> Result<PathBuf, PlatformError> {
    base(dirs::config_dir(), "config")
}

/// Returns the platform-specific data directory. Session partitions and
/// the record store live here.
///
/// - Linux: `$XDG_DATA_HOME/wtstation` (defaults to `~/.local/share/wtstation`)
pub fn data_dir() -> Result<PathBuf, PlatformError> {
    base(dirs::data_dir(), "data")
}

/// Returns the path to the JSON record store.
pub fn store_file() -> Result<PathBuf, PlatformError> {
    Ok(data_dir()?.join("store.json"))
}

/// Returns the directory holding per-partition webview data.
pub fn partitions_dir() -> Result<PathBuf, PlatformError> {
    Ok(data_dir()?.join("partitions"))
}

/// Returns the path to the log directory.
pub fn log_dir() -> Result<PathBuf, PlatformError> {
    Ok(data_dir()?.join("logs"))
}

/// Returns the path to the crash report directory.
pub fn crash_report_dir() -> Result<PathBuf, PlatformError> {
    Ok(log_dir()?.join("crash-reports"))
}

/// Returns the bundled UI assets directory (next to the executable, or the
/// current directory during development).
pub fn assets_dir() -> PathBuf {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("assets")));
    match beside_exe {
        Some(dir) if dir.is_dir() => dir,
        _ => std::env::current_dir().unwrap_or_default().join("assets"),
    }
}

/// Creates every WTStation directory if it does not already exist.
pub fn ensure_dirs() -> Result<(), PlatformError> {
    let dirs = [
        config_dir()?,
        data_dir()?,
        partitions_dir()?,
        log_dir()?,
        crash_report_dir()?,
    ];
    for dir in dirs {
        fs::create_dir_all(&dir).map_err(|e| {
            PlatformError::PathError(format!("failed to create {}: {e}", dir.display()))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_ends_with_app_name() {
        if let Ok(path) = config_dir() {
            assert!(path.ends_with("wtstation"), "got: {path:?}");
        }
    }

    #[test]
    fn store_file_is_inside_data_dir() {
        if let (Ok(store), Ok(data)) = (store_file(), data_dir()) {
            assert!(store.starts_with(&data));
            assert_eq!(store.file_name().unwrap(), "store.json");
        }
    }

    #[test]
    fn crash_reports_nest_under_logs() {
        if let (Ok(crash), Ok(logs)) = (crash_report_dir(), log_dir()) {
            assert!(crash.starts_with(&logs));
            assert!(crash.ends_with("crash-reports"));
        }
    }

    #[test]
    fn assets_dir_is_named_assets() {
        assert!(assets_dir().ends_with("assets"));
    }
}
