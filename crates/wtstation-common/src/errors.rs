use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("path error: {0}")]
    PathError(String),

    #[error("not supported: {0}")]
    NotSupported(String),
}

/// Failures raised while creating or manipulating an embedded surface.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface creation failed: {0}")]
    Creation(String),

    #[error("surface for session {0} was destroyed")]
    Destroyed(String),

    #[error("compositor error: {0}")]
    Compositor(String),

    #[error("isolation key {key} is already bound to session {owner}")]
    IsolationKeyInUse { key: String, owner: String },

    #[error("script error: {0}")]
    Script(String),

    #[error("no host window")]
    NoWindow,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("constraint violation: {0}")]
    Constraint(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ValidationError("title_bar_height out of range".into());
        assert_eq!(
            err.to_string(),
            "config validation error: title_bar_height out of range"
        );
    }

    #[test]
    fn surface_error_display() {
        let err = SurfaceError::Destroyed("abc".into());
        assert_eq!(err.to_string(), "surface for session abc was destroyed");

        let err = SurfaceError::IsolationKeyInUse {
            key: "persist:wa-1".into(),
            owner: "s1".into(),
        };
        assert_eq!(
            err.to_string(),
            "isolation key persist:wa-1 is already bound to session s1"
        );

        assert_eq!(SurfaceError::NoWindow.to_string(), "no host window");
    }

    #[test]
    fn store_error_not_found_display() {
        let err = StoreError::NotFound {
            kind: "workspace",
            id: "w1".into(),
        };
        assert_eq!(err.to_string(), "workspace not found: w1");
    }

    #[test]
    fn station_error_from_surface() {
        let err: StationError = SurfaceError::Creation("no display".into()).into();
        assert!(matches!(err, StationError::Surface(_)));
        assert!(err.to_string().contains("no display"));
    }

    #[test]
    fn station_error_from_store() {
        let err: StationError = StoreError::Constraint("duplicate key".into()).into();
        assert!(matches!(err, StationError::Store(_)));
        assert_eq!(err.to_string(), "constraint violation: duplicate key");
    }

    #[test]
    fn station_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: StationError = io_err.into();
        assert!(matches!(err, StationError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }
}
