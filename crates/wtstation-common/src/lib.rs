pub mod directory;
pub mod errors;
pub mod id;
pub mod types;

pub use directory::SessionDirectory;
pub use errors::{ConfigError, PlatformError, StationError, StoreError, SurfaceError};
pub use id::{new_id, now_millis, SessionId, WorkspaceId};
pub use types::{
    ChatLabel, Label, Rect, Session, SessionStatus, Template, UiMode, Workspace, WorkspaceType,
};

pub type Result<T> = std::result::Result<T, StationError>;
