//! Configuration schema types for WTStation.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod layout;
mod surfaces;
mod system;
mod window;

pub use layout::*;
pub use surfaces::*;
pub use system::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub window: WindowConfig,
    pub layout: LayoutConfig,
    pub surfaces: SurfaceConfig,
    pub consistency: ConsistencyConfig,
    pub logging: LoggingConfig,
}
