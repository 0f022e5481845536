//! Host window configuration types.

use serde::{Deserialize, Serialize};

/// Host window size and title.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    /// Draw native decorations instead of relying on the chrome's title bar.
    pub decorations: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "WTStation".into(),
            width: 1400,
            height: 900,
            min_width: 800,
            min_height: 600,
            decorations: false,
        }
    }
}
