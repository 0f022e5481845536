//! Chrome geometry that bounds where embedded surfaces may appear.

use serde::{Deserialize, Serialize};

/// Fixed chrome dimensions, in logical pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Height of the custom title bar drawn by the chrome (valid range: 0-200).
    pub title_bar_height: f64,
    /// Sidebar width when expanded (valid range: 0-800).
    pub sidebar_expanded_width: f64,
    /// Sidebar width when collapsed (valid range: 0-800).
    pub sidebar_collapsed_width: f64,
    /// Extra horizontal gap between the sidebar and the content area (valid range: 0-20).
    pub sidebar_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            title_bar_height: 40.0,
            sidebar_expanded_width: 256.0,
            sidebar_collapsed_width: 80.0,
            sidebar_gap: 1.0,
        }
    }
}
