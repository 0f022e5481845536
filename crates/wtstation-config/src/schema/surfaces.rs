//! Embedded surface configuration: user agent, parking spot, service URLs.

use serde::{Deserialize, Serialize};

/// Desktop Chrome user agent; the hosted services reject unknown browsers.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub user_agent: String,
    /// Enable devtools on session surfaces (always on in debug builds).
    pub devtools: bool,
    /// Off-screen parking position for inactive surfaces.
    pub offscreen_x: f64,
    pub offscreen_y: f64,
    /// Delay between the window becoming ready and the first
    /// `initialize_all_views` pass (valid range: 0-10000).
    pub init_delay_ms: u64,
    pub whatsapp_url: String,
    pub telegram_url: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.into(),
            devtools: cfg!(debug_assertions),
            offscreen_x: -10000.0,
            offscreen_y: -10000.0,
            init_delay_ms: 500,
            whatsapp_url: "https://web.whatsapp.com".into(),
            telegram_url: "https://web.telegram.org".into(),
        }
    }
}
