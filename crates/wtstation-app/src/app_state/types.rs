//! Internal constants for the app state module.

use std::time::Duration;

/// How often to poll webview events (approx 60 Hz).
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Delay between a bulk session change and the `initialize_all_views`
/// that follows it.
pub(super) const VIEWS_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Subdirectory of the assets dir holding the chrome UI.
pub(super) const CHROME_ASSETS_DIR: &str = "chrome";

/// Event pushed to the chrome whenever a session's status changes.
pub(super) const STATUS_EVENT: &str = "session-status";
