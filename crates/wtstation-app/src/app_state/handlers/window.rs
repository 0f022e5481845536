//! Host window controls and the renderer's layout signals.

use std::time::Instant;

use serde_json::{json, Value};
use wtstation_common::UiMode;

use super::no_window;
use crate::app_state::core::StationApp;
use crate::app_state::ipc_dispatch::HandlerResult;
use crate::app_state::payload::{bool_arg, parse};

impl StationApp {
    pub(in crate::app_state) fn handle_window_minimize(&self) -> HandlerResult {
        let window = self.window.as_ref().ok_or_else(no_window)?;
        window.set_minimized(true);
        Ok(Value::Null)
    }

    /// Toggle between maximized and restored.
    pub(in crate::app_state) fn handle_window_maximize(&self) -> HandlerResult {
        let window = self.window.as_ref().ok_or_else(no_window)?;
        let maximized = !window.is_maximized();
        window.set_maximized(maximized);
        Ok(Value::Bool(maximized))
    }

    pub(in crate::app_state) fn handle_window_close(&mut self) -> HandlerResult {
        tracing::info!("Close requested by the chrome");
        self.should_exit = true;
        Ok(Value::Null)
    }

    /// Begin a native window move from the chrome's title bar.
    pub(in crate::app_state) fn handle_window_start_drag(&self) -> HandlerResult {
        let window = self.window.as_ref().ok_or_else(no_window)?;
        window.drag_window().map_err(|e| e.to_string())?;
        Ok(Value::Null)
    }

    pub(in crate::app_state) fn handle_remove_all_views(&mut self) -> HandlerResult {
        let remaining = match &mut self.core {
            Some(core) => core
                .coordinator
                .remove_all_views_from_window(&core.registry),
            None => 0,
        };
        Ok(json!({ "remaining": remaining }))
    }

    /// Best-effort mode report from the UI. A mode that claims the content
    /// area hides every surface at once and schedules a re-verification.
    pub(in crate::app_state) fn handle_active_view_changed(
        &mut self,
        payload: &Value,
        now: Instant,
    ) -> HandlerResult {
        let mode = match payload {
            Value::Null => UiMode::Other,
            other => parse::<UiMode>(other)?,
        };
        tracing::info!(?mode, "Active view changed");

        if self.monitor.report_mode(mode, now) {
            if let Some(core) = &mut self.core {
                core.coordinator.hide_all_views(&core.registry);
            }
        }
        Ok(Value::Null)
    }

    pub(in crate::app_state) fn handle_sidebar_collapsed(&mut self, payload: &Value) -> HandlerResult {
        let collapsed = bool_arg(payload, "collapsed")?;
        if let Some(core) = &mut self.core {
            core.coordinator
                .set_sidebar_collapsed(&core.registry, collapsed);
        }
        Ok(Value::Null)
    }
}
