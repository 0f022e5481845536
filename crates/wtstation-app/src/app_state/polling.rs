//! Per-tick work: webview events, deferred view initialization, QR probes,
//! status pushes and the consistency check.

use std::time::Instant;

use winit::event_loop::{ActiveEventLoop, ControlFlow};

use wtstation_common::{StoreError, UiMode};
use wtstation_webview::monitor::evaluate;
use wtstation_webview::{wry_backend, ChromeEvent, SurfaceEventKind, Verdict};

use super::core::StationApp;
use super::types::{POLL_INTERVAL, STATUS_EVENT};

impl StationApp {
    /// Run polling and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll_chrome_events(now);
            self.poll_surface_events(now);
            self.poll_pending_views(now);
            self.poll_consistency(now);
            self.push_status_changes();
        }

        if self.should_exit {
            self.shutdown();
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }

    fn poll_chrome_events(&mut self, now: Instant) {
        let events = match &self.chrome {
            Some(chrome) => chrome.drain_events(),
            None => return,
        };
        for event in events {
            match event {
                ChromeEvent::Ipc(body) => self.handle_ipc_message(&body, now),
                ChromeEvent::ActiveView(answer) => self.check_reported_mode(answer),
                ChromeEvent::ExternalLink(url) => open_in_browser(&url),
                ChromeEvent::PageLoad(state) => {
                    tracing::debug!(?state, "Chrome page load");
                }
            }
        }
    }

    fn poll_surface_events(&mut self, now: Instant) {
        let Some(core) = &mut self.core else {
            return;
        };
        for event in wry_backend::drain(&core.surface_events) {
            match event.kind {
                SurfaceEventKind::ExternalLink(url) => open_in_browser(&url),
                _ => core.registry.handle_event(event, now),
            }
        }
        core.registry.poll_probes(now);
    }

    fn poll_pending_views(&mut self, now: Instant) {
        if !self.init_views_at.is_some_and(|at| at <= now) {
            return;
        }
        self.init_views_at = None;
        if let Some(core) = &mut self.core {
            core.coordinator
                .initialize_all_views(&mut core.registry, &self.store);
        }
    }

    /// The settings recheck plus the periodic mode query. Both are no-ops
    /// while nothing is attached.
    pub(super) fn poll_consistency(&mut self, now: Instant) {
        let Some(core) = &mut self.core else {
            return;
        };

        if self.monitor.take_recheck(now) {
            let attached = core.coordinator.attached_count();
            if attached > 0 {
                tracing::warn!(attached, "Views still attached after settings opened; hiding again");
                core.coordinator.hide_all_views(&core.registry);
            }
        }

        if !self.monitor.due(now) || core.coordinator.attached_count() == 0 {
            return;
        }
        // The answer comes back as ChromeEvent::ActiveView.
        if let Some(chrome) = &self.chrome {
            self.monitor.begin_query();
            chrome.query_active_view();
        }
    }

    /// Judge the chrome's answer to a mode query against the compositor.
    pub(super) fn check_reported_mode(&mut self, answer: Option<UiMode>) {
        let Some(mode) = self.monitor.accept_answer(answer) else {
            return;
        };
        let Some(core) = &mut self.core else {
            return;
        };

        if let Verdict::Violation { attached } = evaluate(mode, core.coordinator.attached_count()) {
            tracing::warn!(
                attached,
                ?mode,
                "Consistency violation: views attached while content area is claimed"
            );
            let left = core
                .coordinator
                .remove_all_views_from_window(&core.registry);
            tracing::info!(left, "Consistency violation corrected");
        }
    }

    /// Persist status transitions and forward them to the chrome.
    fn push_status_changes(&mut self) {
        let changes = match &mut self.core {
            Some(core) => core.registry.drain_changes(),
            None => return,
        };
        for change in changes {
            match self.store.set_session_status(
                &change.session_id,
                change.status,
                change.qr_code.clone(),
            ) {
                Ok(()) | Err(StoreError::NotFound { .. }) => {}
                Err(e) => {
                    tracing::warn!(session_id = %change.session_id, error = %e, "Failed to persist status");
                }
            }
            match serde_json::to_value(&change) {
                Ok(payload) => self.notify_chrome(STATUS_EVENT, &payload),
                Err(e) => tracing::warn!(error = %e, "Failed to serialize status change"),
            }
        }
    }
}

fn open_in_browser(url: &str) {
    if !wtstation_platform::is_openable(url) {
        tracing::warn!(url = %url, "Refusing to open link");
        return;
    }
    if let Err(e) = wtstation_platform::open_external(url) {
        tracing::warn!(url = %url, error = %e, "Failed to open link");
    }
}
