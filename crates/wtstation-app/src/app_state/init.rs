//! Window creation, chrome webview and session core setup.

use std::rc::Rc;
use std::time::Duration;

use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use wtstation_common::Rect;
use wtstation_webview::{
    BoundsCalculator, ChromeView, ContentProvider, ServiceCatalog, SessionRegistry,
    VisibilityCoordinator, WindowCompositor, WindowSize, WrySurfaceFactory,
};

use super::core::{SessionCore, StationApp};
use super::types::CHROME_ASSETS_DIR;

// =============================================================================
// INITIALIZATION
// =============================================================================

impl StationApp {
    /// Create the window, the chrome and the session core.
    /// Returns `false` if initialization failed and the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let wc = &self.config.window;
        let attrs = WindowAttributes::default()
            .with_title(wc.title.clone())
            .with_decorations(wc.decorations)
            .with_inner_size(LogicalSize::new(wc.width, wc.height))
            .with_min_inner_size(LogicalSize::new(wc.min_width, wc.min_height));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Rc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };
        let size = window_size(&window);

        // The chrome is built first so session surfaces stack above it.
        let assets = wtstation_platform::assets_dir().join(CHROME_ASSETS_DIR);
        let content = ContentProvider::with_fallback(&assets);
        let chrome = match ChromeView::build(
            &*window,
            Rect::new(0.0, 0.0, size.width, size.height),
            content,
            self.config.surfaces.devtools,
        ) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("Failed to create chrome: {e}");
                return false;
            }
        };

        let partitions = match wtstation_platform::partitions_dir() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::error!("No partition directory: {e}");
                return false;
            }
        };

        self.core = Some(self.build_core(Rc::clone(&window), &partitions, size));
        self.chrome = Some(chrome);
        self.window = Some(window);

        self.schedule_initialize_views(Duration::from_millis(self.config.surfaces.init_delay_ms));
        tracing::info!(
            width = size.width,
            height = size.height,
            assets = %assets.display(),
            "Window and chrome initialized"
        );
        true
    }

    fn build_core(
        &self,
        window: Rc<Window>,
        partitions: &std::path::Path,
        size: WindowSize,
    ) -> SessionCore {
        let surfaces = &self.config.surfaces;
        let bounds = BoundsCalculator::new(&self.config.layout, surfaces);

        let factory = WrySurfaceFactory::new(window, surfaces, partitions);
        let surface_events = factory.events();
        let registry = SessionRegistry::new(
            Box::new(factory),
            ServiceCatalog::from_config(surfaces),
            bounds.offscreen(),
        );

        let mut coordinator = VisibilityCoordinator::new(bounds);
        coordinator.bind_compositor(Box::new(WindowCompositor::new()), size);

        SessionCore {
            registry,
            coordinator,
            surface_events,
        }
    }

    /// Re-layout the chrome and surfaces after the window changed size.
    pub(super) fn handle_resize(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let size = window_size(window);
        if size.width <= 0.0 || size.height <= 0.0 {
            return;
        }
        if let Some(chrome) = &self.chrome {
            chrome.set_bounds(Rect::new(0.0, 0.0, size.width, size.height));
        }
        if let Some(core) = &mut self.core {
            core.coordinator.set_window_size(&core.registry, size);
        }
    }
}

/// Inner size of the window in logical pixels.
fn window_size(window: &Window) -> WindowSize {
    let logical = window.inner_size().to_logical::<f64>(window.scale_factor());
    WindowSize::new(logical.width, logical.height)
}
