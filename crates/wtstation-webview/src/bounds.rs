//! Where session surfaces go: the visible content region or the parking spot.

use wtstation_common::Rect;
use wtstation_config::schema::{LayoutConfig, SurfaceConfig};

/// Smallest width/height a visible region may report.
const MIN_EXTENT: f64 = 1.0;

/// Window size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSize {
    pub width: f64,
    pub height: f64,
}

impl WindowSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pure geometry for the content area left over by the chrome.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsCalculator {
    title_bar_height: f64,
    sidebar_expanded_width: f64,
    sidebar_collapsed_width: f64,
    sidebar_gap: f64,
    offscreen: Rect,
}

impl BoundsCalculator {
    pub fn new(layout: &LayoutConfig, surfaces: &SurfaceConfig) -> Self {
        Self {
            title_bar_height: layout.title_bar_height,
            sidebar_expanded_width: layout.sidebar_expanded_width,
            sidebar_collapsed_width: layout.sidebar_collapsed_width,
            sidebar_gap: layout.sidebar_gap,
            offscreen: Rect::new(surfaces.offscreen_x, surfaces.offscreen_y, 1.0, 1.0),
        }
    }

    pub fn sidebar_width(&self, collapsed: bool) -> f64 {
        if collapsed {
            self.sidebar_collapsed_width
        } else {
            self.sidebar_expanded_width
        }
    }

    /// The content area to the right of the sidebar and below the title bar.
    ///
    /// Width and height never drop below one pixel, whatever the window size.
    pub fn visible(&self, window: WindowSize, sidebar_collapsed: bool) -> Rect {
        let x = self.sidebar_width(sidebar_collapsed) + self.sidebar_gap;
        let y = self.title_bar_height;
        Rect::new(
            x,
            y,
            (window.width - x).max(MIN_EXTENT),
            (window.height - y).max(MIN_EXTENT),
        )
    }

    /// The fixed parking rectangle for inactive surfaces.
    pub fn offscreen(&self) -> Rect {
        self.offscreen
    }
}

impl Default for BoundsCalculator {
    fn default() -> Self {
        Self::new(&LayoutConfig::default(), &SurfaceConfig::default())
    }
}

/// Convert a logical `Rect` to a wry `Rect`.
pub fn to_wry_rect(rect: &Rect) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(rect.x, rect.y)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(rect.width, rect.height)),
    }
}
