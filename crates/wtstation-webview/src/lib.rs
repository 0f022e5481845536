//! Session surfaces for WT Station.
//!
//! Provides:
//! - A session registry owning one persistent, isolated web surface per
//!   account session
//! - A visibility coordinator that keeps at most one surface in the content
//!   region and parks the rest off-screen
//! - Bounds math for the content region around the chrome
//! - A consistency monitor between the UI mode and the compositor
//! - The `wry` backend, the chrome webview and its IPC bridge

pub mod bounds;
pub mod chrome;
pub mod compositor;
pub mod content;
pub mod coordinator;
pub mod events;
pub mod ipc;
pub mod monitor;
pub mod registry;
pub mod services;
pub mod slot;
pub mod surface;
pub mod wry_backend;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use bounds::{BoundsCalculator, WindowSize};
pub use chrome::{ChromeEvent, ChromeView};
pub use compositor::WindowCompositor;
pub use content::ContentProvider;
pub use coordinator::VisibilityCoordinator;
pub use events::{PageLoadState, StatusChange, SurfaceEvent, SurfaceEventKind};
pub use ipc::{IpcMessage, IpcResponse};
pub use monitor::{ConsistencyMonitor, Verdict};
pub use registry::SessionRegistry;
pub use services::{ServiceCatalog, ServiceProfile};
pub use slot::SurfaceSlot;
pub use surface::{Compositor, Surface, SurfaceFactory, SurfaceId, SurfaceRef, SurfaceSpec};
pub use wry_backend::{EventSink, WrySurfaceFactory};
