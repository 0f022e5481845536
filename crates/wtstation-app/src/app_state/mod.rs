//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns the host window, the chrome webview, the record store
//! and the session core (registry plus visibility coordinator).

mod core;
mod event_handler;
mod handlers;
mod init;
mod ipc_dispatch;
mod payload;
mod polling;
mod shutdown;
mod types;


pub use core::StationApp;
