//! UI layer for the desktop app: app shell, screens, and backend worker.

pub mod app;

pub use app::{NilScopeApp, StartupConfig};
