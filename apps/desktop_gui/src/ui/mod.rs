//! UI layer for desktop GUI: app shell, panes, banners, and keyboard shortcuts.

pub mod app;
pub mod shortcuts;

pub use app::{StartupConfig, TestMateApp};
