//! `retail-dashboard` library crate.
//!
//! The binary is a thin eframe wrapper around this library, so the data
//! pipeline (load, filter, aggregate, export) is testable without a window.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod format;
pub mod state;
pub mod ui;
