//! Library behind the `cosmic` binary: records, stores, the pure projector
//! that turns fetched records into screens, and the CLI and TUI surfaces.

pub mod auth;
pub mod commands;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod projector;
pub mod store;
pub mod tui;
pub mod views;

pub use error::{Error, Result};
