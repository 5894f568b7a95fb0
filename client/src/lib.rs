//! Client core for the clinic appointment API.
//!
//! Sessions, the appointment lifecycle, role-based navigation, and the
//! screen controllers that turn every outcome into a toast. The `clinica`
//! binary drives the controllers from the command line.

pub mod app;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use app::{AppState, StartupError};
pub use config::ClientSettings;
