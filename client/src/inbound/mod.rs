//! Inbound adapters: screen controllers and the command-line front-end.
//!
//! Controllers own the state of one screen in a [`ViewSlot`] and report
//! every outcome as a [`Toast`]. The CLI drives them the way the mobile
//! screens would.

pub mod cli;
pub mod controllers;
mod toast;
mod view;

pub use toast::{Toast, ToastKind};
pub use view::{ViewSlot, ViewUpdater};
