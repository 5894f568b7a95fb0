//! Clinic API outbound adapter.
//!
//! One reqwest-backed [`ApiGateway`] implements every gateway port; each
//! sibling module holds the endpoints of one port.

mod auth;
mod citas;
mod dto;
mod gateway;
mod notifications;
mod records;

pub use gateway::ApiGateway;
