//! Domain ports for the hexagonal boundary.
//!
//! Every clinic API call goes through one of the gateway traits below, and
//! session persistence goes through [`TokenStore`]. Services depend on these
//! traits only; adapters live in `crate::outbound`.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_gateway;
mod citas_gateway;
mod gateway_error;
mod notifications_gateway;
mod records_gateway;
mod token_store;

pub use auth_gateway::AuthGateway;
#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use citas_gateway::CitasGateway;
#[cfg(test)]
pub use citas_gateway::MockCitasGateway;
pub use gateway_error::{GatewayError, or_empty};
#[cfg(test)]
pub use notifications_gateway::MockNotificationsGateway;
pub use notifications_gateway::NotificationsGateway;
#[cfg(test)]
pub use records_gateway::MockRecordsGateway;
pub use records_gateway::RecordsGateway;
#[cfg(test)]
pub use token_store::MockTokenStore;
pub use token_store::{InMemoryTokenStore, TokenStore, TokenStoreError};
