//! Outbound adapters implementing domain ports.

pub mod http;
pub mod token_file;

pub use http::ApiGateway;
pub use token_file::{FileTokenStore, TOKEN_FILE_NAME};
