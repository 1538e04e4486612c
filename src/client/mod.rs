//! REST API client
//!
//! This module provides the transport layer objects are managed through,
//! plus the shared profile describing how an API reports identity.
//!
//! # Module Structure
//!
//! - [`transport`] - The `Transport` contract, methods, headers and responses
//! - [`http`] - reqwest-backed `ApiClient` with timeout, retries and auth
//! - [`profile`] - `ClientProfile` id-resolution and sync settings
//!
//! # Example
//!
//! ```ignore
//! use restobj::client::{ApiClient, Method, Transport, TransportConfig};
//!
//! async fn example() -> restobj::Result<()> {
//!     let client = ApiClient::new(TransportConfig::new("https://api.example.com"))?;
//!     let response = client.send(Method::Get, "/widgets/42", None).await?;
//!     println!("{}", response.body);
//!     Ok(())
//! }
//! ```

pub mod http;
#[cfg(test)]
pub(crate) mod mock;
pub mod profile;
pub mod transport;

pub use http::{join_url, ApiClient, TransportConfig};
pub use profile::ClientProfile;
pub use transport::{Headers, Method, Response, Transport};
