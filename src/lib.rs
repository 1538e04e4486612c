//! restobj
//!
//! Treat an arbitrary REST endpoint as a managed object with
//! create/read/update/delete semantics, whatever convention the API uses to
//! report an object's id: in the body, in a response header, as the last
//! segment of a URL in a header, or not at all.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use restobj::client::{ApiClient, ClientProfile, TransportConfig};
//! use restobj::object::{ApiObject, PathTemplates};
//!
//! async fn example() -> restobj::Result<()> {
//!     let client = Arc::new(ApiClient::new(TransportConfig::new("https://api.example.com"))?);
//!     let profile = Arc::new(ClientProfile::default().with_id_header("Location", true));
//!
//!     let mut widget = ApiObject::new(
//!         client,
//!         profile,
//!         PathTemplates::for_collection("/widgets"),
//!         None,
//!         Some(r#"{"name": "gizmo"}"#),
//!     )?;
//!     widget.create().await?;
//!     println!("created widget {:?}", widget.id());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod object;

pub use client::{ApiClient, ClientProfile, Transport, TransportConfig};
pub use config::Config;
pub use error::{Error, IdentityError, Result, TransportError};
pub use object::{ApiObject, PathTemplates};
