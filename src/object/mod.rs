//! Managed REST objects
//!
//! An [`ApiObject`] pairs caller-owned data with the last server-reported
//! state of one REST resource, and drives its create/read/update/delete
//! lifecycle through a shared [`Transport`](crate::client::Transport).
//!
//! - [`api_object`] - The object state machine and its sync primitive
//! - [`id`] - Canonical id coercion and header-based id resolution
//! - [`paths`] - Path templates with `{id}` substitution

pub mod api_object;
pub mod id;
pub mod paths;

pub use api_object::ApiObject;
pub use id::{id_to_string, lookup_id, resolve_header_id};
pub use paths::PathTemplates;
