//! Client profile
//!
//! Describes how a particular API communicates identity and state back to
//! the caller. Built once, then shared read-only by every object through an
//! `Arc`.

use serde::{Deserialize, Deserializer, Serialize};

fn default_id_attribute() -> String {
    "id".to_string()
}

/// Empty strings in config files mean "not configured"
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Identity and state-sync behavior of one API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientProfile {
    /// Field that holds the object's id in body data
    #[serde(default = "default_id_attribute")]
    pub id_attribute: String,
    /// Response header carrying the id after a POST
    #[serde(default, deserialize_with = "empty_as_none")]
    pub id_header: Option<String>,
    /// The id header holds a URL whose last path segment is the id
    #[serde(default)]
    pub id_header_is_url: bool,
    /// PUT (and POST) responses contain the full object
    #[serde(default)]
    pub write_returns_object: bool,
    /// POST responses contain the full object
    #[serde(default)]
    pub create_returns_object: bool,
    /// Server-owned fields mirrored into user data after every sync
    #[serde(default)]
    pub copy_keys: Vec<String>,
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self {
            id_attribute: default_id_attribute(),
            id_header: None,
            id_header_is_url: false,
            write_returns_object: false,
            create_returns_object: false,
            copy_keys: Vec::new(),
        }
    }
}

impl ClientProfile {
    pub fn new(id_attribute: &str) -> Self {
        Self {
            id_attribute: id_attribute.to_string(),
            ..Self::default()
        }
    }

    pub fn with_id_header(mut self, header: &str, is_url: bool) -> Self {
        self.id_header = Some(header.trim().to_string()).filter(|h| !h.is_empty());
        self.id_header_is_url = is_url;
        self
    }

    pub fn with_write_returns_object(mut self, enabled: bool) -> Self {
        self.write_returns_object = enabled;
        self
    }

    pub fn with_create_returns_object(mut self, enabled: bool) -> Self {
        self.create_returns_object = enabled;
        self
    }

    pub fn with_copy_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.copy_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// The id header name, if one is configured
    pub fn id_header(&self) -> Option<&str> {
        self.id_header
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }

    /// A POST response body is treated as the full object
    pub fn syncs_on_create(&self) -> bool {
        self.write_returns_object || self.create_returns_object
    }

    /// Whether an id can still be learned after construction
    pub fn has_fallback_identity(&self) -> bool {
        self.syncs_on_create() || self.id_header().is_some()
    }
}
