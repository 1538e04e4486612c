//! API Object
//!
//! State machine for one managed REST object. Holds what the caller wants
//! the object to look like (`data`) next to what the server last reported
//! (`api_data`), and keeps the object's id consistent across both.

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use super::id::{lookup_id, resolve_header_id};
use super::paths::{render, PathTemplates};
use crate::client::profile::ClientProfile;
use crate::client::transport::{Headers, Method, Transport};
use crate::error::{Error, IdentityError, Result};

/// Parse a body that must be a JSON object
fn parse_object(json: &str) -> Result<Map<String, Value>> {
    Ok(serde_json::from_str(json)?)
}

pub struct ApiObject {
    transport: Arc<dyn Transport>,
    profile: Arc<ClientProfile>,
    paths: PathTemplates,
    id: Option<String>,
    /// Data as managed by the caller
    data: Map<String, Value>,
    /// Data as reported by the API
    api_data: Map<String, Value>,
}

impl ApiObject {
    /// Build an object to manage through `transport`.
    ///
    /// `data` of `None` starts from an empty object; `Some("")` is rejected.
    /// Without an explicit `id`, the profile's `id_attribute` is looked up in
    /// `data`. When that misses too, construction only succeeds if the
    /// profile can learn the id from a later POST response.
    pub fn new(
        transport: Arc<dyn Transport>,
        profile: Arc<ClientProfile>,
        paths: PathTemplates,
        id: Option<&str>,
        data: Option<&str>,
    ) -> Result<Self> {
        paths.validate()?;

        let data = match data {
            Some(json) if json.trim().is_empty() => {
                return Err(Error::config("No data passed to object constructor"));
            }
            Some(json) => {
                tracing::debug!("Parsing object data: '{}'", json);
                parse_object(json)?
            }
            None => Map::new(),
        };

        let mut obj = Self {
            transport,
            profile,
            paths,
            id: id.filter(|id| !id.is_empty()).map(str::to_string),
            data,
            api_data: Map::new(),
        };

        // Opportunistically take the id from the data; otherwise it must come
        // from a POST response later on.
        if obj.id.is_none() {
            obj.id = lookup_id(&obj.data, &obj.profile.id_attribute);
            if obj.id.is_none() && !obj.profile.has_fallback_identity() {
                return Err(IdentityError::NoIdentityChannel {
                    attribute: obj.profile.id_attribute.clone(),
                }
                .into());
            }
        }

        tracing::debug!("Constructed object: {:?}", obj);
        Ok(obj)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }

    /// Replace the caller-owned data wholesale. The id is left alone.
    pub fn set_data(&mut self, json: &str) -> Result<()> {
        self.data = parse_object(json)?;
        Ok(())
    }

    pub fn api_data(&self) -> &Map<String, Value> {
        &self.api_data
    }

    pub fn paths(&self) -> &PathTemplates {
        &self.paths
    }

    pub fn profile(&self) -> &ClientProfile {
        &self.profile
    }

    fn require_id(&self, operation: &'static str) -> Result<&str> {
        self.id
            .as_deref()
            .ok_or_else(|| IdentityError::NotSet { operation }.into())
    }

    /// Merge a response body into local state.
    ///
    /// A non-blank body replaces `api_data` wholesale. An unset id is taken
    /// from the new server data, and a miss there aborts the sync. Nothing
    /// is mutated unless the whole merge succeeds.
    pub fn sync(&mut self, body: &str) -> Result<()> {
        tracing::debug!("Updating object state to '{}'", body);

        let api_data = if body.trim().is_empty() {
            self.api_data.clone()
        } else {
            parse_object(body)?
        };

        let resolved = match &self.id {
            Some(id) => {
                tracing::debug!("Not updating id. It is already set to '{}'", id);
                None
            }
            None => {
                let attribute = &self.profile.id_attribute;
                let Some(id) = lookup_id(&api_data, attribute) else {
                    return Err(IdentityError::MissingAttribute {
                        attribute: attribute.clone(),
                        available: api_data.keys().cloned().collect(),
                    }
                    .into());
                };
                Some(id)
            }
        };

        if let Some(id) = resolved {
            tracing::info!("Updating object id (unset) to '{}'", id);
            self.id = Some(id);
        }
        self.api_data = api_data;

        for key in &self.profile.copy_keys {
            if let Some(value) = self.api_data.get(key) {
                tracing::debug!(
                    "Copying key '{}' from api_data ({}) to data ({:?})",
                    key,
                    value,
                    self.data.get(key)
                );
                self.data.insert(key.clone(), value.clone());
            }
        }

        tracing::debug!("Final object after synchronization of state: {:?}", self);
        Ok(())
    }

    fn id_from_headers(&self, headers: &Headers) -> Option<String> {
        let name = self.profile.id_header()?;
        let found = headers
            .last(name)
            .and_then(|value| resolve_header_id(value, self.profile.id_header_is_url));

        match &found {
            Some(id) => tracing::info!("Found id '{}' in header '{}'", id, name),
            None => tracing::warn!("id_header '{}' was empty or not found", name),
        }
        found
    }

    /// POST the object, then learn its id and state from the response or a
    /// follow-up read
    pub async fn create(&mut self) -> Result<()> {
        if self.id.is_none() && !self.profile.has_fallback_identity() {
            return Err(IdentityError::NoIdentityChannel {
                attribute: self.profile.id_attribute.clone(),
            }
            .into());
        }

        let body = serde_json::to_string(&self.data)?;
        let path = render(&self.paths.post, self.id());
        let response = self.transport.send(Method::Post, &path, Some(body)).await?;

        // A server-assigned id from the header wins over a pre-set one
        if let Some(id) = self.id_from_headers(&response.headers) {
            self.id = Some(id);
        }

        if self.profile.syncs_on_create() {
            tracing::debug!(
                "Parsing POST response to update state (write_returns_object={}, create_returns_object={})",
                self.profile.write_returns_object,
                self.profile.create_returns_object
            );
            self.sync(&response.body)?;
            if self.id.is_none() {
                return Err(IdentityError::Unconfirmed.into());
            }
            Ok(())
        } else {
            tracing::debug!("Requesting created object from API");
            self.read().await
        }
    }

    /// GET the object and sync local state with it
    pub async fn read(&mut self) -> Result<()> {
        let id = self.require_id("read")?;
        let path = render(&self.paths.get, Some(id));
        let response = self.transport.send(Method::Get, &path, None).await?;

        for (name, value) in response.headers.iter() {
            tracing::trace!("  {}: {}", name, value);
        }

        self.sync(&response.body)
    }

    /// PUT the caller's data, then sync from the response or a follow-up read
    pub async fn update(&mut self) -> Result<()> {
        let id = self.require_id("update")?;
        let path = render(&self.paths.put, Some(id));
        let body = serde_json::to_string(&self.data)?;
        let response = self.transport.send(Method::Put, &path, Some(body)).await?;

        if self.profile.write_returns_object {
            tracing::debug!("Parsing PUT response to update state (write_returns_object=true)");
            self.sync(&response.body)
        } else {
            tracing::debug!("Requesting updated object from API (write_returns_object=false)");
            self.read().await
        }
    }

    /// DELETE the object. An object without an id is considered already gone.
    pub async fn delete(&mut self) -> Result<()> {
        let Some(id) = self.id.as_deref() else {
            tracing::warn!("Attempting to delete an object that has no id set. Assuming this is OK.");
            return Ok(());
        };

        let path = render(&self.paths.delete, Some(id));
        self.transport.send(Method::Delete, &path, None).await?;
        Ok(())
    }
}

impl fmt::Debug for ApiObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiObject")
            .field("id", &self.id)
            .field("paths", &self.paths)
            .field("data", &self.data)
            .field("api_data", &self.api_data)
            .finish()
    }
}
