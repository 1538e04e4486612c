//! Path templates for the four object operations

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Placeholder replaced with the object's id before each request
pub const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathTemplates {
    pub get: String,
    pub post: String,
    pub put: String,
    pub delete: String,
}

impl PathTemplates {
    pub fn new(get: &str, post: &str, put: &str, delete: &str) -> Self {
        Self {
            get: get.to_string(),
            post: post.to_string(),
            put: put.to_string(),
            delete: delete.to_string(),
        }
    }

    /// Conventional REST layout: POST to the collection, everything else to
    /// `collection/{id}`
    pub fn for_collection(path: &str) -> Self {
        let collection = path.trim_end_matches('/');
        let member = format!("{}/{}", collection, ID_PLACEHOLDER);
        Self::new(&member, collection, &member, &member)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for (name, template) in [
            ("GET", &self.get),
            ("POST", &self.post),
            ("PUT", &self.put),
            ("DELETE", &self.delete),
        ] {
            if template.is_empty() {
                return Err(Error::config(format!(
                    "No {} path passed to object constructor",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Substitute every `{id}` in `template`
pub fn render(template: &str, id: Option<&str>) -> String {
    template.replace(ID_PLACEHOLDER, id.unwrap_or(""))
}
