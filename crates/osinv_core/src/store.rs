//! Loading resource snapshots.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{InventoryError, InventoryResult};

/// Attribute under which the resource identifier is injected.
pub const RESOURCE_ID_KEY: &str = "uuid";

/// A single resource of the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    id: String,
    attributes: Map<String, Value>,
}

impl Resource {
    /// Create a resource, injecting its identifier under [`RESOURCE_ID_KEY`].
    ///
    /// An existing attribute of that name is overwritten.
    pub fn new(id: impl Into<String>, mut attributes: Map<String, Value>) -> Self {
        let id = id.into();
        attributes.insert(RESOURCE_ID_KEY.to_string(), Value::String(id.clone()));
        Self { id, attributes }
    }

    /// Identifier the resource was keyed by in the snapshot.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Attributes of the resource, used as the template context.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }
}

/// All resources of a snapshot, in snapshot order.
#[derive(Debug, Clone, Default)]
pub struct ResourceStore {
    resources: IndexMap<String, Resource>,
}

impl ResourceStore {
    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> InventoryResult<Self> {
        let path = path.as_ref();
        debug!("Parsing JSON from {:?}", path);

        let content = fs::read_to_string(path).map_err(|e| {
            InventoryError::Config(format!("failed to read snapshot {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// Parse a snapshot from a JSON document.
    ///
    /// The top level must map resource identifiers to attribute mappings.
    pub fn from_json_str(content: &str) -> InventoryResult<Self> {
        let document: Value = serde_json::from_str(content)
            .map_err(|e| InventoryError::Config(format!("snapshot is not valid JSON: {}", e)))?;
        Self::from_value(document)
    }

    pub fn from_value(document: Value) -> InventoryResult<Self> {
        let Value::Object(entries) = document else {
            return Err(InventoryError::Config(
                "snapshot must be a JSON object mapping resource identifiers to resources"
                    .to_string(),
            ));
        };

        let mut resources = IndexMap::with_capacity(entries.len());
        for (id, attributes) in entries {
            let Value::Object(attributes) = attributes else {
                return Err(InventoryError::Config(format!(
                    "resource {} is not a JSON object",
                    id
                )));
            };
            resources.insert(id.clone(), Resource::new(id, attributes));
        }

        debug!("Loaded {} resources", resources.len());
        Ok(Self { resources })
    }

    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Iterate resources in snapshot order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
