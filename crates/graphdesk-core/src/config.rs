use config::{Config, File};
use serde::Deserialize;

use crate::adapter::{Endpoint, EndpointFamily};
use crate::error::GraphdeskError;

#[derive(Debug, Deserialize, Clone)]
pub struct ConsoleConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default = "default_collections")]
    pub collections: Vec<CollectionConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    pub page_size: usize,
    pub debounce_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            debounce_ms: 400,
        }
    }
}

/// One browsable collection of the console: its display name, the entity
/// type name used in messages, and the backend endpoint it lives on.
#[derive(Debug, Deserialize, Clone)]
pub struct CollectionConfig {
    pub name: String,
    pub type_name: String,
    pub path: String,
    pub family: EndpointFamily,
}

impl CollectionConfig {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            path: self.path.clone(),
            family: self.family,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "http://localhost:8080".to_string(),
            },
            ui: UiConfig::default(),
            collections: default_collections(),
        }
    }
}

impl ConsoleConfig {
    pub fn load(path: &str) -> Result<Self, GraphdeskError> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn collection(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.name == name)
    }
}

fn default_collections() -> Vec<CollectionConfig> {
    let graph_object = |name: &str, type_name: &str| CollectionConfig {
        name: name.to_string(),
        type_name: type_name.to_string(),
        path: format!("/api/{name}"),
        family: EndpointFamily::GraphObject,
    };

    vec![
        graph_object("entities", "Entity"),
        CollectionConfig {
            name: "types".to_string(),
            type_name: "Type".to_string(),
            path: "/api/kgtypes".to_string(),
            family: EndpointFamily::TypedCollection,
        },
        graph_object("frames", "Frame"),
        graph_object("triples", "Triple"),
        graph_object("imports", "Import job"),
        graph_object("exports", "Export job"),
    ]
}
