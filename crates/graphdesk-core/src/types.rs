//! Common types used across graphdesk

use serde::{Deserialize, Serialize};

/// Whether a node denotes a vertex or a relationship in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Node,
    Edge,
}

/// Classification of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Uri,
    Literal,
}

/// A single predicate/value pair belonging to an entity.
///
/// Predicates are not required to be unique; multi-valued predicates are
/// representable as repeated entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub predicate: String,
    pub object: String,
    pub kind: PropertyKind,
}

/// The currently selected space and graph.
///
/// Passed down explicitly to every operation; there is no ambient selection
/// state. Identifiers are held in their route (percent-encoded) form and
/// decoded where the backend expects decoded values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphContext {
    pub space_id: String,
    pub graph_id: String,
}

impl GraphContext {
    pub fn new(space_id: impl Into<String>, graph_id: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            graph_id: graph_id.into(),
        }
    }
}

/// The normalized, editable representation of one JSON-LD node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub space_id: String,
    pub graph_id: String,
    pub object_uri: String,
    pub object_kind: ObjectKind,
    pub rdf_type: String,
    pub created_time: String,
    pub last_modified: String,
    pub properties: Vec<Property>,
    /// Always equals `properties.len()`; re-derived after every mutation.
    pub property_count: usize,
}

impl Entity {
    /// Synthesize an empty entity for create mode, identified by a fresh
    /// blank-node id until the user assigns a URI.
    pub fn placeholder(ctx: &GraphContext) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            space_id: ctx.space_id.clone(),
            graph_id: ctx.graph_id.clone(),
            object_uri: format!("_:{}", uuid::Uuid::new_v4()),
            object_kind: ObjectKind::Node,
            rdf_type: "Unknown".to_string(),
            created_time: now.clone(),
            last_modified: now,
            properties: Vec::new(),
            property_count: 0,
        }
    }

    /// Re-derive `property_count` from the property list.
    pub fn recount(&mut self) {
        self.property_count = self.properties.len();
    }
}

/// In-progress input for a property row being added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDraft {
    pub predicate: String,
    pub value: String,
}

impl PropertyDraft {
    pub fn is_complete(&self) -> bool {
        !self.predicate.is_empty() && !self.value.is_empty()
    }

    pub fn clear(&mut self) {
        self.predicate.clear();
        self.value.clear();
    }
}
