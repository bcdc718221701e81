//! JSON-LD response normalization
//!
//! Converts the backend's heterogeneous JSON-LD envelopes into the uniform
//! [`Entity`] model. Two envelope shapes exist: list responses nest an array
//! of nodes under `@graph`, item responses carry `@id`/`URI` directly.

use serde_json::Value as JsonValue;

use crate::types::{Entity, GraphContext, ObjectKind, Property, PropertyKind};

/// Extract the JSON-LD node from a response envelope.
///
/// List envelopes (`data.@graph` array, or a bare array) yield their first
/// element; item envelopes (payload carries `@id` or `URI`) yield the payload
/// itself. Returns `None` when no node is present.
pub fn extract_node(payload: &JsonValue) -> Option<&JsonValue> {
    if let Some(graph) = payload.get("data").and_then(|d| d.get("@graph"))
        && let Some(rows) = graph.as_array()
    {
        return rows.first();
    }

    if let Some(rows) = payload.as_array() {
        return rows.first();
    }

    if payload.get("@id").is_some() || payload.get("URI").is_some() {
        return Some(payload);
    }

    None
}

/// Normalize a response envelope into an [`Entity`].
///
/// `route_id` is the percent-encoded object identifier from the page route;
/// it is decoded and used as the identity fallback when the node carries
/// neither `@id` nor `URI`. Returns `None` when the envelope holds no node.
pub fn normalize_entity(
    payload: &JsonValue,
    route_id: &str,
    ctx: &GraphContext,
) -> Option<Entity> {
    extract_node(payload).map(|node| entity_from_node(node, route_id, ctx))
}

/// Normalize every node of a list envelope.
///
/// Collection responses nest their rows under `data.@graph` or under
/// `<collection>.@graph`; a bare array is also accepted.
pub fn normalize_collection(
    payload: &JsonValue,
    collection: &str,
    ctx: &GraphContext,
) -> Vec<Entity> {
    let rows = payload
        .get("data")
        .and_then(|d| d.get("@graph"))
        .and_then(JsonValue::as_array)
        .or_else(|| {
            payload
                .get(collection)
                .and_then(|c| c.get("@graph"))
                .and_then(JsonValue::as_array)
        })
        .or_else(|| payload.as_array());

    rows.map(|nodes| {
        nodes
            .iter()
            .map(|node| entity_from_node(node, "", ctx))
            .collect()
    })
    .unwrap_or_default()
}

/// Build an [`Entity`] from a single JSON-LD node.
pub fn entity_from_node(node: &JsonValue, route_id: &str, ctx: &GraphContext) -> Entity {
    let object_uri = node
        .get("@id")
        .and_then(JsonValue::as_str)
        .or_else(|| node.get("URI").and_then(JsonValue::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| decode_route_id(route_id));

    let rdf_type = match node.get("@type") {
        None | Some(JsonValue::Null) => "Unknown".to_string(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let object_kind = if rdf_type.contains("Edge") {
        ObjectKind::Edge
    } else {
        ObjectKind::Node
    };

    let now = || chrono::Utc::now().to_rfc3339();
    let timestamp = |key: &str| {
        node.get(key)
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            .unwrap_or_else(now)
    };

    let properties = extract_properties(node);
    let property_count = properties.len();

    Entity {
        space_id: ctx.space_id.clone(),
        graph_id: ctx.graph_id.clone(),
        object_uri,
        object_kind,
        rdf_type,
        created_time: timestamp("createdTime"),
        last_modified: timestamp("lastModified"),
        properties,
        property_count,
    }
}

/// Extract the property list from a node's own keys.
///
/// Only `@context` and `@graph` are excluded, matching the backend's editing
/// pages: `@id`/`@type`/`URI` intentionally remain in the list even though
/// the same information is captured in `object_uri`/`rdf_type`. Null values
/// are skipped; object-typed values are stringified structurally.
fn extract_properties(node: &JsonValue) -> Vec<Property> {
    let Some(map) = node.as_object() else {
        return Vec::new();
    };

    map.iter()
        .filter(|(key, _)| key.as_str() != "@context" && key.as_str() != "@graph")
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| Property {
            predicate: key.clone(),
            object: stringify_value(value),
            kind: classify_predicate(key),
        })
        .collect()
}

/// `Uri` for `http`-prefixed predicates and the `@id`/`@type`/`URI` metadata
/// keys; `Literal` for everything else.
pub fn classify_predicate(predicate: &str) -> PropertyKind {
    if predicate.starts_with("http") || matches!(predicate, "@id" | "@type" | "URI") {
        PropertyKind::Uri
    } else {
        PropertyKind::Literal
    }
}

fn stringify_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn decode_route_id(route_id: &str) -> String {
    urlencoding::decode(route_id)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| route_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> GraphContext {
        GraphContext::new("space-1", "urn:graph")
    }

    #[test]
    fn item_envelope_with_metadata_keys() {
        let node = json!({"@id": "urn:x#a", "@type": "Person", "name": "Ann"});
        let entity = normalize_entity(&node, "", &ctx()).unwrap();

        assert_eq!(entity.object_uri, "urn:x#a");
        assert_eq!(entity.rdf_type, "Person");
        assert_eq!(entity.object_kind, ObjectKind::Node);

        // Metadata keys stay in the property list alongside real predicates.
        assert_eq!(entity.property_count, 3);
        let name = entity
            .properties
            .iter()
            .find(|p| p.predicate == "name")
            .unwrap();
        assert_eq!(name.object, "Ann");
        assert_eq!(name.kind, PropertyKind::Literal);
        assert!(entity.properties.iter().any(|p| p.predicate == "@id"));
        assert!(entity.properties.iter().any(|p| p.predicate == "@type"));
    }

    #[test]
    fn empty_graph_yields_no_node() {
        let payload = json!({"data": {"@graph": []}});
        assert!(normalize_entity(&payload, "urn:x", &ctx()).is_none());
    }

    #[test]
    fn list_envelope_takes_first_node() {
        let payload = json!({"data": {"@graph": [
            {"@id": "urn:x#first", "@type": "Frame"},
            {"@id": "urn:x#second", "@type": "Frame"}
        ]}});
        let entity = normalize_entity(&payload, "", &ctx()).unwrap();
        assert_eq!(entity.object_uri, "urn:x#first");
    }

    #[test]
    fn bare_array_is_a_list_envelope() {
        let payload = json!([{"@id": "urn:x#a", "@type": "Thing"}]);
        let entity = normalize_entity(&payload, "", &ctx()).unwrap();
        assert_eq!(entity.object_uri, "urn:x#a");
    }

    #[test]
    fn uri_key_identifies_item_envelope() {
        let payload = json!({"URI": "urn:x#u", "label": "via URI"});
        let entity = normalize_entity(&payload, "", &ctx()).unwrap();
        assert_eq!(entity.object_uri, "urn:x#u");
        assert_eq!(entity.rdf_type, "Unknown");
    }

    #[test]
    fn route_id_is_decoded_as_identity_fallback() {
        let payload = json!([{"label": "anonymous"}]);
        let entity = normalize_entity(&payload, "urn%3Ax%23a", &ctx()).unwrap();
        assert_eq!(entity.object_uri, "urn:x#a");
    }

    #[test]
    fn edge_kind_inferred_from_type() {
        let node = json!({"@id": "urn:e", "@type": "KnowsEdge"});
        let entity = normalize_entity(&node, "", &ctx()).unwrap();
        assert_eq!(entity.object_kind, ObjectKind::Edge);
    }

    #[test]
    fn null_values_are_skipped() {
        let node = json!({"@id": "urn:x", "gone": null, "kept": "yes"});
        let entity = normalize_entity(&node, "", &ctx()).unwrap();
        assert!(entity.properties.iter().all(|p| p.predicate != "gone"));
        assert!(entity.properties.iter().any(|p| p.predicate == "kept"));
        assert_eq!(entity.property_count, entity.properties.len());
    }

    #[test]
    fn object_values_stringify_structurally() {
        let node = json!({"@id": "urn:x", "address": {"city": "Delft"}, "count": 7});
        let entity = normalize_entity(&node, "", &ctx()).unwrap();

        let address = entity
            .properties
            .iter()
            .find(|p| p.predicate == "address")
            .unwrap();
        assert_eq!(address.object, r#"{"city":"Delft"}"#);

        let count = entity
            .properties
            .iter()
            .find(|p| p.predicate == "count")
            .unwrap();
        assert_eq!(count.object, "7");
    }

    #[test]
    fn predicate_classification_is_stable() {
        assert_eq!(
            classify_predicate("http://schema.org/name"),
            PropertyKind::Uri
        );
        assert_eq!(classify_predicate("https://example.com"), PropertyKind::Uri);
        assert_eq!(classify_predicate("@id"), PropertyKind::Uri);
        assert_eq!(classify_predicate("@type"), PropertyKind::Uri);
        assert_eq!(classify_predicate("URI"), PropertyKind::Uri);
        assert_eq!(classify_predicate("name"), PropertyKind::Literal);
        assert_eq!(classify_predicate("uri"), PropertyKind::Literal);
    }

    #[test]
    fn context_and_graph_never_become_properties() {
        let node = json!({
            "@context": "https://schema.org",
            "@id": "urn:x",
            "@graph": [],
            "name": "Ann"
        });
        let entity = normalize_entity(&node, "", &ctx()).unwrap();
        assert!(
            entity
                .properties
                .iter()
                .all(|p| p.predicate != "@context" && p.predicate != "@graph")
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let node = json!({
            "@id": "urn:x#a",
            "@type": "Person",
            "name": "Ann",
            "createdTime": "2026-01-01T00:00:00Z",
            "lastModified": "2026-01-02T00:00:00Z"
        });
        let first = normalize_entity(&node, "", &ctx()).unwrap();
        let second = normalize_entity(&node, "", &ctx()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn upstream_timestamps_are_kept() {
        let node = json!({
            "@id": "urn:x",
            "createdTime": "2026-01-01T00:00:00Z",
            "lastModified": "2026-01-02T00:00:00Z"
        });
        let entity = normalize_entity(&node, "", &ctx()).unwrap();
        assert_eq!(entity.created_time, "2026-01-01T00:00:00Z");
        assert_eq!(entity.last_modified, "2026-01-02T00:00:00Z");
    }

    #[test]
    fn collection_rows_under_data_graph() {
        let payload = json!({"data": {"@graph": [
            {"@id": "urn:a"}, {"@id": "urn:b"}
        ]}});
        let entities = normalize_collection(&payload, "frames", &ctx());
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[1].object_uri, "urn:b");
    }

    #[test]
    fn collection_rows_under_named_key() {
        let payload = json!({"frames": {"@graph": [{"@id": "urn:f"}]}});
        let entities = normalize_collection(&payload, "frames", &ctx());
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].object_uri, "urn:f");
    }

    #[test]
    fn collection_of_nothing_is_empty() {
        let payload = json!({"unrelated": true});
        assert!(normalize_collection(&payload, "frames", &ctx()).is_empty());
    }
}
