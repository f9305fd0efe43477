//! Coercion of loosely-typed fetch responses into [`GraphPayload`].
//!
//! This is the only stage that looks at raw JSON. Malformed entries are
//! defaulted or dropped, never reported.

use std::collections::HashSet;

use log::debug;
use serde_json::Value;

use super::types::{
	DEFAULT_RELATIONSHIP_TYPE, GraphNode, GraphPayload, GraphRelationship, Properties,
};

/// Normalize a raw `{nodes, relationships}` document. Never fails; anything
/// unrecognisable becomes an empty payload.
pub fn normalize(raw: &Value) -> GraphPayload {
	let raw_nodes = array_field(raw, "nodes");
	let raw_rels = array_field(raw, "relationships");

	let mut seen = HashSet::new();
	let nodes: Vec<GraphNode> = raw_nodes
		.iter()
		.filter_map(normalize_node)
		.filter(|node| seen.insert(node.id.clone()))
		.collect();
	let relationships: Vec<GraphRelationship> =
		raw_rels.iter().filter_map(normalize_relationship).collect();

	debug!(
		"normalized payload: {}/{} nodes, {}/{} relationships kept",
		nodes.len(),
		raw_nodes.len(),
		relationships.len(),
		raw_rels.len()
	);

	GraphPayload {
		nodes,
		relationships,
	}
}

fn array_field<'a>(raw: &'a Value, key: &str) -> &'a [Value] {
	raw.get(key)
		.and_then(Value::as_array)
		.map(Vec::as_slice)
		.unwrap_or(&[])
}

/// Scalar-to-string coercion for ids and endpoints. Containers and null
/// coerce to the empty string.
fn coerce_id(value: Option<&Value>) -> String {
	match value {
		Some(Value::String(s)) => s.clone(),
		Some(Value::Number(n)) => n.to_string(),
		Some(Value::Bool(b)) => b.to_string(),
		_ => String::new(),
	}
}

fn normalize_node(raw: &Value) -> Option<GraphNode> {
	let id = coerce_id(raw.get("id"));
	if id.is_empty() {
		return None;
	}

	let name = match raw.get("name") {
		Some(Value::String(s)) if !s.is_empty() => s.clone(),
		Some(Value::Number(n)) => n.to_string(),
		_ => format!("Node {}", id),
	};

	Some(GraphNode {
		labels: labels(raw.get("labels")),
		properties: properties(raw.get("properties")),
		name,
		id,
	})
}

fn labels(value: Option<&Value>) -> Vec<String> {
	let Some(Value::Array(items)) = value else {
		return Vec::new();
	};
	let mut out: Vec<String> = Vec::with_capacity(items.len());
	for label in items.iter().filter_map(Value::as_str) {
		if !label.is_empty() && !out.iter().any(|l| l == label) {
			out.push(label.to_owned());
		}
	}
	out
}

fn properties(value: Option<&Value>) -> Properties {
	match value {
		Some(Value::Object(map)) => map.clone(),
		_ => Properties::new(),
	}
}

fn normalize_relationship(raw: &Value) -> Option<GraphRelationship> {
	let source = coerce_id(raw.get("source"));
	let target = coerce_id(raw.get("target"));
	if source.is_empty() || target.is_empty() {
		return None;
	}

	let relationship_type = match raw.get("type") {
		Some(Value::String(s)) if !s.is_empty() => s.clone(),
		_ => DEFAULT_RELATIONSHIP_TYPE.to_owned(),
	};
	let strength = raw
		.get("strength")
		.and_then(Value::as_f64)
		.filter(|s| s.is_finite() && *s > 0.0)
		.unwrap_or(1.0);

	Some(GraphRelationship {
		source,
		target,
		relationship_type,
		properties: properties(raw.get("properties")),
		strength,
	})
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn bare_node_gets_defaults() {
		let payload = normalize(&json!({ "nodes": [{ "id": "5" }] }));
		assert_eq!(
			payload.nodes,
			vec![GraphNode {
				id: "5".into(),
				labels: vec![],
				properties: Properties::new(),
				name: "Node 5".into(),
			}]
		);
		assert!(payload.relationships.is_empty());
	}

	#[test]
	fn numeric_ids_are_coerced() {
		let payload = normalize(&json!({
			"nodes": [{ "id": 7 }, { "id": 8 }],
			"relationships": [{ "source": 7, "target": 8 }],
		}));
		assert_eq!(payload.nodes[0].id, "7");
		assert_eq!(payload.nodes[0].name, "Node 7");
		assert_eq!(payload.relationships[0].source, "7");
		assert_eq!(payload.relationships[0].target, "8");
	}

	#[test]
	fn empty_and_missing_ids_are_dropped() {
		let payload = normalize(&json!({
			"nodes": [
				{ "id": "" },
				{ "name": "orphan" },
				{ "id": null },
				{ "id": {} },
				42,
				{ "id": "ok" },
			],
		}));
		let ids: Vec<_> = payload.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["ok"]);
	}

	#[test]
	fn duplicate_ids_keep_first() {
		let payload = normalize(&json!({
			"nodes": [{ "id": "a", "name": "first" }, { "id": "a", "name": "second" }],
		}));
		assert_eq!(payload.nodes.len(), 1);
		assert_eq!(payload.nodes[0].name, "first");
	}

	#[test]
	fn malformed_labels_and_properties_default() {
		let payload = normalize(&json!({
			"nodes": [
				{ "id": "a", "labels": "Concept", "properties": null },
				{
					"id": "b",
					"labels": ["Memory", 3, "Memory", "", "Concept"],
					"properties": [1, 2],
				},
			],
		}));
		assert!(payload.nodes[0].labels.is_empty());
		assert!(payload.nodes[0].properties.is_empty());
		assert_eq!(payload.nodes[1].labels, ["Memory", "Concept"]);
		assert!(payload.nodes[1].properties.is_empty());
	}

	#[test]
	fn relationship_defaults_and_drops() {
		let payload = normalize(&json!({
			"relationships": [
				{ "source": "a", "target": "b" },
				{ "source": "a", "target": "b", "type": "CAUSES", "strength": 2.5 },
				{ "source": "a", "target": "b", "strength": -1 },
				{ "source": "a", "target": "b", "strength": "strong" },
				{ "source": "", "target": "b" },
				{ "source": "a" },
			],
		}));
		assert_eq!(payload.relationships.len(), 4);
		assert_eq!(payload.relationships[0].relationship_type, "RELATES_TO");
		assert_eq!(payload.relationships[0].strength, 1.0);
		assert_eq!(payload.relationships[1].relationship_type, "CAUSES");
		assert_eq!(payload.relationships[1].strength, 2.5);
		assert_eq!(payload.relationships[2].strength, 1.0);
		assert_eq!(payload.relationships[3].strength, 1.0);
	}

	#[test]
	fn extra_property_keys_survive() {
		let payload = normalize(&json!({
			"nodes": [{ "id": "a", "properties": { "content": "text", "nested": { "x": 1 } } }],
		}));
		assert_eq!(payload.nodes[0].properties["content"], "text");
		assert_eq!(payload.nodes[0].properties["nested"], json!({ "x": 1 }));
	}

	#[test]
	fn garbage_normalizes_to_empty() {
		for raw in [
			json!(null),
			json!({}),
			json!([]),
			json!("nodes"),
			json!({ "nodes": {}, "relationships": 3 }),
			json!({ "nodes": null, "relationships": null }),
		] {
			assert_eq!(normalize(&raw), GraphPayload::default(), "input: {raw}");
		}
	}
}
