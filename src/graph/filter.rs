//! Composable node and relationship predicates.
//!
//! Nodes survive when they match both the search term and the label filter.
//! Relationships survive when both endpoints survive and the type filter
//! accepts them. The closure step always runs, so no output relationship can
//! reference a missing node.

use std::collections::HashSet;

use serde_json::Value;

use super::types::{GraphNode, GraphPayload, GraphRelationship};

/// Sentinel used by the select controls for "no restriction".
pub const ALL: &str = "all";

/// Single-select filter over a facet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FacetFilter {
	/// No restriction.
	#[default]
	All,
	/// Exactly this label or type.
	Only(String),
}

impl FacetFilter {
	/// Parse a select control value; `"all"` and the empty string mean
	/// [`FacetFilter::All`].
	pub fn from_control_value(value: &str) -> Self {
		if value.is_empty() || value == ALL {
			Self::All
		} else {
			Self::Only(value.to_owned())
		}
	}

	/// Value for the select control, the inverse of
	/// [`FacetFilter::from_control_value`].
	pub fn control_value(&self) -> &str {
		match self {
			Self::All => ALL,
			Self::Only(value) => value,
		}
	}

	/// Whether a facet value passes this filter.
	pub fn accepts(&self, value: &str) -> bool {
		match self {
			Self::All => true,
			Self::Only(wanted) => wanted == value,
		}
	}
}

/// The three live filter values. The default restricts nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FilterCriteria {
	/// Case-insensitive substring over node name and `properties.content`.
	pub search_term: String,
	/// Nodes must carry this label.
	pub node_label: FacetFilter,
	/// Relationships must have this type.
	pub relationship_type: FacetFilter,
}

impl FilterCriteria {
	/// Whether these criteria let everything through.
	pub fn is_unrestricted(&self) -> bool {
		self.search_term.is_empty()
			&& self.node_label == FacetFilter::All
			&& self.relationship_type == FacetFilter::All
	}

	/// Search and label predicates combined.
	pub fn matches_node(&self, node: &GraphNode) -> bool {
		matches_search(node, &self.search_term.to_lowercase()) && self.matches_label(node)
	}

	fn matches_label(&self, node: &GraphNode) -> bool {
		match &self.node_label {
			FacetFilter::All => true,
			FacetFilter::Only(label) => node.has_label(label),
		}
	}
}

/// `needle` must already be lowercased.
fn matches_search(node: &GraphNode, needle: &str) -> bool {
	if needle.is_empty() {
		return true;
	}
	if node.name.to_lowercase().contains(needle) {
		return true;
	}
	match node.properties.get("content") {
		Some(Value::String(content)) => content.to_lowercase().contains(needle),
		Some(Value::Number(n)) => n.to_string().contains(needle),
		Some(Value::Bool(b)) => b.to_string().contains(needle),
		_ => false,
	}
}

/// Apply `criteria` to `payload`, returning a new payload.
pub fn filter(payload: &GraphPayload, criteria: &FilterCriteria) -> GraphPayload {
	let needle = criteria.search_term.to_lowercase();
	let nodes: Vec<GraphNode> = payload
		.nodes
		.iter()
		.filter(|node| matches_search(node, &needle) && criteria.matches_label(node))
		.cloned()
		.collect();

	let closed = close_relationships(&nodes, &payload.relationships);
	let relationships = retain_relationship_type(&closed, &criteria.relationship_type);

	GraphPayload {
		nodes,
		relationships,
	}
}

/// Relationships whose source and target are both in `nodes`.
pub fn close_relationships(
	nodes: &[GraphNode],
	relationships: &[GraphRelationship],
) -> Vec<GraphRelationship> {
	let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
	relationships
		.iter()
		.filter(|rel| ids.contains(rel.source.as_str()) && ids.contains(rel.target.as_str()))
		.cloned()
		.collect()
}

/// Relationships accepted by `type_filter`, in order.
pub fn retain_relationship_type(
	relationships: &[GraphRelationship],
	type_filter: &FacetFilter,
) -> Vec<GraphRelationship> {
	relationships
		.iter()
		.filter(|rel| type_filter.accepts(&rel.relationship_type))
		.cloned()
		.collect()
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::graph::normalize::normalize;

	fn payload() -> GraphPayload {
		normalize(&json!({
			"nodes": [
				{ "id": "a", "labels": ["Concept"], "name": "Alpha" },
				{ "id": "b", "labels": ["Memory"], "name": "Beta",
				  "properties": { "content": "Remembered the ALPINE lake" } },
				{ "id": "c", "labels": ["Concept", "Memory"], "name": "Gamma" },
			],
			"relationships": [
				{ "source": "a", "target": "b", "type": "RELATES_TO" },
				{ "source": "b", "target": "c", "type": "RECALLS" },
				{ "source": "a", "target": "c", "type": "RELATES_TO" },
			],
		}))
	}

	fn ids(payload: &GraphPayload) -> Vec<&str> {
		payload.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	#[test]
	fn control_values_round_trip() {
		assert_eq!(FacetFilter::from_control_value("all"), FacetFilter::All);
		assert_eq!(FacetFilter::from_control_value(""), FacetFilter::All);
		let only = FacetFilter::from_control_value("Memory");
		assert_eq!(only, FacetFilter::Only("Memory".into()));
		assert_eq!(only.control_value(), "Memory");
		assert_eq!(FacetFilter::All.control_value(), "all");
	}

	#[test]
	fn search_matches_name_and_content() {
		let criteria = FilterCriteria {
			search_term: "ALP".into(),
			..FilterCriteria::default()
		};
		assert_eq!(ids(&filter(&payload(), &criteria)), ["a", "b"]);
	}

	#[test]
	fn label_filter_uses_any_label() {
		let criteria = FilterCriteria {
			node_label: FacetFilter::Only("Memory".into()),
			..FilterCriteria::default()
		};
		let out = filter(&payload(), &criteria);
		assert_eq!(ids(&out), ["b", "c"]);
		assert_eq!(out.relationships.len(), 1);
		assert_eq!(out.relationships[0].relationship_type, "RECALLS");
	}

	#[test]
	fn search_and_label_combine_with_and() {
		let criteria = FilterCriteria {
			search_term: "a".into(),
			node_label: FacetFilter::Only("Concept".into()),
			relationship_type: FacetFilter::All,
		};
		// "Beta" contains "a" but is not a Concept.
		assert_eq!(ids(&filter(&payload(), &criteria)), ["a", "c"]);
	}

	#[test]
	fn relationship_type_filter_keeps_nodes() {
		let criteria = FilterCriteria {
			relationship_type: FacetFilter::Only("RECALLS".into()),
			..FilterCriteria::default()
		};
		let out = filter(&payload(), &criteria);
		assert_eq!(out.nodes.len(), 3);
		assert_eq!(out.relationships.len(), 1);
	}

	#[test]
	fn unknown_label_yields_empty_graph() {
		let criteria = FilterCriteria {
			node_label: FacetFilter::Only("Nope".into()),
			..FilterCriteria::default()
		};
		let out = filter(&payload(), &criteria);
		assert!(out.nodes.is_empty());
		assert!(out.relationships.is_empty());
	}

	#[test]
	fn dangling_relationship_dropped_without_filters() {
		let mut input = payload();
		input.relationships.push(GraphRelationship {
			source: "z".into(),
			target: "a".into(),
			relationship_type: "RELATES_TO".into(),
			properties: Default::default(),
			strength: 1.0,
		});
		let out = filter(&input, &FilterCriteria::default());
		assert_eq!(out, payload());
	}

	#[test]
	fn closure_and_type_steps_commute() {
		let input = payload();
		let kept = &input.nodes[1..];
		let only = FacetFilter::Only("RELATES_TO".into());
		let closure_first =
			retain_relationship_type(&close_relationships(kept, &input.relationships), &only);
		let type_first =
			close_relationships(kept, &retain_relationship_type(&input.relationships, &only));
		assert_eq!(closure_first, type_first);
	}

	#[test]
	fn input_is_not_mutated() {
		let input = payload();
		let before = input.clone();
		let _ = filter(
			&input,
			&FilterCriteria {
				search_term: "gamma".into(),
				..FilterCriteria::default()
			},
		);
		assert_eq!(input, before);
	}

	#[test]
	fn unrestricted_criteria() {
		assert!(FilterCriteria::default().is_unrestricted());
		let searching = FilterCriteria {
			search_term: "x".into(),
			..FilterCriteria::default()
		};
		assert!(!searching.is_unrestricted());
	}
}
