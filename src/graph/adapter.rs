//! Projection of a payload into [`RenderGraph`] records.

use super::types::{DEFAULT_GROUP, GraphPayload, RenderGraph, RenderLink, RenderNode};

/// Project a (filtered) payload into renderer records.
///
/// Nodes with an empty id are skipped even though normalization already
/// removes them; links are copied as-is.
pub fn to_render_graph(payload: &GraphPayload) -> RenderGraph {
	let nodes = payload
		.nodes
		.iter()
		.filter(|node| !node.id.is_empty())
		.map(|node| RenderNode {
			id: node.id.clone(),
			name: node.name.clone(),
			labels: node.labels.clone(),
			properties: node.properties.clone(),
			group: node.primary_label().unwrap_or(DEFAULT_GROUP).to_owned(),
		})
		.collect();

	let links = payload
		.relationships
		.iter()
		.map(|rel| RenderLink {
			source: rel.source.clone(),
			target: rel.target.clone(),
			relationship_type: rel.relationship_type.clone(),
			properties: rel.properties.clone(),
			strength: rel.strength,
		})
		.collect();

	RenderGraph { nodes, links }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::{GraphNode, GraphRelationship, Properties};

	fn node(id: &str, labels: &[&str]) -> GraphNode {
		GraphNode {
			id: id.into(),
			labels: labels.iter().map(|l| l.to_string()).collect(),
			properties: Properties::new(),
			name: format!("Node {id}"),
		}
	}

	#[test]
	fn group_is_primary_label() {
		let payload = GraphPayload {
			nodes: vec![node("a", &["Memory", "Concept"]), node("b", &[])],
			relationships: vec![],
		};
		let graph = to_render_graph(&payload);
		assert_eq!(graph.nodes[0].group, "Memory");
		assert_eq!(graph.nodes[1].group, "default");
	}

	#[test]
	fn empty_ids_are_skipped() {
		let payload = GraphPayload {
			nodes: vec![node("", &["Memory"]), node("b", &[])],
			relationships: vec![],
		};
		let graph = to_render_graph(&payload);
		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.nodes[0].id, "b");
	}

	#[test]
	fn links_copy_relationship_fields() {
		let payload = GraphPayload {
			nodes: vec![node("a", &[]), node("b", &[])],
			relationships: vec![GraphRelationship {
				source: "a".into(),
				target: "b".into(),
				relationship_type: "CAUSES".into(),
				properties: Properties::new(),
				strength: 3.0,
			}],
		};
		let link = &to_render_graph(&payload).links[0];
		assert_eq!((link.source.as_str(), link.target.as_str()), ("a", "b"));
		assert_eq!(link.relationship_type, "CAUSES");
		assert_eq!(link.strength, 3.0);
	}

	#[test]
	fn empty_payload_renders_empty() {
		assert_eq!(to_render_graph(&GraphPayload::default()), RenderGraph::default());
	}
}
