//! Canonical graph records and the records handed to the renderer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arbitrary key/value properties attached to a node or relationship.
pub type Properties = Map<String, Value>;

/// Relationship type substituted when a raw relationship carries none.
pub const DEFAULT_RELATIONSHIP_TYPE: &str = "RELATES_TO";

/// Group assigned to nodes without any label.
pub const DEFAULT_GROUP: &str = "default";

/// A node of a normalized payload. `id` is never empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	/// Unique within a payload.
	pub id: String,
	/// Ordered, duplicate-free. The first entry is the primary label.
	pub labels: Vec<String>,
	/// Arbitrary properties; `content` takes part in search.
	pub properties: Properties,
	/// Display name, `Node {id}` when the raw node has none.
	pub name: String,
}

impl GraphNode {
	/// First label, used as the colour group.
	pub fn primary_label(&self) -> Option<&str> {
		self.labels.first().map(String::as_str)
	}

	/// Whether `label` is one of this node's labels.
	pub fn has_label(&self, label: &str) -> bool {
		self.labels.iter().any(|l| l == label)
	}
}

/// A typed edge between two node ids. Endpoints are never empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphRelationship {
	/// Id of the source node.
	pub source: String,
	/// Id of the target node.
	pub target: String,
	/// Serialized as `type`; [`DEFAULT_RELATIONSHIP_TYPE`] when missing.
	#[serde(rename = "type")]
	pub relationship_type: String,
	/// Arbitrary properties carried through to the renderer.
	pub properties: Properties,
	/// Positive and finite; 1.0 when missing or invalid.
	pub strength: f64,
}

/// The full in-memory snapshot returned by one fetch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
	/// Nodes in payload order.
	pub nodes: Vec<GraphNode>,
	/// Relationships in payload order. May reference unknown ids until
	/// filtered.
	pub relationships: Vec<GraphRelationship>,
}

/// A node as drawn on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderNode {
	/// Same as [`GraphNode::id`].
	pub id: String,
	/// Label drawn next to the node.
	pub name: String,
	/// Same as [`GraphNode::labels`].
	pub labels: Vec<String>,
	/// Shown in the details panel.
	pub properties: Properties,
	/// Colour key: the primary label or [`DEFAULT_GROUP`].
	pub group: String,
}

/// An edge as drawn on the canvas; line width follows `strength`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderLink {
	/// Id of a [`RenderNode`].
	pub source: String,
	/// Id of a [`RenderNode`].
	pub target: String,
	/// Serialized as `type`.
	#[serde(rename = "type")]
	pub relationship_type: String,
	/// Copied from the relationship.
	pub properties: Properties,
	/// Scales the drawn line width.
	pub strength: f64,
}

/// Renderer-ready graph. Every link endpoint matches a node id.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RenderGraph {
	/// Drawn nodes.
	pub nodes: Vec<RenderNode>,
	/// Drawn edges.
	pub links: Vec<RenderLink>,
}
