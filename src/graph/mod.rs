//! Graph filtering and render-transformation pipeline.
//!
//! raw JSON -> [`normalize`] -> [`Facets`] / [`filter`] -> [`to_render_graph`]

pub mod adapter;
pub mod cache;
pub mod facets;
pub mod filter;
pub mod normalize;
pub mod types;

pub use adapter::to_render_graph;
pub use cache::{FilteredView, PipelineCache, Snapshot, ViewKey};
pub use facets::{Facets, extract_node_labels, extract_relationship_types};
pub use filter::{FacetFilter, FilterCriteria, filter};
pub use normalize::normalize;
pub use types::{
	GraphNode, GraphPayload, GraphRelationship, Properties, RenderGraph, RenderLink, RenderNode,
};
