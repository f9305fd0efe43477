//! Facet sets that populate the filter controls and the legend.

use std::collections::{BTreeMap, BTreeSet};

use super::types::{DEFAULT_GROUP, GraphPayload};

/// Values offered by the label and relationship-type selects.
///
/// Always built from the unfiltered payload, so narrowing one filter never
/// removes options from the other.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Facets {
	/// See [`extract_node_labels`].
	pub node_labels: BTreeSet<String>,
	/// See [`extract_relationship_types`].
	pub relationship_types: BTreeSet<String>,
	/// Node count per primary label, for the legend.
	pub group_counts: BTreeMap<String, usize>,
}

impl Facets {
	/// Compute all facets of `payload` in one pass per set.
	pub fn extract(payload: &GraphPayload) -> Self {
		Self {
			node_labels: extract_node_labels(payload),
			relationship_types: extract_relationship_types(payload),
			group_counts: group_counts(payload),
		}
	}
}

/// Every label carried by any node, lexicographically sorted.
pub fn extract_node_labels(payload: &GraphPayload) -> BTreeSet<String> {
	payload
		.nodes
		.iter()
		.flat_map(|node| node.labels.iter().cloned())
		.collect()
}

/// Every relationship type present, lexicographically sorted.
pub fn extract_relationship_types(payload: &GraphPayload) -> BTreeSet<String> {
	payload
		.relationships
		.iter()
		.map(|rel| rel.relationship_type.clone())
		.collect()
}

/// Node count per primary label, nodes without labels under
/// [`DEFAULT_GROUP`].
pub fn group_counts(payload: &GraphPayload) -> BTreeMap<String, usize> {
	let mut counts = BTreeMap::new();
	for node in &payload.nodes {
		let group = node.primary_label().unwrap_or(DEFAULT_GROUP);
		*counts.entry(group.to_owned()).or_insert(0) += 1;
	}
	counts
}
