use std::sync::Arc;

use leptos::prelude::*;
use serde_json::Value;

use crate::components::force_graph::color_for_group;
use crate::controller::{LoadState, ViewController};
use crate::graph::FilteredView;

/// Property value as shown in the details panel; strings are unquoted.
pub fn display_value(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	}
}

pub fn status_text(
	load: &LoadState,
	total: Option<(usize, usize)>,
	shown: Option<(usize, usize)>,
) -> String {
	match (load, total, shown) {
		(LoadState::Failed(message), _, _) => format!("Failed to load graph: {}", message),
		(LoadState::Loading, None, _) | (LoadState::Idle, None, _) => "Loading graph...".into(),
		(_, Some(_), Some((0, _))) => "No nodes match the current filters".into(),
		(_, Some((nodes, rels)), Some((shown_nodes, shown_links))) => format!(
			"Showing {} of {} nodes, {} of {} relationships",
			shown_nodes, nodes, shown_links, rels
		),
		_ => "No graph loaded".into(),
	}
}

#[component]
pub fn StatusLine(
	controller: RwSignal<ViewController>,
	filtered: Memo<Option<Arc<FilteredView>>>,
) -> impl IntoView {
	let text = move || {
		let (load, total) = controller.with(|c| {
			(
				c.load_state().clone(),
				c.snapshot()
					.map(|s| (s.payload.nodes.len(), s.payload.relationships.len())),
			)
		});
		let shown = filtered
			.get()
			.map(|v| (v.graph.nodes.len(), v.graph.links.len()));
		status_text(&load, total, shown)
	};
	let failed = move || controller.with(|c| matches!(c.load_state(), LoadState::Failed(_)));

	view! { <p class="graph-status" class:error=failed>{text}</p> }
}

/// Node counts per primary label of the unfiltered payload.
#[component]
pub fn GraphLegend(controller: RwSignal<ViewController>) -> impl IntoView {
	let facets = Memo::new(move |_| controller.with(|c| c.snapshot().map(|s| s.facets.clone())));

	move || {
		facets.get().map(|f| {
			view! {
				<ul class="graph-legend">
					{f
						.group_counts
						.iter()
						.map(|(group, count)| {
							view! {
								<li>
									<span
										class="swatch"
										style=format!(
											"background-color: {}",
											color_for_group(group),
										)
									></span>
									{group.clone()}
									<span class="count">{format!(" ({})", count)}</span>
								</li>
							}
						})
						.collect_view()}
				</ul>
			}
		})
	}
}

/// Properties of the node last clicked in the canvas.
#[component]
pub fn NodeDetails(controller: RwSignal<ViewController>) -> impl IntoView {
	move || {
		controller
			.with(|c| c.selected().cloned())
			.map(|node| {
				view! {
					<aside class="node-details">
						<header>
							<h2>{node.name.clone()}</h2>
							<button on:click=move |_| controller.update(|c| c.clear_selection())>
								"Close"
							</button>
						</header>
						<dl>
							<dt>"id"</dt>
							<dd>{node.id.clone()}</dd>
							<dt>"labels"</dt>
							<dd>{node.labels.join(", ")}</dd>
							{node
								.properties
								.iter()
								.map(|(key, value)| {
									view! {
										<dt>{key.clone()}</dt>
										<dd>{display_value(value)}</dd>
									}
								})
								.collect_view()}
						</dl>
					</aside>
				}
			})
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn strings_display_unquoted() {
		assert_eq!(display_value(&json!("hello")), "hello");
		assert_eq!(display_value(&json!(3.5)), "3.5");
		assert_eq!(display_value(&json!(null)), "");
		assert_eq!(display_value(&json!([1, 2])), "[1,2]");
	}

	#[test]
	fn status_reports_counts() {
		assert_eq!(
			status_text(&LoadState::Ready, Some((10, 20)), Some((4, 3))),
			"Showing 4 of 10 nodes, 3 of 20 relationships"
		);
	}

	#[test]
	fn status_reports_empty_filter_result() {
		assert_eq!(
			status_text(&LoadState::Ready, Some((10, 20)), Some((0, 0))),
			"No nodes match the current filters"
		);
	}

	#[test]
	fn status_reports_loading_and_failure() {
		assert_eq!(status_text(&LoadState::Loading, None, None), "Loading graph...");
		assert_eq!(
			status_text(&LoadState::Failed("HTTP 502".into()), Some((1, 0)), Some((1, 0))),
			"Failed to load graph: HTTP 502"
		);
		// A refresh in flight keeps showing the current counts.
		assert_eq!(
			status_text(&LoadState::Loading, Some((2, 1)), Some((2, 1))),
			"Showing 2 of 2 nodes, 1 of 1 relationships"
		);
	}
}
