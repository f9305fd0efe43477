use std::sync::Arc;
use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};
use url::Url;

use super::controls::{FilterBar, LimitControls};
use super::details::{GraphLegend, NodeDetails, StatusLine};
use crate::components::force_graph::ForceGraphCanvas;
use crate::config::{DashboardConfig, FetchLimits};
use crate::controller::{FitCommand, ViewController};
use crate::fetch::GraphFetcher;
use crate::graph::{FilteredView, PipelineCache, RenderGraph, RenderNode};

/// Interactive graph view: fetches the payload, applies the filter
/// controls and drives the canvas.
#[component]
pub fn GraphExplorer(config: DashboardConfig, endpoint: Url) -> impl IntoView {
	let controller = RwSignal::new(ViewController::new(&config));
	let pipeline = StoredValue::new(PipelineCache::default());
	let endpoint = StoredValue::new(endpoint);
	let fit_request = RwSignal::new(None::<FitCommand>);
	let fit_quiet = Duration::from_millis(config.fit_quiet_ms);

	let fetch = move |limits: FetchLimits| {
		let mut ticket = None;
		controller.update(|c| ticket = Some(c.begin_fetch()));
		let Some(ticket) = ticket else {
			return;
		};
		let fetcher = GraphFetcher::new(endpoint.get_value());
		spawn_local(async move {
			match fetcher.fetch(limits).await {
				Ok(raw) => controller.update(|c| {
					if c.complete_fetch(ticket, &raw) {
						if let Some(snapshot) = c.snapshot() {
							info!(
								"loaded graph v{}: {} nodes, {} relationships",
								snapshot.version,
								snapshot.payload.nodes.len(),
								snapshot.payload.relationships.len()
							);
						}
					}
				}),
				Err(e) => {
					warn!("graph fetch failed: {}", e);
					controller.update(|c| {
						c.fail_fetch(ticket, e.to_string());
					});
				}
			}
		});
	};

	// Limits are the only fetch trigger; filter edits just recompute.
	let limits = Memo::new(move |_| controller.with(|c| c.limits()));
	Effect::new(move |_| fetch(limits.get()));
	let refresh = move || fetch(controller.with_untracked(|c| c.limits()));

	let filtered = Memo::new(move |_| -> Option<Arc<FilteredView>> {
		let (snapshot, criteria) =
			controller.with(|c| (c.snapshot().cloned(), c.criteria().clone()));
		let snapshot = snapshot?;
		let mut view = None;
		pipeline.update_value(|p| view = Some(p.view(&snapshot, &criteria)));
		view
	});
	let graph = Signal::derive(move || {
		filtered
			.get()
			.map(|v| v.graph.clone())
			.unwrap_or_else(|| Arc::new(RenderGraph::default()))
	});

	Effect::new(move |_| {
		let Some(current) = filtered.get() else {
			return;
		};
		let non_empty = !current.graph.nodes.is_empty();
		let mut ticket = None;
		controller.update_untracked(|c| ticket = c.note_render(&current.key, non_empty));
		let Some(ticket) = ticket else {
			return;
		};
		set_timeout(
			move || {
				let mut command = None;
				controller.update_untracked(|c| command = c.poll_fit(ticket));
				if command.is_some() {
					fit_request.set(command);
				}
			},
			fit_quiet,
		);
	});

	let on_node_click =
		Callback::new(move |node: RenderNode| controller.update(|c| c.select_node(node)));

	view! {
		<div class="graph-explorer">
			<div class="graph-toolbar">
				<FilterBar controller=controller />
				<LimitControls controller=controller />
				<button class="refresh" on:click=move |_| refresh()>
					"Refresh"
				</button>
			</div>
			<StatusLine controller=controller filtered=filtered />
			<div class="graph-stage">
				<ForceGraphCanvas
					data=graph
					fit_request=fit_request
					on_node_click=on_node_click
					fullscreen=true
				/>
				<GraphLegend controller=controller />
				<NodeDetails controller=controller />
			</div>
		</div>
	}
}
