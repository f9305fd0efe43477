use leptos::prelude::*;

use crate::components::graph_explorer::GraphExplorer;
use crate::config::DashboardConfig;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<DashboardConfig>().unwrap_or_default();
	let origin = window().location().origin().unwrap_or_default();
	let explorer = config
		.endpoint_url(&origin)
		.map(|endpoint| view! { <GraphExplorer config=config endpoint=endpoint /> });

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				{explorer}
				<div class="graph-overlay">
					<h1>"Knowledge Graph"</h1>
					<p class="subtitle">"Click a node for details. Drag to reposition, scroll to zoom."</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
