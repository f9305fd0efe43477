use std::collections::BTreeSet;

use leptos::prelude::*;
use log::warn;

use crate::config::FetchLimits;
use crate::controller::ViewController;
use crate::graph::filter::ALL;

/// Search box plus label and relationship-type selects.
#[component]
pub fn FilterBar(controller: RwSignal<ViewController>) -> impl IntoView {
	// Facets only change with the payload, so the option lists do not
	// re-render while typing.
	let facets = Memo::new(move |_| controller.with(|c| c.snapshot().map(|s| s.facets.clone())));

	let search = move || controller.with(|c| c.criteria().search_term.clone());
	let label = move || controller.with(|c| c.criteria().node_label.control_value().to_owned());
	let rel_type =
		move || controller.with(|c| c.criteria().relationship_type.control_value().to_owned());
	let unrestricted = move || controller.with(|c| c.criteria().is_unrestricted());

	view! {
		<div class="graph-filters">
			<input
				type="search"
				placeholder="Search nodes"
				prop:value=search
				on:input=move |ev| {
					let term = event_target_value(&ev);
					controller.update(|c| c.set_search_term(term));
				}
			/>
			<select
				prop:value=label
				on:change=move |ev| {
					let value = event_target_value(&ev);
					controller.update(|c| c.set_node_label_filter(&value));
				}
			>
				<option value=ALL>"All labels"</option>
				{move || {
					facets
						.get()
						.map(|f| {
							f.node_labels
								.iter()
								.map(|l| view! { <option value=l.clone()>{l.clone()}</option> })
								.collect_view()
						})
				}}
			</select>
			<select
				prop:value=rel_type
				on:change=move |ev| {
					let value = event_target_value(&ev);
					controller.update(|c| c.set_relationship_type_filter(&value));
				}
			>
				<option value=ALL>"All relationships"</option>
				{move || {
					facets
						.get()
						.map(|f| {
							f.relationship_types
								.iter()
								.map(|t| view! { <option value=t.clone()>{t.clone()}</option> })
								.collect_view()
						})
				}}
			</select>
			<button
				prop:disabled=unrestricted
				on:click=move |_| controller.update(|c| c.reset_filters())
			>
				"Reset"
			</button>
		</div>
	}
}

/// Facet values offered as select options. A value equal to the
/// no-restriction sentinel would select everything, so it is left out.
pub fn option_values(facets: &BTreeSet<String>) -> Vec<String> {
	facets.iter().filter(|v| v.as_str() != ALL).cloned().collect()
}

/// Parse the limit inputs; `None` if either is not a positive integer.
pub fn parse_limits(node_limit: &str, rel_limit: &str) -> Option<FetchLimits> {
	let node_limit = node_limit.trim().parse().ok()?;
	let rel_limit = rel_limit.trim().parse().ok()?;
	FetchLimits::new(node_limit, rel_limit).ok()
}

/// Node and relationship limit inputs. Applying new limits re-fetches.
#[component]
pub fn LimitControls(controller: RwSignal<ViewController>) -> impl IntoView {
	let initial = controller.with_untracked(|c| c.limits());
	let node_input = RwSignal::new(initial.node_limit.to_string());
	let rel_input = RwSignal::new(initial.rel_limit.to_string());

	let apply = move || {
		let (nodes, rels) = (node_input.get_untracked(), rel_input.get_untracked());
		match parse_limits(&nodes, &rels) {
			Some(limits) => controller.update(|c| {
				c.set_limits(limits);
			}),
			None => warn!("ignoring invalid limits {:?}/{:?}", nodes, rels),
		}
	};

	view! {
		<div class="graph-limits">
			<label>
				"Nodes "
				<input
					type="number"
					min="1"
					prop:value=move || node_input.get()
					on:change=move |ev| {
						node_input.set(event_target_value(&ev));
						apply();
					}
				/>
			</label>
			<label>
				"Relationships "
				<input
					type="number"
					min="1"
					prop:value=move || rel_input.get()
					on:change=move |ev| {
						rel_input.set(event_target_value(&ev));
						apply();
					}
				/>
			</label>
		</div>
	}
}
