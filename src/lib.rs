//! Knowledge graph explorer: a Leptos client-side app that filters a fetched
//! graph payload and renders it on a force-directed canvas.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info, warn};

// Modules
mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod graph;
mod pages;

// Top-Level pages
use crate::config::DashboardConfig;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Dashboard settings from the page query string, or defaults if invalid.
fn load_config() -> DashboardConfig {
	let query = window().location().search().unwrap_or_default();
	DashboardConfig::from_query(&query).unwrap_or_else(|e| {
		warn!("ignoring invalid dashboard config: {}", e);
		DashboardConfig::default()
	})
}

/// An app router which renders the graph explorer and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(load_config());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Knowledge Graph Explorer" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
