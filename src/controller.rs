//! Mutable view state behind the graph explorer.
//!
//! Everything here is plain data so it can be driven and tested without a
//! browser. The UI wraps a [`ViewController`] in a signal.

use log::debug;
use serde_json::Value;

use crate::config::{DashboardConfig, FetchLimits};
use crate::graph::{FacetFilter, FilterCriteria, RenderNode, Snapshot, ViewKey, normalize};

/// Asks the renderer to fit all nodes into view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitCommand {
	/// Increases with every command issued.
	pub seq: u64,
	/// Screen-space margin around the fitted graph.
	pub padding: f64,
}

/// Identifies one fetch. Only the most recently issued ticket is honoured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Progress of the most recent fetch.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState {
	/// Nothing requested yet.
	#[default]
	Idle,
	/// A fetch is in flight.
	Loading,
	/// The latest fetch succeeded.
	Ready,
	/// The latest fetch failed with this message.
	Failed(String),
}

/// Identifies one rendered view waiting for its fit. Only the most recently
/// issued ticket can fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FitTicket(u64);

/// Issues at most one fit per view key, for the last view rendered in a
/// burst.
#[derive(Clone, Debug)]
struct FitGate {
	padding: f64,
	pending: Option<(ViewKey, u64)>,
	last_fitted: Option<ViewKey>,
	generation: u64,
	seq: u64,
}

impl FitGate {
	fn new(padding: f64) -> Self {
		Self {
			padding,
			pending: None,
			last_fitted: None,
			generation: 0,
			seq: 0,
		}
	}

	fn observe(&mut self, key: &ViewKey, non_empty: bool) -> Option<FitTicket> {
		self.generation += 1;
		if !non_empty || self.last_fitted.as_ref() == Some(key) {
			self.pending = None;
			return None;
		}
		self.pending = Some((key.clone(), self.generation));
		Some(FitTicket(self.generation))
	}

	fn poll(&mut self, ticket: FitTicket) -> Option<FitCommand> {
		match &self.pending {
			Some((_, generation)) if *generation == ticket.0 => {}
			_ => return None,
		}
		let (key, _) = self.pending.take()?;
		self.last_fitted = Some(key);
		self.seq += 1;
		Some(FitCommand {
			seq: self.seq,
			padding: self.padding,
		})
	}
}

/// Fetch parameters, filters, selection and load state of one explorer.
#[derive(Clone, Debug)]
pub struct ViewController {
	limits: FetchLimits,
	criteria: FilterCriteria,
	selected: Option<RenderNode>,
	snapshot: Option<Snapshot>,
	load: LoadState,
	latest_ticket: u64,
	payload_version: u64,
	fit: FitGate,
}

impl ViewController {
	/// Empty controller using the configured limits and fit settings.
	pub fn new(config: &DashboardConfig) -> Self {
		Self {
			limits: config.limits,
			criteria: FilterCriteria::default(),
			selected: None,
			snapshot: None,
			load: LoadState::Idle,
			latest_ticket: 0,
			payload_version: 0,
			fit: FitGate::new(config.fit_padding),
		}
	}

	/// Limits for the next fetch.
	pub fn limits(&self) -> FetchLimits {
		self.limits
	}

	/// Current filter values.
	pub fn criteria(&self) -> &FilterCriteria {
		&self.criteria
	}

	/// Node shown in the details panel.
	pub fn selected(&self) -> Option<&RenderNode> {
		self.selected.as_ref()
	}

	/// Payload of the last successful fetch.
	pub fn snapshot(&self) -> Option<&Snapshot> {
		self.snapshot.as_ref()
	}

	/// State of the latest fetch.
	pub fn load_state(&self) -> &LoadState {
		&self.load
	}

	/// Returns `true` if the limits changed, meaning a new fetch is due.
	pub fn set_limits(&mut self, limits: FetchLimits) -> bool {
		if self.limits == limits {
			return false;
		}
		self.limits = limits;
		true
	}

	/// Start a fetch. Any fetch still in flight is superseded.
	pub fn begin_fetch(&mut self) -> FetchTicket {
		self.latest_ticket += 1;
		self.load = LoadState::Loading;
		FetchTicket(self.latest_ticket)
	}

	fn is_current(&self, ticket: FetchTicket) -> bool {
		if ticket.0 != self.latest_ticket {
			debug!(
				"ignoring result of superseded fetch #{} (latest #{})",
				ticket.0, self.latest_ticket
			);
			return false;
		}
		true
	}

	/// Install the payload of a finished fetch. Returns `false` if the
	/// ticket was superseded and the result discarded.
	pub fn complete_fetch(&mut self, ticket: FetchTicket, raw: &Value) -> bool {
		if !self.is_current(ticket) {
			return false;
		}
		self.payload_version += 1;
		self.snapshot = Some(Snapshot::new(self.payload_version, normalize(raw)));
		self.selected = None;
		self.load = LoadState::Ready;
		true
	}

	/// Record a failed fetch. The previous payload, if any, stays visible.
	pub fn fail_fetch(&mut self, ticket: FetchTicket, message: impl Into<String>) -> bool {
		if !self.is_current(ticket) {
			return false;
		}
		self.load = LoadState::Failed(message.into());
		true
	}

	/// Replace the search term.
	pub fn set_search_term(&mut self, term: impl Into<String>) {
		self.criteria.search_term = term.into();
	}

	/// Set the label filter from a select control value.
	pub fn set_node_label_filter(&mut self, control_value: &str) {
		self.criteria.node_label = FacetFilter::from_control_value(control_value);
	}

	/// Set the relationship-type filter from a select control value.
	pub fn set_relationship_type_filter(&mut self, control_value: &str) {
		self.criteria.relationship_type = FacetFilter::from_control_value(control_value);
	}

	/// Clear the search and set both selects back to all.
	pub fn reset_filters(&mut self) {
		self.criteria = FilterCriteria::default();
	}

	/// Show `node` in the details panel.
	pub fn select_node(&mut self, node: RenderNode) {
		self.selected = Some(node);
	}

	/// Close the details panel.
	pub fn clear_selection(&mut self) {
		self.selected = None;
	}

	/// Tell the fit gate a view was rendered. Returns the ticket to redeem
	/// with [`ViewController::poll_fit`] once the quiet period has passed, or
	/// `None` if this view needs no fit.
	pub fn note_render(&mut self, key: &ViewKey, non_empty: bool) -> Option<FitTicket> {
		self.fit.observe(key, non_empty)
	}

	/// The fit-to-view command for `ticket`, unless a later render
	/// superseded it or it was already redeemed.
	pub fn poll_fit(&mut self, ticket: FitTicket) -> Option<FitCommand> {
		let command = self.fit.poll(ticket);
		match &command {
			Some(cmd) => debug!("issuing fit-to-view #{}", cmd.seq),
			None => debug!("fit ticket #{} superseded", ticket.0),
		}
		command
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn controller() -> ViewController {
		ViewController::new(&DashboardConfig::default())
	}

	fn raw(ids: &[&str]) -> Value {
		json!({ "nodes": ids.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>() })
	}

	fn render_node(id: &str) -> RenderNode {
		RenderNode {
			id: id.into(),
			name: id.into(),
			labels: vec![],
			properties: Default::default(),
			group: "default".into(),
		}
	}

	fn key(version: u64, search: &str) -> ViewKey {
		ViewKey {
			payload_version: version,
			criteria: FilterCriteria {
				search_term: search.into(),
				..FilterCriteria::default()
			},
		}
	}

	#[test]
	fn completed_fetch_installs_snapshot() {
		let mut c = controller();
		assert_eq!(c.load_state(), &LoadState::Idle);
		let ticket = c.begin_fetch();
		assert_eq!(c.load_state(), &LoadState::Loading);
		assert!(c.complete_fetch(ticket, &raw(&["a", "b"])));
		let snapshot = c.snapshot().unwrap();
		assert_eq!(snapshot.version, 1);
		assert_eq!(snapshot.payload.nodes.len(), 2);
		assert_eq!(c.load_state(), &LoadState::Ready);
	}

	#[test]
	fn superseded_fetch_is_discarded() {
		let mut c = controller();
		let stale = c.begin_fetch();
		let fresh = c.begin_fetch();
		assert!(c.complete_fetch(fresh, &raw(&["new"])));
		assert!(!c.complete_fetch(stale, &raw(&["old"])));
		assert!(!c.fail_fetch(stale, "timeout"));
		let snapshot = c.snapshot().unwrap();
		assert_eq!(snapshot.payload.nodes[0].id, "new");
		assert_eq!(c.load_state(), &LoadState::Ready);
	}

	#[test]
	fn stale_result_arriving_first_is_still_ignored() {
		let mut c = controller();
		let stale = c.begin_fetch();
		let fresh = c.begin_fetch();
		assert!(!c.complete_fetch(stale, &raw(&["old"])));
		assert!(c.snapshot().is_none());
		assert_eq!(c.load_state(), &LoadState::Loading);
		assert!(c.complete_fetch(fresh, &raw(&["new"])));
	}

	#[test]
	fn failure_keeps_previous_payload() {
		let mut c = controller();
		let first = c.begin_fetch();
		c.complete_fetch(first, &raw(&["a"]));
		let second = c.begin_fetch();
		assert!(c.fail_fetch(second, "HTTP 500"));
		assert_eq!(c.load_state(), &LoadState::Failed("HTTP 500".into()));
		assert_eq!(c.snapshot().unwrap().payload.nodes.len(), 1);
	}

	#[test]
	fn refetch_clears_selection_but_filters_do_not() {
		let mut c = controller();
		let t = c.begin_fetch();
		c.complete_fetch(t, &raw(&["a"]));
		c.select_node(render_node("a"));
		c.set_search_term("zzz");
		c.set_node_label_filter("Memory");
		assert_eq!(c.selected().map(|n| n.id.as_str()), Some("a"));

		let t = c.begin_fetch();
		c.complete_fetch(t, &raw(&["a"]));
		assert!(c.selected().is_none());
		assert_eq!(c.criteria().search_term, "zzz");
		assert_eq!(c.snapshot().unwrap().version, 2);
	}

	#[test]
	fn filter_setters_parse_control_values() {
		let mut c = controller();
		c.set_node_label_filter("Concept");
		c.set_relationship_type_filter("all");
		assert!(!c.criteria().is_unrestricted());
		assert_eq!(c.criteria().node_label, FacetFilter::Only("Concept".into()));
		assert_eq!(c.criteria().relationship_type, FacetFilter::All);
		c.reset_filters();
		assert!(c.criteria().is_unrestricted());
	}

	#[test]
	fn only_changed_limits_request_a_fetch() {
		let mut c = controller();
		assert!(!c.set_limits(FetchLimits::default()));
		assert!(c.set_limits(FetchLimits::new(10, 20).unwrap()));
		assert_eq!(c.limits(), FetchLimits::new(10, 20).unwrap());
	}

	#[test]
	fn rendered_view_is_fitted_once() {
		let mut c = controller();
		// Redeeming needs no clock, so an early or late timer still fits.
		let ticket = c.note_render(&key(1, ""), true).unwrap();
		let cmd = c.poll_fit(ticket).unwrap();
		assert_eq!(cmd.seq, 1);
		assert_eq!(cmd.padding, 40.0);
		assert!(c.poll_fit(ticket).is_none());
	}

	#[test]
	fn keystrokes_collapse_into_one_fit() {
		let mut c = controller();
		let first = c.note_render(&key(1, "a"), true).unwrap();
		let second = c.note_render(&key(1, "al"), true).unwrap();
		let last = c.note_render(&key(1, "alp"), true).unwrap();
		assert!(c.poll_fit(first).is_none());
		assert!(c.poll_fit(second).is_none());
		assert_eq!(c.poll_fit(last).map(|cmd| cmd.seq), Some(1));
		assert!(c.poll_fit(last).is_none());
	}

	#[test]
	fn same_view_is_not_refitted() {
		let mut c = controller();
		let ticket = c.note_render(&key(1, ""), true).unwrap();
		c.poll_fit(ticket).unwrap();
		assert!(c.note_render(&key(1, ""), true).is_none());
		let ticket = c.note_render(&key(2, ""), true).unwrap();
		assert_eq!(c.poll_fit(ticket).map(|cmd| cmd.seq), Some(2));
	}

	#[test]
	fn empty_view_cancels_pending_fit() {
		let mut c = controller();
		let ticket = c.note_render(&key(1, ""), true).unwrap();
		assert!(c.note_render(&key(1, "nothing matches"), false).is_none());
		assert!(c.poll_fit(ticket).is_none());
	}

	#[test]
	fn returning_to_an_unfitted_view_still_fits() {
		let mut c = controller();
		let stale = c.note_render(&key(1, "a"), true).unwrap();
		let ticket = c.note_render(&key(1, ""), true).unwrap();
		assert!(c.poll_fit(stale).is_none());
		assert!(c.poll_fit(ticket).is_some());
		let ticket = c.note_render(&key(1, "a"), true).unwrap();
		assert!(c.poll_fit(ticket).is_some());
	}
}
