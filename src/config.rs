//! Dashboard settings, overridable from the page query string.

use std::str::FromStr;

use url::Url;

use crate::error::ConfigError;

/// Payload size bounds sent with every fetch. Both are positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchLimits {
	/// Upper bound on fetched nodes.
	pub node_limit: u32,
	/// Upper bound on fetched relationships.
	pub rel_limit: u32,
}

impl FetchLimits {
	/// Reject zero for either limit.
	pub fn new(node_limit: u32, rel_limit: u32) -> Result<Self, ConfigError> {
		if node_limit == 0 {
			return Err(ConfigError::ZeroLimit { key: "node_limit" });
		}
		if rel_limit == 0 {
			return Err(ConfigError::ZeroLimit { key: "rel_limit" });
		}
		Ok(Self {
			node_limit,
			rel_limit,
		})
	}
}

impl Default for FetchLimits {
	fn default() -> Self {
		Self {
			node_limit: 100,
			rel_limit: 200,
		}
	}
}

/// Settings for one explorer instance.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
	/// Graph endpoint; relative paths resolve against the page origin.
	pub endpoint: String,
	/// Initial fetch limits; the limit inputs change them later.
	pub limits: FetchLimits,
	/// Screen-space margin kept around the graph when fitting to view.
	pub fit_padding: f64,
	/// Quiet period after the last view change before fitting.
	pub fit_quiet_ms: u64,
}

impl Default for DashboardConfig {
	fn default() -> Self {
		Self {
			endpoint: "/api/graph".into(),
			limits: FetchLimits::default(),
			fit_padding: 40.0,
			fit_quiet_ms: 250,
		}
	}
}

impl DashboardConfig {
	/// Apply overrides from a query string such as `?node_limit=50`.
	/// Unknown keys are ignored.
	pub fn from_query(query: &str) -> Result<Self, ConfigError> {
		let mut config = Self::default();
		let (mut node_limit, mut rel_limit) = (config.limits.node_limit, config.limits.rel_limit);

		let query = query.strip_prefix('?').unwrap_or(query);
		for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
			match key.as_ref() {
				"endpoint" => config.endpoint = value.into_owned(),
				"node_limit" => node_limit = parse_number("node_limit", &value)?,
				"rel_limit" => rel_limit = parse_number("rel_limit", &value)?,
				"fit_padding" => config.fit_padding = parse_number("fit_padding", &value)?,
				"fit_quiet_ms" => config.fit_quiet_ms = parse_number("fit_quiet_ms", &value)?,
				_ => {}
			}
		}

		config.limits = FetchLimits::new(node_limit, rel_limit)?;
		Ok(config)
	}

	/// Absolute endpoint URL, resolving relative endpoints against `base`.
	pub fn endpoint_url(&self, base: &str) -> Result<Url, ConfigError> {
		let invalid = |source| ConfigError::InvalidEndpoint {
			endpoint: self.endpoint.clone(),
			source,
		};
		match Url::parse(&self.endpoint) {
			Ok(url) => Ok(url),
			Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(base)
				.and_then(|base| base.join(&self.endpoint))
				.map_err(invalid),
			Err(e) => Err(invalid(e)),
		}
	}
}

fn parse_number<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
	value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
		key,
		value: value.to_owned(),
	})
}
