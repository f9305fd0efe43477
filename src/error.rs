//! Error types for configuration and fetching.

use thiserror::Error;

/// Invalid dashboard configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// A numeric setting did not parse.
	#[error("`{key}` must be a number, got {value:?}")]
	InvalidNumber {
		/// Query key of the setting.
		key: &'static str,
		/// The rejected text.
		value: String,
	},

	/// A fetch limit was zero.
	#[error("`{key}` must be greater than zero")]
	ZeroLimit {
		/// Query key of the limit.
		key: &'static str,
	},

	/// The endpoint could not be resolved to an absolute URL.
	#[error("invalid graph endpoint {endpoint:?}: {source}")]
	InvalidEndpoint {
		/// The configured endpoint.
		endpoint: String,
		/// Why it failed to parse.
		#[source]
		source: url::ParseError,
	},
}

/// Failure to retrieve a graph payload.
#[derive(Debug, Error)]
pub enum FetchError {
	/// The request could not be sent or the body was not JSON.
	#[error("graph request failed: {0}")]
	Request(#[from] reqwest::Error),

	/// The endpoint answered with a non-success status.
	#[error("graph endpoint returned HTTP {status}")]
	Status {
		/// HTTP status code.
		status: u16,
	},
}
