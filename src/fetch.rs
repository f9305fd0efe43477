//! HTTP retrieval of raw graph payloads.

use log::info;
use serde_json::Value;
use url::Url;

use crate::config::FetchLimits;
use crate::error::FetchError;

/// Client for one graph endpoint.
pub struct GraphFetcher {
	client: reqwest::Client,
	endpoint: Url,
}

impl GraphFetcher {
	/// Fetcher for an absolute endpoint URL.
	pub fn new(endpoint: Url) -> Self {
		Self {
			client: reqwest::Client::new(),
			endpoint,
		}
	}

	/// Request URL for `limits`.
	pub fn request_url(&self, limits: FetchLimits) -> Url {
		let mut url = self.endpoint.clone();
		url.query_pairs_mut()
			.append_pair("node_limit", &limits.node_limit.to_string())
			.append_pair("rel_limit", &limits.rel_limit.to_string());
		url
	}

	/// Fetch the raw, unnormalized payload.
	pub async fn fetch(&self, limits: FetchLimits) -> Result<Value, FetchError> {
		let url = self.request_url(limits);
		info!("fetching graph from {}", url);

		let response = self.client.get(url).send().await?;
		let status = response.status();
		if !status.is_success() {
			return Err(FetchError::Status {
				status: status.as_u16(),
			});
		}
		Ok(response.json::<Value>().await?)
	}
}
