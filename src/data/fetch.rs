//! Graph dataset retrieval.
//!
//! [`ClientGraphModel`] owns the endpoint configuration and the retained
//! [`FilterSet`]. Callers merge filter updates, then fetch the dataset; the
//! model stays borrowable while the request is in flight because
//! [`ClientGraphModel::prepare`] snapshots everything the request needs into
//! a [`PreparedFetch`] first.
//!
//! No retry and no cancellation: a fetch either resolves, fails, or times
//! out. When callers fire overlapping fetches, whichever response they apply
//! last wins.

use futures::future::{select, Either};
use futures::pin_mut;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use thiserror::Error;

use crate::components::client_graph::GraphData;
use crate::data::filters::FilterSet;

/// Where and how long.
#[derive(Clone, Debug, PartialEq)]
pub struct EndpointConfig {
	/// Dataset endpoint, without a query string.
	pub base_url: String,
	/// Wall-clock budget for a single fetch.
	pub timeout_ms: u32,
}

impl Default for EndpointConfig {
	fn default() -> Self {
		Self {
			base_url: "http://localhost:3000/clientGraph".to_string(),
			timeout_ms: 20_000,
		}
	}
}

/// Why a fetch produced no dataset.
#[derive(Debug, Error)]
pub enum FetchError {
	#[error("request exceeded {0}ms")]
	TimedOut(u32),
	#[error("request failed: {0}")]
	Transport(#[from] gloo_net::Error),
	#[error("server answered {0}")]
	Status(u16),
	#[error("response is not a graph dataset: {0}")]
	Decode(serde_json::Error),
}

/// Endpoint plus retained filters.
#[derive(Clone, Debug, Default)]
pub struct ClientGraphModel {
	config: EndpointConfig,
	filters: FilterSet,
}

impl ClientGraphModel {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(config: EndpointConfig) -> Self {
		Self {
			config,
			filters: FilterSet::new(),
		}
	}

	/// Merge `partial` into the retained filters. Existing keys are
	/// overwritten, everything else is kept.
	pub fn set_filters(&mut self, partial: FilterSet) {
		self.filters.merge(partial);
	}

	pub fn filters(&self) -> &FilterSet {
		&self.filters
	}

	/// Request URL for the current filters. No trailing `?` when the
	/// filter set is empty.
	pub fn url(&self) -> String {
		if self.filters.is_empty() {
			self.config.base_url.clone()
		} else {
			format!("{}?{}", self.config.base_url, self.filters.query_string())
		}
	}

	/// Merge `partial`, then snapshot a request. The returned value borrows
	/// nothing, so the model is free again before the request resolves.
	pub fn prepare(&mut self, partial: FilterSet) -> PreparedFetch {
		self.set_filters(partial);
		PreparedFetch {
			url: self.url(),
			timeout_ms: self.config.timeout_ms,
		}
	}
}

/// A snapshot of one request, ready to send.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedFetch {
	url: String,
	timeout_ms: u32,
}

impl PreparedFetch {
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Fetch and decode the dataset, racing the request against the
	/// configured timeout. A cache-busting `_` parameter is stamped per
	/// request so intermediaries never serve a stale dataset.
	pub async fn send(self) -> Result<GraphData, FetchError> {
		let separator = if self.url.contains('?') { '&' } else { '?' };
		let url = format!("{}{}_={}", self.url, separator, js_sys::Date::now() as u64);

		let request = async {
			let response = Request::get(&url).send().await?;
			if !response.ok() {
				return Err(FetchError::Status(response.status()));
			}
			response.json::<GraphData>().await.map_err(|err| match err {
				gloo_net::Error::SerdeError(serde) => FetchError::Decode(serde),
				other => FetchError::Transport(other),
			})
		};
		let deadline = TimeoutFuture::new(self.timeout_ms);
		pin_mut!(request);
		pin_mut!(deadline);

		match select(request, deadline).await {
			Either::Left((outcome, _)) => outcome,
			Either::Right(((), _)) => Err(FetchError::TimedOut(self.timeout_ms)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_point_at_the_local_endpoint() {
		let config = EndpointConfig::default();
		assert_eq!(config.base_url, "http://localhost:3000/clientGraph");
		assert_eq!(config.timeout_ms, 20_000);
	}

	#[test]
	fn url_without_filters_has_no_query() {
		let model = ClientGraphModel::new();
		assert_eq!(model.url(), "http://localhost:3000/clientGraph");
	}

	#[test]
	fn url_reflects_the_retained_filters() {
		let mut model = ClientGraphModel::new();
		let mut filters = FilterSet::new();
		filters.insert("timeFrame", "LAST_30_DAYS");
		filters.insert("minWeight", 30i64);
		model.set_filters(filters);

		assert_eq!(
			model.url(),
			"http://localhost:3000/clientGraph?timeFrame=LAST_30_DAYS&minWeight=30"
		);
	}

	#[test]
	fn filters_survive_across_updates() {
		let mut model = ClientGraphModel::new();
		let mut first = FilterSet::new();
		first.insert("timeFrame", "LAST_30_DAYS");
		first.insert("minWeight", 30i64);
		model.set_filters(first);

		let mut second = FilterSet::new();
		second.insert("minWeight", 75i64);
		let prepared = model.prepare(second);

		assert_eq!(
			prepared.url(),
			"http://localhost:3000/clientGraph?timeFrame=LAST_30_DAYS&minWeight=75"
		);
	}

	#[test]
	fn prepare_snapshots_the_timeout() {
		let mut model = ClientGraphModel::with_config(EndpointConfig {
			base_url: "https://graphs.example/api".to_string(),
			timeout_ms: 500,
		});
		let prepared = model.prepare(FilterSet::new());

		assert_eq!(prepared.url(), "https://graphs.example/api");
		assert_eq!(
			prepared,
			PreparedFetch {
				url: "https://graphs.example/api".to_string(),
				timeout_ms: 500,
			}
		);
	}
}
