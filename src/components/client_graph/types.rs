//! Graph data structures returned by the client graph endpoint.

use serde::Deserialize;

/// A client node in the interaction graph.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Client name. Doubles as the display label and the drill-down key.
	pub name: String,
	/// Aggregate interaction weight across all of this client's links.
	pub sum: f64,
	/// Palette group index (0 or 1).
	pub group: u8,
}

/// A weighted link between two clients.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	/// Index of the source node in [`GraphData::nodes`].
	pub source: usize,
	/// Index of the target node in [`GraphData::nodes`].
	pub target: usize,
	/// Interaction weight. Must be positive; links that are not are dropped
	/// at load time.
	pub value: f64,
}

/// Complete graph snapshot: clients and their weighted links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}
