//! Weight-dependent sizing for graph visuals.
//!
//! Every visual dimension is derived from the extremes of the current
//! dataset, so any snapshot fills the same visual range regardless of its
//! absolute weights:
//!
//! - The heaviest client renders at `base_radius * max_radius_factor`; every
//!   other node scales proportionally with a floor of `min_radius`.
//! - The thickest link renders at the full stroke width; every other link
//!   scales proportionally, rounded up, with a floor of one pixel.
//! - Link rest distances are inversely proportional to the link weight and
//!   anchored on the *thinnest* link, which therefore settles at
//!   `min(width, height)` and pushes weaker pairs towards the canvas edge.
//!
//! All of these are computed once per dataset load and read thereafter by
//! the simulation, the renderer, and the hover handlers.

use super::types::GraphData;

/// Sizing parameters for the weight mapping.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Base node radius.
	pub base_radius: f64,
	/// Smallest radius any node may render at.
	pub min_radius: f64,
	/// The heaviest node renders at `base_radius * max_radius_factor`.
	pub max_radius_factor: f64,
	/// Stroke width of the thickest link; everything else scales down from it.
	pub max_stroke_width: f64,
	/// Hovered nodes grow to `final_radius * hover_growth`...
	pub hover_growth: f64,
	/// ...but never below `base_radius * hover_floor`, so small nodes still
	/// visibly react.
	pub hover_floor: f64,
	/// Minimum hit-test radius, to keep small nodes clickable.
	pub hit_radius: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			base_radius: 10.0,
			min_radius: 5.0,
			max_radius_factor: 5.0,
			max_stroke_width: 10.0,
			hover_growth: 1.5,
			hover_floor: 2.5,
			hit_radius: 12.0,
		}
	}
}

/// Per-dataset visual values, computed once per load.
///
/// The vectors run parallel to the node and link lists of the dataset they
/// were computed from.
#[derive(Clone, Debug, Default)]
pub struct LayoutScale {
	/// Final node radii.
	pub radii: Vec<f64>,
	/// Link stroke widths, each in `1..=max_stroke_width`.
	pub stroke_widths: Vec<f64>,
	/// Per-link rest distances for the simulation.
	pub link_distances: Vec<f64>,
}

impl LayoutScale {
	/// Compute all weight-derived sizes for one dataset.
	pub fn compute(data: &GraphData, config: &ScaleConfig, width: f64, height: f64) -> Self {
		let max_radius = config.base_radius * config.max_radius_factor;
		let heaviest = data.nodes.iter().map(|n| n.sum).fold(0.0_f64, f64::max);
		let radius_ratio = if heaviest > 0.0 {
			max_radius / heaviest
		} else {
			0.0
		};
		let radii = data
			.nodes
			.iter()
			.map(|n| (n.sum * radius_ratio).max(config.min_radius))
			.collect();

		let thickest = data.links.iter().map(|l| l.value).fold(0.0_f64, f64::max);
		let stroke_widths = data
			.links
			.iter()
			.map(|l| {
				if thickest > 0.0 {
					((l.value / thickest) * config.max_stroke_width).ceil().max(1.0)
				} else {
					1.0
				}
			})
			.collect();

		let thinnest = data
			.links
			.iter()
			.map(|l| l.value)
			.fold(f64::INFINITY, f64::min);
		let anchor = if thinnest.is_finite() {
			width.min(height) * thinnest
		} else {
			0.0
		};
		let link_distances = data
			.links
			.iter()
			.map(|l| if l.value > 0.0 { anchor / l.value } else { 0.0 })
			.collect();

		Self {
			radii,
			stroke_widths,
			link_distances,
		}
	}
}

/// Radius a node's circle animates towards while hovered: half again its
/// size, floored so even minimum-size nodes grow noticeably.
pub fn hover_radius(final_radius: f64, config: &ScaleConfig) -> f64 {
	(final_radius * config.hover_growth).max(config.base_radius * config.hover_floor)
}

/// Stable link identifier `"{source}_{target}_{value}"`.
pub fn link_ident(source: &str, target: &str, value: f64) -> String {
	format!("{source}_{target}_{value}")
}

/// Recover the weight from a link identifier: the token after the last
/// underscore. Client names may themselves contain underscores, which is why
/// the weight always goes last.
pub fn ident_weight(ident: &str) -> Option<f64> {
	ident.rsplit('_').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::client_graph::types::{GraphLink, GraphNode};

	fn node(name: &str, sum: f64) -> GraphNode {
		GraphNode {
			name: name.into(),
			sum,
			group: 0,
		}
	}

	fn link(source: usize, target: usize, value: f64) -> GraphLink {
		GraphLink {
			source,
			target,
			value,
		}
	}

	fn data(nodes: Vec<GraphNode>, links: Vec<GraphLink>) -> GraphData {
		GraphData { nodes, links }
	}

	#[test]
	fn heaviest_node_renders_at_five_times_base_radius() {
		let d = data(vec![node("a", 10.0), node("b", 50.0)], vec![]);
		let scale = LayoutScale::compute(&d, &ScaleConfig::default(), 800.0, 600.0);
		assert_eq!(scale.radii, vec![10.0, 50.0]);
	}

	#[test]
	fn tiny_nodes_are_floored_at_min_radius() {
		let d = data(vec![node("a", 1.0), node("b", 200.0)], vec![]);
		let scale = LayoutScale::compute(&d, &ScaleConfig::default(), 800.0, 600.0);
		// 1.0 * (50 / 200) = 0.25, well under the floor
		assert_eq!(scale.radii, vec![5.0, 50.0]);
	}

	#[test]
	fn all_zero_sums_fall_back_to_min_radius() {
		let d = data(vec![node("a", 0.0), node("b", 0.0)], vec![]);
		let scale = LayoutScale::compute(&d, &ScaleConfig::default(), 800.0, 600.0);
		assert_eq!(scale.radii, vec![5.0, 5.0]);
	}

	#[test]
	fn stroke_widths_round_up_into_full_range() {
		let d = data(
			vec![node("a", 1.0), node("b", 1.0)],
			vec![link(0, 1, 1.0), link(0, 1, 4.0), link(0, 1, 10.0)],
		);
		let scale = LayoutScale::compute(&d, &ScaleConfig::default(), 800.0, 600.0);
		assert_eq!(scale.stroke_widths, vec![1.0, 4.0, 10.0]);
	}

	#[test]
	fn thickest_link_renders_at_exactly_max_width() {
		let d = data(
			vec![node("a", 1.0), node("b", 1.0)],
			vec![link(0, 1, 3.0), link(0, 1, 7.0)],
		);
		let scale = LayoutScale::compute(&d, &ScaleConfig::default(), 800.0, 600.0);
		assert_eq!(*scale.stroke_widths.last().unwrap(), 10.0);
		assert!(scale.stroke_widths.iter().all(|w| (1.0..=10.0).contains(w)));
	}

	#[test]
	fn faint_links_are_floored_at_one_pixel() {
		let d = data(
			vec![node("a", 1.0), node("b", 1.0)],
			vec![link(0, 1, 1.0), link(0, 1, 1000.0)],
		);
		let scale = LayoutScale::compute(&d, &ScaleConfig::default(), 800.0, 600.0);
		assert_eq!(scale.stroke_widths[0], 1.0);
	}

	#[test]
	fn link_distances_anchor_on_the_thinnest_link() {
		let d = data(
			vec![node("a", 1.0), node("b", 1.0)],
			vec![link(0, 1, 5.0), link(0, 1, 10.0)],
		);
		let scale = LayoutScale::compute(&d, &ScaleConfig::default(), 800.0, 600.0);
		// anchor = min(800, 600) * 5 = 3000
		assert_eq!(scale.link_distances, vec![600.0, 300.0]);
	}

	#[test]
	fn link_distances_decrease_with_weight() {
		let d = data(
			vec![node("a", 1.0), node("b", 1.0)],
			vec![link(0, 1, 2.0), link(0, 1, 3.0), link(0, 1, 8.0)],
		);
		let scale = LayoutScale::compute(&d, &ScaleConfig::default(), 800.0, 600.0);
		assert!(scale.link_distances[0] > scale.link_distances[1]);
		assert!(scale.link_distances[1] > scale.link_distances[2]);
	}

	#[test]
	fn empty_dataset_produces_empty_scale() {
		let scale =
			LayoutScale::compute(&GraphData::default(), &ScaleConfig::default(), 800.0, 600.0);
		assert!(scale.radii.is_empty());
		assert!(scale.stroke_widths.is_empty());
		assert!(scale.link_distances.is_empty());
	}

	#[test]
	fn hover_radius_grows_large_nodes_and_floors_small_ones() {
		let config = ScaleConfig::default();
		assert_eq!(hover_radius(50.0, &config), 75.0);
		// 10 * 1.5 = 15 loses to the 25.0 floor
		assert_eq!(hover_radius(10.0, &config), 25.0);
		assert_eq!(hover_radius(5.0, &config), 25.0);
	}

	#[test]
	fn ident_round_trips_weights() {
		let ident = link_ident("alpha", "beta", 5.0);
		assert_eq!(ident, "alpha_beta_5");
		assert_eq!(ident_weight(&ident), Some(5.0));

		let ident = link_ident("acme_east", "acme_west", 2.5);
		assert_eq!(ident, "acme_east_acme_west_2.5");
		assert_eq!(ident_weight(&ident), Some(2.5));
	}

	#[test]
	fn ident_weight_rejects_garbage() {
		assert_eq!(ident_weight("no trailing weight"), None);
		assert_eq!(ident_weight("a_b_"), None);
	}
}
