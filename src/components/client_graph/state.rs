//! Graph state and interaction tracking.
//!
//! Owns the layout engine plus the per-node visual metadata derived from the
//! weight mapping, and tracks hover, pinning, and drag state between frames.
//! Hover enlargement and link highlighting animate with smooth per-node
//! intensities rather than discrete on/off flips.

use std::collections::HashMap;
use std::f64::consts::PI;

use super::scale::{LayoutScale, ScaleConfig, ident_weight, link_ident};
use super::sim::{Body, LayoutEngine, Spring, SpringLayout};
use super::types::GraphData;

/// Per-node display metadata resolved at load time.
#[derive(Clone, Debug)]
pub struct NodeVisual {
	pub name: String,
	/// Palette group index.
	pub group: u8,
	/// Weight-scaled radius, fixed for the lifetime of the dataset.
	pub final_radius: f64,
}

/// Per-link display metadata resolved at load time.
#[derive(Clone, Debug)]
pub struct LinkVisual {
	pub source: usize,
	pub target: usize,
	pub value: f64,
	pub stroke_width: f64,
	/// Stable identifier carrying both endpoint names and the weight.
	pub ident: String,
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<usize>,
	/// Offset from the pointer to the grabbed body center, so the node does
	/// not jump under the cursor.
	grab_dx: f64,
	grab_dy: f64,
}

/// Manages smooth highlight transitions with per-node intensity tracking.
///
/// Each node has its own intensity (0.0 to 1.0) animated towards 1.0 while
/// hovered and back to 0.0 afterwards, using exponential smoothing so the
/// enlargement eases out as it completes.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	/// Currently hovered node (if any)
	pub hovered: Option<usize>,
	/// Per-node highlight intensity. Nodes not in this map are at 0.
	intensity: HashMap<usize, f64>,
	/// Cached max intensity (updated each tick)
	cached_max: f64,
}

/// Smoothing speed for both fade directions. Reaches ~95% of the target in
/// roughly 100 ms.
const FADE_SPEED: f64 = 30.0;

impl HighlightState {
	pub fn set_hover(&mut self, node: Option<usize>) {
		self.hovered = node;
	}

	/// Animate all intensities towards their targets.
	pub fn tick(&mut self, dt: f64) {
		let fade_in = 1.0 - (-FADE_SPEED * dt).exp();
		let fade_out = (-FADE_SPEED * dt).exp();

		if let Some(ix) = self.hovered {
			let intensity = self.intensity.entry(ix).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in;
		}

		let mut new_max: f64 = 0.0;
		let hovered = self.hovered;
		self.intensity.retain(|ix, intensity| {
			if hovered == Some(*ix) {
				new_max = new_max.max(*intensity);
				true
			} else {
				*intensity *= fade_out;
				new_max = new_max.max(*intensity);
				*intensity > 0.005
			}
		});
		self.cached_max = new_max;
	}

	/// Smoothed highlight intensity for a node.
	pub fn node_intensity(&self, ix: usize) -> f64 {
		self.intensity.get(&ix).copied().unwrap_or(0.0)
	}

	/// Intensity for a link: it lights up as soon as either endpoint does.
	pub fn link_intensity(&self, source: usize, target: usize) -> f64 {
		self.node_intensity(source).max(self.node_intensity(target))
	}

	/// Maximum intensity of any node.
	pub fn max_intensity(&self) -> f64 {
		self.cached_max
	}
}

/// Core graph state combining the layout engine with interaction tracking.
///
/// Created once when the component mounts, reloaded in place whenever a new
/// dataset arrives, and mutated each frame by the animation loop.
pub struct ClientGraphState {
	engine: Box<dyn LayoutEngine>,
	pub nodes: Vec<NodeVisual>,
	pub links: Vec<LinkVisual>,
	pub highlight: HighlightState,
	pub drag: DragState,
	pub config: ScaleConfig,
	pub width: f64,
	pub height: f64,
	show_weight: bool,
	/// Weight annotations keyed by node index, populated while a neighbor is
	/// hovered in weight-display mode.
	weight_notes: HashMap<usize, f64>,
}

impl ClientGraphState {
	pub fn new(width: f64, height: f64, config: ScaleConfig) -> Self {
		Self::with_engine(Box::new(SpringLayout::new(width, height)), width, height, config)
	}

	pub fn with_engine(
		engine: Box<dyn LayoutEngine>,
		width: f64,
		height: f64,
		config: ScaleConfig,
	) -> Self {
		Self {
			engine,
			nodes: Vec::new(),
			links: Vec::new(),
			highlight: HighlightState::default(),
			drag: DragState::default(),
			config,
			width,
			height,
			show_weight: false,
			weight_notes: HashMap::new(),
		}
	}

	/// Replace the current dataset wholesale and restart the simulation.
	///
	/// Node positions are seeded on a ring around the canvas center so the
	/// layout unfolds the same way for the same data. Links whose endpoints
	/// fall outside the node list, or whose value is not positive, are
	/// dropped.
	pub fn load(&mut self, data: &GraphData, show_weight: bool) {
		let scale = LayoutScale::compute(data, &self.config, self.width, self.height);
		let n = data.nodes.len();

		self.nodes = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| NodeVisual {
				name: node.name.clone(),
				group: node.group,
				final_radius: scale.radii[i],
			})
			.collect();

		let mut bodies = Vec::with_capacity(n);
		for i in 0..n {
			let angle = i as f64 * 2.0 * PI / n as f64;
			bodies.push(Body::at(
				self.width / 2.0 + 100.0 * angle.cos(),
				self.height / 2.0 + 100.0 * angle.sin(),
			));
		}

		self.links.clear();
		let mut springs = Vec::new();
		for (i, link) in data.links.iter().enumerate() {
			if link.source >= n || link.target >= n || link.value <= 0.0 {
				continue;
			}
			self.links.push(LinkVisual {
				source: link.source,
				target: link.target,
				value: link.value,
				stroke_width: scale.stroke_widths[i],
				ident: link_ident(
					&data.nodes[link.source].name,
					&data.nodes[link.target].name,
					link.value,
				),
			});
			springs.push(Spring {
				source: link.source,
				target: link.target,
				rest_length: scale.link_distances[i],
			});
		}

		self.engine.load(bodies, springs);
		self.engine.start();
		self.highlight = HighlightState::default();
		self.drag = DragState::default();
		self.weight_notes.clear();
		self.show_weight = show_weight;
	}

	pub fn bodies(&self) -> &[Body] {
		self.engine.bodies()
	}

	/// Topmost node under the pointer, if any. Small nodes get a padded hit
	/// zone so they stay clickable.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		let mut found = None;
		for (ix, (node, body)) in self.nodes.iter().zip(self.engine.bodies()).enumerate() {
			let hit = node.final_radius.max(self.config.hit_radius);
			let (dx, dy) = (body.x - x, body.y - y);
			if (dx * dx + dy * dy).sqrt() < hit {
				found = Some(ix);
			}
		}
		found
	}

	/// Update the hovered node, refreshing link highlights and, in
	/// weight-display mode, the weight annotations on the far endpoint of
	/// every incident link.
	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.highlight.hovered == node {
			return;
		}
		self.highlight.set_hover(node);
		self.weight_notes.clear();

		let Some(ix) = node else {
			return;
		};
		if !self.show_weight {
			return;
		}
		for link in &self.links {
			let other = if link.source == ix {
				link.target
			} else if link.target == ix {
				link.source
			} else {
				continue;
			};
			let weight = ident_weight(&link.ident).unwrap_or(link.value);
			self.weight_notes.insert(other, weight);
		}
	}

	/// Pin a node in place. Pinned nodes stop responding to simulation
	/// forces but remain draggable. There is no unpin gesture.
	pub fn pin(&mut self, ix: usize) {
		self.engine.set_pinned(ix, true);
	}

	pub fn begin_drag(&mut self, ix: usize, x: f64, y: f64) {
		let body = &self.engine.bodies()[ix];
		self.drag = DragState {
			active: true,
			node: Some(ix),
			grab_dx: body.x - x,
			grab_dy: body.y - y,
		};
	}

	/// Move the dragged node to follow the pointer and reheat the
	/// simulation so its neighbors reflow around it.
	pub fn drag_to(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			return;
		}
		let Some(ix) = self.drag.node else {
			return;
		};
		self.engine
			.move_body(ix, x + self.drag.grab_dx, y + self.drag.grab_dy);
		self.engine.resume();
	}

	pub fn end_drag(&mut self) {
		self.drag = DragState::default();
	}

	/// Advance one frame: step the simulation, keep every node fully inside
	/// the canvas (each clamped by its own radius), and animate highlight
	/// intensities.
	pub fn tick(&mut self, dt: f64) {
		if self.engine.tick() {
			let (w, h) = (self.width, self.height);
			for (node, body) in self.nodes.iter().zip(self.engine.bodies_mut()) {
				let r = node.final_radius;
				body.x = body.x.min(w - r).max(r);
				body.y = body.y.min(h - r).max(r);
			}
		}
		self.highlight.tick(dt);
	}

	/// Label for a node: its name, plus the link weight while annotated.
	pub fn label_text(&self, ix: usize) -> String {
		let name = &self.nodes[ix].name;
		match self.weight_notes.get(&ix) {
			Some(weight) => format!("{name} ({weight})"),
			None => name.clone(),
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.engine.set_size(width, height);
	}
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

	fn triangle() -> GraphData {
		GraphData {
			nodes: vec![node("alpha", 10.0), node("beta", 50.0), node("gamma", 25.0)],
			links: vec![link(0, 1, 5.0), link(1, 2, 10.0)],
		}
	}

	fn loaded(data: &GraphData, show_weight: bool) -> ClientGraphState {
		let mut state = ClientGraphState::new(800.0, 600.0, ScaleConfig::default());
		state.load(data, show_weight);
		state
	}

	#[test]
	fn load_resolves_nodes_and_drops_bad_links() {
		let data = GraphData {
			nodes: vec![node("a", 10.0), node("b", 20.0)],
			links: vec![link(0, 1, 5.0), link(0, 9, 3.0), link(1, 0, 0.0)],
		};
		let state = loaded(&data, false);
		assert_eq!(state.nodes.len(), 2);
		assert_eq!(state.bodies().len(), 2);
		assert_eq!(state.links.len(), 1);
		assert_eq!(state.links[0].ident, "a_b_5");
	}

	#[test]
	fn load_applies_the_weight_mapping() {
		let state = loaded(&triangle(), false);
		let radii: Vec<f64> = state.nodes.iter().map(|n| n.final_radius).collect();
		assert_eq!(radii, vec![10.0, 50.0, 25.0]);
		assert_eq!(state.links[0].stroke_width, 5.0);
		assert_eq!(state.links[1].stroke_width, 10.0);
	}

	#[test]
	fn reload_replaces_the_dataset_wholesale() {
		let mut state = loaded(&triangle(), true);
		state.set_hover(Some(1));
		state.load(
			&GraphData {
				nodes: vec![node("solo", 5.0)],
				links: vec![],
			},
			true,
		);
		assert_eq!(state.nodes.len(), 1);
		assert!(state.links.is_empty());
		assert_eq!(state.highlight.hovered, None);
		assert_eq!(state.label_text(0), "solo");
	}

	#[test]
	fn hover_annotates_the_far_endpoint_with_the_link_weight() {
		let mut state = loaded(&triangle(), true);
		state.set_hover(Some(1));
		assert_eq!(state.label_text(0), "alpha (5)");
		assert_eq!(state.label_text(2), "gamma (10)");
		assert_eq!(state.label_text(1), "beta");

		state.set_hover(None);
		assert_eq!(state.label_text(0), "alpha");
		assert_eq!(state.label_text(2), "gamma");
	}

	#[test]
	fn hover_leaves_labels_alone_without_weight_display() {
		let mut state = loaded(&triangle(), false);
		state.set_hover(Some(1));
		assert_eq!(state.label_text(0), "alpha");
	}

	#[test]
	fn hover_intensity_reaches_incident_links_only() {
		let mut state = loaded(&triangle(), false);
		state.set_hover(Some(0));
		for _ in 0..30 {
			state.tick(0.016);
		}
		assert!(state.highlight.link_intensity(0, 1) > 0.9);
		assert!(state.highlight.link_intensity(1, 2) < 0.01);
	}

	#[test]
	fn unhover_fades_back_out() {
		let mut state = loaded(&triangle(), false);
		state.set_hover(Some(0));
		for _ in 0..30 {
			state.tick(0.016);
		}
		state.set_hover(None);
		for _ in 0..60 {
			state.tick(0.016);
		}
		assert!(state.highlight.node_intensity(0) < 0.01);
		assert!(state.highlight.max_intensity() < 0.01);
	}

	#[test]
	fn pinned_nodes_survive_simulation_ticks() {
		let mut state = loaded(&triangle(), false);
		state.pin(0);
		let (x, y) = (state.bodies()[0].x, state.bodies()[0].y);
		for _ in 0..50 {
			state.tick(0.016);
		}
		assert_eq!((state.bodies()[0].x, state.bodies()[0].y), (x, y));
	}

	#[test]
	fn dragging_moves_a_pinned_node_and_keeps_it_inside() {
		let mut state = loaded(&triangle(), false);
		state.pin(0);
		let body = &state.bodies()[0];
		let (bx, by) = (body.x, body.y);
		state.begin_drag(0, bx, by);
		state.drag_to(bx + 40.0, by - 30.0);
		assert_eq!(state.bodies()[0].x, bx + 40.0);
		assert_eq!(state.bodies()[0].y, by - 30.0);

		// Dragging far outside is clamped back on the next tick
		state.drag_to(-500.0, 5000.0);
		state.tick(0.016);
		let held = &state.bodies()[0];
		assert!(held.x >= 10.0 && held.x <= 790.0);
		assert!(held.y >= 10.0 && held.y <= 590.0);
	}

	#[test]
	fn hit_testing_pads_small_nodes() {
		let data = GraphData {
			nodes: vec![node("tiny", 1.0), node("huge", 200.0)],
			links: vec![],
		};
		let mut state = loaded(&data, false);
		// Park the tiny node (radius 5) somewhere known
		state.pin(0);
		state.begin_drag(0, state.bodies()[0].x, state.bodies()[0].y);
		state.drag_to(200.0, 200.0);
		state.end_drag();

		assert_eq!(state.node_at_position(209.0, 200.0), Some(0));
		assert_eq!(state.node_at_position(215.0, 200.0), None);
	}

	#[test]
	fn hit_testing_honors_large_radii() {
		let data = GraphData {
			nodes: vec![node("huge", 100.0)],
			links: vec![],
		};
		let mut state = loaded(&data, false);
		state.pin(0);
		state.begin_drag(0, state.bodies()[0].x, state.bodies()[0].y);
		state.drag_to(400.0, 300.0);
		state.end_drag();

		// Radius 50: hits well outside the default hit padding
		assert_eq!(state.node_at_position(445.0, 300.0), Some(0));
		assert_eq!(state.node_at_position(455.0, 300.0), None);
	}
}
