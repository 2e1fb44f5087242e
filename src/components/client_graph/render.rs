//! Canvas rendering for the client graph.
//!
//! Drawing happens in passes for correct z-ordering: background, links, then
//! nodes, with highlighted nodes drawn last so their enlarged circles sit on
//! top. Labels are always visible; a highlighted node's label slides from its
//! offset position onto the node itself.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale::hover_radius;
use super::state::ClientGraphState;
use super::theme::{Color, Theme};

/// Label offset from the node center while not highlighted.
const LABEL_DX: f64 = 16.0;
const LABEL_DY: f64 = 11.0;

/// Attempt to smooth values that would otherwise cause abrupt visual changes.
fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete graph to the canvas.
pub fn render(state: &ClientGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	draw_background(state, ctx, theme);
	draw_links(state, ctx, theme);
	draw_nodes(state, ctx, theme);
}

fn draw_background(state: &ClientGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	if theme.background.use_gradient {
		let gradient = ctx
			.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				(state.width.max(state.height)) * 0.8,
			)
			.unwrap();

		gradient
			.add_color_stop(0.0, &theme.background.color_secondary.to_css())
			.unwrap();
		gradient
			.add_color_stop(1.0, &theme.background.color.to_css())
			.unwrap();

		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&theme.background.color.to_css());
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_links(state: &ClientGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let bodies = state.bodies();
	let max_t = smooth_step(state.highlight.max_intensity());

	for link in &state.links {
		let (source, target) = (&bodies[link.source], &bodies[link.target]);
		let link_t = smooth_step(state.highlight.link_intensity(link.source, link.target));

		let base = theme.link.color;
		let color = if link_t > 0.01 {
			base.lerp(theme.link.highlight_color, link_t)
		} else {
			// Recede a little while some other node is highlighted
			base.with_alpha(base.a * (1.0 - 0.4 * max_t))
		};

		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(link.stroke_width);
		ctx.begin_path();
		ctx.move_to(source.x, source.y);
		ctx.line_to(target.x, target.y);
		ctx.stroke();
	}
}

fn draw_nodes(state: &ClientGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let has_highlight = max_t > 0.01;

	// Pass 1: nodes at rest
	for (ix, node) in state.nodes.iter().enumerate() {
		if state.highlight.node_intensity(ix) > 0.001 {
			continue;
		}
		let alpha = if has_highlight { 1.0 - 0.3 * max_t } else { 1.0 };
		draw_node(state, ctx, theme, ix, node.final_radius, alpha, 0.0);
	}

	// Pass 2: highlighted and still-fading nodes on top
	for (ix, node) in state.nodes.iter().enumerate() {
		let node_t = state.highlight.node_intensity(ix);
		if node_t <= 0.001 {
			continue;
		}
		let eased = smooth_step(node_t);
		let radius = node.final_radius
			+ (hover_radius(node.final_radius, &state.config) - node.final_radius) * eased;
		draw_node(state, ctx, theme, ix, radius, 1.0, eased);
	}
}

fn draw_node(
	state: &ClientGraphState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	ix: usize,
	radius: f64,
	alpha: f64,
	highlight_t: f64,
) {
	let body = &state.bodies()[ix];
	let node = &state.nodes[ix];
	let (x, y) = (body.x, body.y);
	let color = theme.palette.get(node.group);

	ctx.set_global_alpha(alpha);

	if theme.node.use_gradient {
		let gradient = ctx
			.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
			.unwrap();

		let highlight = color.lighten(0.4);
		let shadow = color.darken(0.2);

		gradient.add_color_stop(0.0, &highlight.to_css()).unwrap();
		gradient.add_color_stop(0.7, &color.to_css()).unwrap();
		gradient.add_color_stop(1.0, &shadow.to_css()).unwrap();

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();
	} else {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&color.to_css());
		ctx.fill();
	}

	if body.pinned {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 3.0, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.node.sticky_ring.to_css());
		ctx.set_line_width(1.5);
		ctx.stroke();
	}

	draw_label(state, ctx, theme, ix, x, y, highlight_t);

	ctx.set_global_alpha(1.0);
}

fn draw_label(
	state: &ClientGraphState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	ix: usize,
	x: f64,
	y: f64,
	highlight_t: f64,
) {
	let color: Color = theme
		.node
		.label
		.lerp(theme.node.label_highlight, highlight_t);
	ctx.set_fill_style_str(&color.to_css());
	ctx.set_font(theme.node.label_font);

	// Slide from the offset position onto the node while highlighted
	let dx = LABEL_DX * (1.0 - highlight_t);
	let dy = LABEL_DY * (1.0 - highlight_t);
	let _ = ctx.fill_text(&state.label_text(ix), x + dx, y + dy);
}
