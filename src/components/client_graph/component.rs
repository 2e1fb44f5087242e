//! Leptos component wrapping the client graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse event
//! handlers for hover highlighting, node pinning, dragging, and drill-down.
//! An animation loop runs via `requestAnimationFrame`, advancing the
//! simulation and redrawing each frame. New datasets arriving through the
//! reactive `data` signal are loaded into the existing state in place; the
//! canvas and the animation loop are created once.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::render;
use super::scale::ScaleConfig;
use super::state::ClientGraphState;
use super::theme::Theme;
use super::types::GraphData;

/// Bundles graph state with the visual theme.
struct GraphContext {
	state: ClientGraphState,
	theme: Theme,
}

/// Renders an interactive force-directed client graph on a canvas element.
///
/// Pass graph snapshots via the reactive `data` signal; each new snapshot
/// replaces the previous one without recreating the canvas. The component
/// sizes itself to its parent container by default; set `fullscreen = true`
/// to fill the viewport and resize with the window. Explicit `width`/`height`
/// override automatic sizing. With `show_weight` set, hovering a node
/// annotates its neighbors with the connecting link weights. Double-clicking
/// a node reports its name through `on_drill_down`.
#[component]
pub fn ClientGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(default = false)] show_weight: bool,
	#[prop(optional, into)] on_drill_down: Option<Callback<String>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let mut state = ClientGraphState::new(w, h, ScaleConfig::default());
		state.load(&data.get_untracked(), show_weight);
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			theme: Theme::default(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let dt = 0.016;
				c.state.tick(dt);
				render::render(&c.state, &ctx, &c.theme);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Later snapshots replace the dataset in place; the first load happens
	// when the canvas context is created above.
	let context_data = context.clone();
	Effect::new(move |prev: Option<()>| {
		let data = data.get();
		if prev.is_some() {
			if let Some(ref mut c) = *context_data.borrow_mut() {
				c.state.load(&data, show_weight);
			}
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_md.borrow_mut() {
			if let Some(ix) = c.state.node_at_position(x, y) {
				c.state.pin(ix);
				c.state.begin_drag(ix, x, y);
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.drag.active {
				c.state.drag_to(x, y);
			} else {
				let hovered = c.state.node_at_position(x, y);
				c.state.set_hover(hovered);
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.state.end_drag();
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.end_drag();
			c.state.set_hover(None);
		}
	};

	let context_dc = context.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		let name = context_dc.borrow().as_ref().and_then(|c| {
			c.state
				.node_at_position(x, y)
				.map(|ix| c.state.nodes[ix].name.clone())
		});
		if let (Some(name), Some(cb)) = (name, on_drill_down) {
			cb.run(name);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="client-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			style="display: block; cursor: pointer;"
		/>
	}
}
