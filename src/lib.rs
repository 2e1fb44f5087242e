//! client-graph: Interactive force-directed visualization of client traffic.
//!
//! This crate renders a weighted client/usage graph on a WASM canvas with
//! physics-based layout, hover weight annotations, and drill-down, fed by a
//! filterable dataset endpoint.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen_futures::spawn_local;

pub mod components;
pub mod data;

pub use components::client_graph::{ClientGraphCanvas, GraphData, GraphLink, GraphNode};
pub use data::{ClientGraphModel, FilterSet};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("client-graph: logging initialized");
}

/// Main application component: filter controls plus the graph canvas.
///
/// Filter changes stay local until the update button fires a fetch; the
/// canvas reloads whenever a fetch lands. Failed fetches surface in a
/// banner and leave the previous dataset on screen.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let (graph, set_graph) = signal(GraphData::default());
	let (error, set_error) = signal(None::<String>);
	let (selected, set_selected) = signal(None::<String>);
	let (time_frame, set_time_frame) = signal("LAST_30_DAYS".to_string());
	let (min_weight, set_min_weight) = signal("30".to_string());

	let model = Rc::new(RefCell::new(ClientGraphModel::new()));

	let run_fetch = {
		let model = Rc::clone(&model);
		move || {
			let mut filters = FilterSet::new();
			filters.insert("timeFrame", time_frame.get());
			filters.insert(
				"minWeight",
				min_weight.get().trim().parse::<i64>().unwrap_or(30),
			);
			let prepared = model.borrow_mut().prepare(filters);
			spawn_local(async move {
				match prepared.send().await {
					Ok(data) => {
						info!(
							"client-graph: loaded {} nodes, {} links",
							data.nodes.len(),
							data.links.len()
						);
						set_graph.set(data);
						set_error.set(None);
					}
					Err(err) => {
						warn!("client-graph: fetch failed: {err}");
						set_error.set(Some(err.to_string()));
					}
				}
			});
		}
	};

	// First dataset load; later loads go through the update button.
	run_fetch();

	let drill_down = Callback::new(move |name: String| set_selected.set(Some(name)));

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Client Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="client-graph-page">
			<header class="graph-controls">
				<h1>"Client Graph"</h1>
				<label>
					"Time frame"
					<select
						prop:value=move || time_frame.get()
						on:change=move |ev| set_time_frame.set(event_target_value(&ev))
					>
						<option value="LAST_7_DAYS">"Last 7 days"</option>
						<option value="LAST_30_DAYS">"Last 30 days"</option>
						<option value="LAST_90_DAYS">"Last 90 days"</option>
					</select>
				</label>
				<label>
					"Min weight"
					<input
						type="number"
						min="0"
						prop:value=move || min_weight.get()
						on:input=move |ev| set_min_weight.set(event_target_value(&ev))
					/>
				</label>
				<button id="update-chart" on:click=move |_| run_fetch()>
					"Update"
				</button>
			</header>

			{move || {
				error.get().map(|message| {
					view! {
						<div class="error-banner" on:click=move |_| set_error.set(None)>
							{message}
						</div>
					}
				})
			}}

			{move || {
				selected.get().map(|name| {
					view! { <p class="drill-down">"Focused client: " {name}</p> }
				})
			}}

			<ClientGraphCanvas
				data=graph
				width=Some(1000.0)
				height=Some(600.0)
				show_weight=true
				on_drill_down=drill_down
			/>
		</div>
	}
}
