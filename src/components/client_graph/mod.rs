//! Force-directed client interaction graph component.
//!
//! Renders a weighted client graph on an HTML canvas with:
//! - Physics-based layout where link rest distances shorten with weight
//! - Node sizes and link widths scaled from the dataset's extremes
//! - Hover enlargement with link highlighting and weight annotations
//! - Click-to-pin nodes, dragging, and double-click drill-down
//!
//! # Example
//!
//! ```ignore
//! use client_graph::{ClientGraphCanvas, GraphData, GraphNode, GraphLink};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode { name: "acme".into(), sum: 50.0, group: 0 },
//!         GraphNode { name: "globex".into(), sum: 10.0, group: 1 },
//!     ],
//!     links: vec![
//!         GraphLink { source: 0, target: 1, value: 5.0 },
//!     ],
//! };
//!
//! view! { <ClientGraphCanvas data=data.into() show_weight=true /> }
//! ```

mod component;
mod render;
pub mod scale;
pub mod sim;
mod state;
pub mod theme;
mod types;

pub use component::ClientGraphCanvas;
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode};
