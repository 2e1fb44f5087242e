//! UI components.

pub mod client_graph;
