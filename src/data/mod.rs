//! Server plumbing: filter state, dataset retrieval, resource CRUD.

pub mod fetch;
pub mod filters;
pub mod rest;

pub use fetch::{ClientGraphModel, EndpointConfig, FetchError, PreparedFetch};
pub use filters::{FilterSet, FilterValue};
