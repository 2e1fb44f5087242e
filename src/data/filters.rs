//! Retained filter criteria for the graph endpoint.
//!
//! Filters accumulate across a session: each update merges key-wise into the
//! mapping rather than replacing it, so refinements from different controls
//! compose. Iteration order is first-insertion order, which keeps the
//! serialized query stable while values change.

use std::fmt;

use indexmap::IndexMap;

/// A single filter value.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
	Text(String),
	Int(i64),
	Float(f64),
}

impl fmt::Display for FilterValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FilterValue::Text(s) => f.write_str(s),
			FilterValue::Int(n) => write!(f, "{n}"),
			FilterValue::Float(x) => write!(f, "{x}"),
		}
	}
}

impl From<&str> for FilterValue {
	fn from(s: &str) -> Self {
		FilterValue::Text(s.to_string())
	}
}

impl From<String> for FilterValue {
	fn from(s: String) -> Self {
		FilterValue::Text(s)
	}
}

impl From<i64> for FilterValue {
	fn from(n: i64) -> Self {
		FilterValue::Int(n)
	}
}

impl From<f64> for FilterValue {
	fn from(x: f64) -> Self {
		FilterValue::Float(x)
	}
}

/// An ordered `key -> value` filter mapping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSet {
	entries: IndexMap<String, FilterValue>,
}

impl FilterSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
		self.entries.insert(key.into(), value.into());
	}

	pub fn get(&self, key: &str) -> Option<&FilterValue> {
		self.entries.get(key)
	}

	/// Shallow key-wise merge: values in `partial` overwrite existing keys
	/// without disturbing their position; new keys append at the end.
	pub fn merge(&mut self, partial: FilterSet) {
		for (key, value) in partial.entries {
			self.entries.insert(key, value);
		}
	}

	/// Serialize as `k=v&k=v` in mapping order. Empty mappings serialize to
	/// an empty string.
	pub fn query_string(&self) -> String {
		self.entries
			.iter()
			.map(|(k, v)| format!("{k}={v}"))
			.collect::<Vec<_>>()
			.join("&")
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}
}

impl FromIterator<(String, FilterValue)> for FilterSet {
	fn from_iter<I: IntoIterator<Item = (String, FilterValue)>>(iter: I) -> Self {
		Self {
			entries: iter.into_iter().collect(),
		}
	}
}
