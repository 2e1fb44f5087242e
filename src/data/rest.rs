//! CRUD plumbing for the legacy resource endpoints.
//!
//! The server predates proper verb routing, so requests are shaped for it:
//! PUT, DELETE, and POST all travel as POST with the real verb stamped into
//! an urlencoded `_method` field, and JSON payloads ride in a `model` form
//! field. Responses are HTTP 200 even on failure, with an application-level
//! `Code`/`Message` envelope instead.

use gloo_net::http::{Method, RequestBuilder};
use serde::Serialize;
use thiserror::Error;

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// How requests are shaped for the server.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncConfig {
	/// Server root, joined with the resource path.
	pub site_root: String,
	/// Tunnel PUT/DELETE/POST through POST with a `_method` field.
	pub emulate_http: bool,
	/// Send payloads as an urlencoded `model` form field instead of a JSON
	/// body.
	pub emulate_json: bool,
}

impl Default for SyncConfig {
	fn default() -> Self {
		Self {
			site_root: "http://localhost:3000".to_string(),
			emulate_http: true,
			emulate_json: true,
		}
	}
}

/// The four resource operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrudMethod {
	Create,
	Update,
	Delete,
	Read,
}

impl CrudMethod {
	/// The wire verb before any tunneling applies.
	pub fn http_verb(self) -> &'static str {
		match self {
			CrudMethod::Create => "POST",
			CrudMethod::Update => "PUT",
			CrudMethod::Delete => "DELETE",
			CrudMethod::Read => "GET",
		}
	}
}

/// Which identifier names the resource in its URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UrlKey {
	Id,
	Name,
}

/// Addressing for one resource. URLs come out as
/// `<root>/<type>[/<id-or-name>][/<mode>]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceSpec {
	pub resource_type: String,
	pub id: Option<String>,
	pub name: Option<String>,
	pub mode: Option<String>,
}

impl ResourceSpec {
	pub fn new(resource_type: impl Into<String>) -> Self {
		Self {
			resource_type: resource_type.into(),
			..Self::default()
		}
	}
}

/// Why a sync operation failed.
#[derive(Debug, Error)]
pub enum SyncError {
	/// The resource spec names no type, so no URL can be composed.
	#[error("a resource type must be specified")]
	MissingResourceType,
	/// The server processed the request and rejected it.
	#[error("server returned code {code}: {message}")]
	Application { code: String, message: String },
	/// The payload would not serialize.
	#[error("payload serialization failed: {0}")]
	Serialize(#[from] serde_json::Error),
	/// The request never completed.
	#[error("request failed: {0}")]
	Transport(#[from] gloo_net::Error),
	/// The server answered outside the 2xx range.
	#[error("server answered {0}")]
	Status(u16),
}

/// One fully shaped request, ready for the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncRequest {
	pub url: String,
	pub verb: &'static str,
	pub content_type: Option<&'static str>,
	pub body: Option<String>,
}

/// Percent-encode a path or query component. Matches the JavaScript
/// `encodeURIComponent` unreserved set.
pub fn encode_component(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	for byte in raw.bytes() {
		match byte {
			b'A'..=b'Z'
			| b'a'..=b'z'
			| b'0'..=b'9'
			| b'-'
			| b'_'
			| b'.'
			| b'!'
			| b'~'
			| b'*'
			| b'\''
			| b'('
			| b')' => out.push(byte as char),
			_ => out.push_str(&format!("%{byte:02X}")),
		}
	}
	out
}

/// Form-field encoding: percent-encoding with spaces as `+`.
fn form_encode(raw: &str) -> String {
	encode_component(raw).replace("%20", "+")
}

/// Compose the resource URL, keyed by id or by name.
pub fn resource_url(
	config: &SyncConfig,
	resource: &ResourceSpec,
	key: UrlKey,
) -> Result<String, SyncError> {
	if resource.resource_type.is_empty() {
		return Err(SyncError::MissingResourceType);
	}

	let root = config.site_root.trim_end_matches('/');
	let mut url = format!("{root}/{}", encode_component(&resource.resource_type));

	let segment = match key {
		UrlKey::Id => resource.id.as_deref(),
		UrlKey::Name => resource.name.as_deref(),
	};
	if let Some(segment) = segment {
		url.push('/');
		url.push_str(&encode_component(segment));
	}
	if let Some(mode) = resource.mode.as_deref() {
		url.push('/');
		url.push_str(&encode_component(mode));
	}
	Ok(url)
}

/// Shape one CRUD request. `now_ms` stamps the cache-defeating `timestamp`
/// parameter on reads; callers pass the current wall clock.
pub fn build_request<T: Serialize>(
	config: &SyncConfig,
	method: CrudMethod,
	resource: &ResourceSpec,
	key: UrlKey,
	payload: Option<&T>,
	now_ms: u64,
) -> Result<SyncRequest, SyncError> {
	let mut url = resource_url(config, resource, key)?;
	let mut verb = method.http_verb();
	let mut content_type = None;
	let mut body = None;

	if matches!(method, CrudMethod::Create | CrudMethod::Update) {
		if let Some(payload) = payload {
			let json = serde_json::to_string(payload)?;
			if config.emulate_json {
				content_type = Some(FORM_CONTENT_TYPE);
				body = Some(format!("model={}", form_encode(&json)));
			} else {
				content_type = Some(JSON_CONTENT_TYPE);
				body = Some(json);
			}
		}
	}

	if config.emulate_http && matches!(verb, "PUT" | "DELETE" | "POST") {
		// The real verb survives only in the form field; the override
		// header is unreliable through the proxy tier and stays off.
		if config.emulate_json {
			let marker = format!("_method={verb}");
			body = Some(match body {
				Some(existing) => format!("{existing}&{marker}"),
				None => marker,
			});
			content_type = Some(FORM_CONTENT_TYPE);
		}
		verb = "POST";
	}

	if verb == "GET" {
		url.push_str(&format!("?timestamp={now_ms}"));
	}

	Ok(SyncRequest {
		url,
		verb,
		content_type,
		body,
	})
}

/// Reject responses carrying a truthy application `Code`. The server keys
/// success on JavaScript truthiness, so numeric zero passes while the
/// string `"0"` does not.
pub fn unwrap_response(value: &serde_json::Value) -> Result<(), SyncError> {
	use serde_json::Value;

	let Some(code) = value.get("Code") else {
		return Ok(());
	};
	let truthy = match code {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().is_some_and(|x| x != 0.0),
		Value::String(text) => !text.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	};
	if !truthy {
		return Ok(());
	}

	let code = match code {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	};
	let message = value
		.get("Message")
		.and_then(Value::as_str)
		.unwrap_or_default()
		.to_string();
	Err(SyncError::Application { code, message })
}

/// Send a shaped request and unwrap the application envelope.
pub async fn send(request: &SyncRequest) -> Result<serde_json::Value, SyncError> {
	let method = match request.verb {
		"POST" => Method::POST,
		"PUT" => Method::PUT,
		"DELETE" => Method::DELETE,
		_ => Method::GET,
	};
	let mut builder = RequestBuilder::new(&request.url).method(method);
	if let Some(content_type) = request.content_type {
		builder = builder.header("Content-Type", content_type);
	}
	let response = match &request.body {
		Some(body) => builder.body(body.clone())?.send().await?,
		None => builder.send().await?,
	};
	if !response.ok() {
		return Err(SyncError::Status(response.status()));
	}
	let value = response.json::<serde_json::Value>().await?;
	unwrap_response(&value)?;
	Ok(value)
}

/// `8-4-4-4-12` alphanumeric resource identifiers.
pub fn is_guid(candidate: &str) -> bool {
	const SEGMENTS: [usize; 5] = [8, 4, 4, 4, 12];

	let mut parts = candidate.split('-');
	let matched = SEGMENTS.iter().all(|&len| {
		parts
			.next()
			.is_some_and(|part| part.len() == len && part.bytes().all(|b| b.is_ascii_alphanumeric()))
	});
	matched && parts.next().is_none()
}

/// Comparison operators understood by the server's filter grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum LogicFilter {
	Equal,
	Like,
	NotLike,
	NotEqual,
	LessThan,
	GreaterThan,
	In,
	NotIn,
	Between,
	NotBetween,
	GreaterThanOrEqual,
	LessThanOrEqual,
	IsNull,
	IsNotNull,
}

impl LogicFilter {
	/// The wire spelling of the operator.
	pub fn as_str(self) -> &'static str {
		match self {
			LogicFilter::Equal => "EQUAL",
			LogicFilter::Like => "LIKE",
			LogicFilter::NotLike => "NOT_LIKE",
			LogicFilter::NotEqual => "NOT_EQUAL",
			LogicFilter::LessThan => "LESS_THAN",
			LogicFilter::GreaterThan => "GREATER_THAN",
			LogicFilter::In => "IN",
			LogicFilter::NotIn => "NOT_IN",
			LogicFilter::Between => "BETWEEN",
			LogicFilter::NotBetween => "NOT_BETWEEN",
			LogicFilter::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
			LogicFilter::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
			LogicFilter::IsNull => "IS_NULL",
			LogicFilter::IsNotNull => "IS_NOT_NULL",
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn resource() -> ResourceSpec {
		ResourceSpec {
			resource_type: "DataViews".to_string(),
			id: Some("42".to_string()),
			name: Some("Weekly Traffic".to_string()),
			mode: None,
		}
	}

	#[test]
	fn crud_maps_onto_http_verbs() {
		assert_eq!(CrudMethod::Create.http_verb(), "POST");
		assert_eq!(CrudMethod::Update.http_verb(), "PUT");
		assert_eq!(CrudMethod::Delete.http_verb(), "DELETE");
		assert_eq!(CrudMethod::Read.http_verb(), "GET");
	}

	#[test]
	fn urls_compose_from_type_key_and_mode() {
		let config = SyncConfig::default();
		let mut resource = resource();

		assert_eq!(
			resource_url(&config, &resource, UrlKey::Id).unwrap(),
			"http://localhost:3000/DataViews/42"
		);
		assert_eq!(
			resource_url(&config, &resource, UrlKey::Name).unwrap(),
			"http://localhost:3000/DataViews/Weekly%20Traffic"
		);

		resource.mode = Some("Description".to_string());
		assert_eq!(
			resource_url(&config, &resource, UrlKey::Id).unwrap(),
			"http://localhost:3000/DataViews/42/Description"
		);
	}

	#[test]
	fn url_omits_a_missing_key() {
		let config = SyncConfig::default();
		let resource = ResourceSpec::new("DataViews");
		assert_eq!(
			resource_url(&config, &resource, UrlKey::Id).unwrap(),
			"http://localhost:3000/DataViews"
		);
	}

	#[test]
	fn url_requires_a_resource_type() {
		let config = SyncConfig::default();
		let resource = ResourceSpec::default();
		assert!(matches!(
			resource_url(&config, &resource, UrlKey::Id),
			Err(SyncError::MissingResourceType)
		));
	}

	#[test]
	fn site_root_joins_without_doubled_slashes() {
		let config = SyncConfig {
			site_root: "https://graphs.example/".to_string(),
			..SyncConfig::default()
		};
		assert_eq!(
			resource_url(&config, &resource(), UrlKey::Id).unwrap(),
			"https://graphs.example/DataViews/42"
		);
	}

	#[test]
	fn encoding_matches_the_browser_component_rules() {
		assert_eq!(encode_component("a b&c"), "a%20b%26c");
		assert_eq!(encode_component("safe-._!~*'()"), "safe-._!~*'()");
		assert_eq!(encode_component("100%"), "100%25");
	}

	#[test]
	fn update_tunnels_through_post_with_the_model_field() {
		let config = SyncConfig::default();
		let payload = json!({"Name": "edge"});
		let request = build_request(
			&config,
			CrudMethod::Update,
			&resource(),
			UrlKey::Id,
			Some(&payload),
			0,
		)
		.unwrap();

		assert_eq!(request.verb, "POST");
		assert_eq!(request.content_type, Some(FORM_CONTENT_TYPE));
		assert_eq!(
			request.body.as_deref(),
			Some("model=%7B%22Name%22%3A%22edge%22%7D&_method=PUT")
		);
	}

	#[test]
	fn create_also_carries_a_method_marker() {
		let config = SyncConfig::default();
		let payload = json!({"Name": "edge"});
		let request = build_request(
			&config,
			CrudMethod::Create,
			&resource(),
			UrlKey::Id,
			Some(&payload),
			0,
		)
		.unwrap();

		assert_eq!(request.verb, "POST");
		assert!(request.body.unwrap().ends_with("&_method=POST"));
	}

	#[test]
	fn delete_sends_only_the_method_marker() {
		let config = SyncConfig::default();
		let request = build_request(
			&config,
			CrudMethod::Delete,
			&resource(),
			UrlKey::Id,
			None::<&()>,
			0,
		)
		.unwrap();

		assert_eq!(request.verb, "POST");
		assert_eq!(request.content_type, Some(FORM_CONTENT_TYPE));
		assert_eq!(request.body.as_deref(), Some("_method=DELETE"));
	}

	#[test]
	fn plain_http_keeps_the_real_verbs() {
		let config = SyncConfig {
			emulate_http: false,
			emulate_json: false,
			..SyncConfig::default()
		};
		let payload = json!({"Name": "edge"});
		let request = build_request(
			&config,
			CrudMethod::Update,
			&resource(),
			UrlKey::Id,
			Some(&payload),
			0,
		)
		.unwrap();

		assert_eq!(request.verb, "PUT");
		assert_eq!(request.content_type, Some(JSON_CONTENT_TYPE));
		assert_eq!(request.body.as_deref(), Some("{\"Name\":\"edge\"}"));
	}

	#[test]
	fn reads_stamp_a_timestamp_parameter() {
		let config = SyncConfig::default();
		let request = build_request(
			&config,
			CrudMethod::Read,
			&resource(),
			UrlKey::Id,
			None::<&()>,
			1_700_000_000_000,
		)
		.unwrap();

		assert_eq!(request.verb, "GET");
		assert_eq!(
			request.url,
			"http://localhost:3000/DataViews/42?timestamp=1700000000000"
		);
		assert_eq!(request.body, None);
		assert_eq!(request.content_type, None);
	}

	#[test]
	fn zero_code_responses_pass_through() {
		assert!(unwrap_response(&json!({"Code": 0, "Data": []})).is_ok());
		assert!(unwrap_response(&json!({"Code": null})).is_ok());
		assert!(unwrap_response(&json!({"Code": ""})).is_ok());
		assert!(unwrap_response(&json!({"nodes": []})).is_ok());
	}

	#[test]
	fn truthy_codes_become_application_errors() {
		let err = unwrap_response(&json!({"Code": 17, "Message": "no such view"}))
			.unwrap_err();
		match err {
			SyncError::Application { code, message } => {
				assert_eq!(code, "17");
				assert_eq!(message, "no such view");
			}
			other => panic!("unexpected error: {other:?}"),
		}

		// The string "0" is truthy, unlike the number 0.
		assert!(unwrap_response(&json!({"Code": "0"})).is_err());
		assert!(unwrap_response(&json!({"Code": true})).is_err());
	}

	#[test]
	fn guid_recognition_is_strict_about_shape() {
		assert!(is_guid("a1b2c3d4-e5f6-a7b8-c9d0-e1f2a3b4c5d6"));
		assert!(is_guid("AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE"));
		assert!(!is_guid("a1b2c3d4-e5f6-a7b8-c9d0"));
		assert!(!is_guid("a1b2c3d4-e5f6-a7b8-c9d0-e1f2a3b4c5d"));
		assert!(!is_guid("a1b2c3d4-e5f6-a7b8-c9d0-e1f2a3b4c5d6-ff"));
		assert!(!is_guid("a1b2c3d4_e5f6_a7b8_c9d0_e1f2a3b4c5d6"));
		assert!(!is_guid("g!b2c3d4-e5f6-a7b8-c9d0-e1f2a3b4c5d6-"));
		assert!(!is_guid(""));
	}

	#[test]
	fn logic_filters_spell_like_the_server_expects() {
		assert_eq!(LogicFilter::Equal.as_str(), "EQUAL");
		assert_eq!(
			LogicFilter::GreaterThanOrEqual.as_str(),
			"GREATER_THAN_OR_EQUAL"
		);
		assert_eq!(LogicFilter::IsNotNull.as_str(), "IS_NOT_NULL");
	}
}
