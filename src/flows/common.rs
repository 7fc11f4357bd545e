//! Shared helpers for step implementations (parameter layering, response handling).

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::ProviderRequestError, http::FetchResponse, obs::FlowStep};

const BODY_PREVIEW_LIMIT: usize = 256;

/// Merges parameter layers in precedence order; later layers override earlier ones.
pub(crate) fn layer_params<I>(layers: I) -> BTreeMap<String, String>
where
	I: IntoIterator<Item = BTreeMap<String, String>>,
{
	let mut merged = BTreeMap::new();

	for layer in layers {
		merged.extend(layer);
	}

	merged
}

/// Appends params as query pairs onto a descriptor URL, preserving any existing query.
pub(crate) fn apply_query(url: &Url, params: &BTreeMap<String, String>) -> Url {
	if params.is_empty() {
		return url.clone();
	}

	let mut url = url.clone();
	let mut pairs = url.query_pairs_mut();

	for (key, value) in params {
		pairs.append_pair(key, value);
	}

	drop(pairs);

	url
}

/// Truncates a response body for diagnostics.
pub(crate) fn preview_body(body: &[u8]) -> Option<String> {
	if body.is_empty() {
		return None;
	}

	let text = String::from_utf8_lossy(body);

	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return Some(text.into_owned());
	}

	let mut buf = String::new();

	for (idx, ch) in text.chars().enumerate() {
		if idx >= BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	Some(buf)
}

/// Converts a non-success step response into a step failure.
pub(crate) fn ensure_success(
	step: FlowStep,
	response: &FetchResponse,
) -> Result<(), ProviderRequestError> {
	if response.is_success() {
		Ok(())
	} else {
		Err(ProviderRequestError::status(step, response.status, preview_body(&response.body)))
	}
}

/// Parses a step response body as JSON, reporting the failing path on mismatch.
pub(crate) fn parse_json<T>(
	step: FlowStep,
	response: &FetchResponse,
) -> Result<T, ProviderRequestError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|e| ProviderRequestError::malformed(step, response.status, e))
}

#[cfg(test)]
pub(crate) mod testkit {
	//! Fixtures shared by the step unit tests.

	// std
	use std::sync::Mutex;
	// self
	use super::*;
	use crate::{
		auth::{CanonicalIdentity, ProfileMapper, ProviderId},
		flows::FlowEngine,
		http::{FetchCapability, FetchFuture, FetchRequest},
		provider::{
			Endpoint, ProviderDefaults, ProviderDefinition, ProviderOptions, TokenEndpoint,
		},
	};

	/// Fetch capability that fails the test if any request is issued.
	pub(crate) struct NeverFetch;
	impl FetchCapability for NeverFetch {
		fn fetch(&self, request: FetchRequest) -> FetchFuture {
			panic!("Default request must not be issued: {}.", request.url);
		}
	}

	/// Fetch capability answering every request with one canned response.
	pub(crate) struct StaticFetch {
		pub(crate) status: u16,
		pub(crate) body: String,
	}
	impl StaticFetch {
		pub(crate) fn json(body: &str) -> Self {
			Self { status: 200, body: body.to_owned() }
		}
	}
	impl FetchCapability for StaticFetch {
		fn fetch(&self, _request: FetchRequest) -> FetchFuture {
			let status = self.status;
			let body = self.body.clone().into_bytes();

			Box::pin(async move { Ok(FetchResponse { status, body }) })
		}
	}

	/// Fetch capability recording requests while answering with a canned response.
	pub(crate) struct RecordingFetch {
		pub(crate) requests: Mutex<Vec<FetchRequest>>,
		pub(crate) response: StaticFetch,
	}
	impl RecordingFetch {
		pub(crate) fn json(body: &str) -> Self {
			Self { requests: Mutex::new(Vec::new()), response: StaticFetch::json(body) }
		}

		pub(crate) fn recorded(&self) -> Vec<FetchRequest> {
			self.requests.lock().expect("Request log mutex should not be poisoned.").clone()
		}
	}
	impl FetchCapability for RecordingFetch {
		fn fetch(&self, request: FetchRequest) -> FetchFuture {
			self.requests
				.lock()
				.expect("Request log mutex should not be poisoned.")
				.push(request.clone());

			self.response.fetch(request)
		}
	}

	pub(crate) fn url(value: &str) -> Url {
		Url::parse(value).expect("Fixture URL should parse.")
	}

	/// Mapper reading the WeChat-style `openid`/`nickname`/`headimgurl` fields with explicit
	/// email absence.
	pub(crate) fn openid_mapper() -> ProfileMapper {
		ProfileMapper::new(|raw| {
			let mut identity =
				CanonicalIdentity::new(raw["openid"].as_str().unwrap_or_default());

			if let Some(nickname) = raw["nickname"].as_str() {
				identity = identity.with_name(nickname);
			}
			if let Some(headimgurl) = raw["headimgurl"].as_str() {
				identity = identity.with_image(headimgurl);
			}

			Ok(identity)
		})
	}

	pub(crate) fn qrconnect_defaults() -> ProviderDefaults {
		ProviderDefaults::new(
			ProviderId::new("wechat").expect("Provider fixture should be valid."),
			"WeChat",
		)
		.with_authorization(
			Endpoint::new(url("https://open.example.com/connect/qrconnect"))
				.with_param("appid", "APPID")
				.with_param("scope", "snsapi_login"),
		)
		.with_token(
			TokenEndpoint::new(url("https://api.example.com/sns/oauth2/access_token"))
				.with_param("appid", "APPID"),
		)
		.with_userinfo(url("https://api.example.com/sns/userinfo"))
		.with_profile_mapper(openid_mapper())
	}

	pub(crate) fn resolved_definition() -> ProviderDefinition {
		ProviderDefinition::resolve(
			ProviderOptions::new()
				.with_client_id("APPID")
				.with_client_secret("SECRET")
				.with_redirect_uri(url("https://app.example.com/callback")),
			qrconnect_defaults(),
		)
		.expect("Definition fixture should resolve.")
	}

	pub(crate) fn engine_with<C>(fetch: C) -> FlowEngine<C>
	where
		C: FetchCapability,
	{
		FlowEngine::with_fetch(resolved_definition(), fetch)
	}
}
