//! Transport primitives for default step implementations.
//!
//! The module exposes [`FetchCapability`], the crate's only dependency on an HTTP stack: given a
//! [`FetchRequest`] (URL plus options) it resolves to a [`FetchResponse`] (status plus body).
//! Default step implementations build requests here; step overrides are free to use the same
//! capability or ignore it entirely. Timeouts, proxies, and retries are the transport's own
//! concern.

// std
use std::{borrow::Cow, ops::Deref};
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, error::TransportError};

/// HTTP methods used by default step implementations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchMethod {
	/// `GET`, used by the userinfo step.
	Get,
	/// `POST`, used by the token step.
	Post,
}

/// Request handed to a [`FetchCapability`] implementation.
#[derive(Clone, Debug)]
pub struct FetchRequest {
	/// HTTP method.
	pub method: FetchMethod,
	/// Fully-formed target URL including query parameters.
	pub url: Url,
	/// Header name/value pairs, applied in order.
	pub headers: Vec<(String, String)>,
	/// Request body, when the method carries one.
	pub body: Option<String>,
}
impl FetchRequest {
	/// Creates a bare `GET` request.
	pub fn get(url: Url) -> Self {
		Self { method: FetchMethod::Get, url, headers: Vec::new(), body: None }
	}

	/// Creates a `POST` request carrying a `application/x-www-form-urlencoded` body.
	pub fn form(url: Url, form: &BTreeMap<String, String>) -> Self {
		let body = url::form_urlencoded::Serializer::new(String::new())
			.extend_pairs(form.iter())
			.finish();

		Self {
			method: FetchMethod::Post,
			url,
			headers: vec![(
				"content-type".into(),
				"application/x-www-form-urlencoded".into(),
			)],
			body: Some(body),
		}
	}

	/// Appends a header pair.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Attaches a bearer token in the `Authorization` header.
	pub fn bearer(self, token: &str) -> Self {
		self.with_header("authorization", format!("Bearer {token}"))
	}

	/// Attaches HTTP Basic credentials in the `Authorization` header.
	pub fn basic_auth(self, client_id: &str, client_secret: &str) -> Self {
		let encoded = STANDARD.encode(format!("{client_id}:{client_secret}"));

		self.with_header("authorization", format!("Basic {encoded}"))
	}
}

/// Response returned by a [`FetchCapability`] implementation.
#[derive(Clone, Debug)]
pub struct FetchResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl FetchResponse {
	/// Returns true for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns the body as text, replacing invalid UTF-8.
	pub fn body_text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.body)
	}
}

/// Future type returned by [`FetchCapability::fetch`].
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<FetchResponse, TransportError>> + Send>>;

/// Abstraction over HTTP transports used by default step implementations.
///
/// Implementations must be `Send + Sync + 'static` so one capability can back arbitrarily many
/// concurrent sign-in attempts, and the returned futures must be `Send` so flow futures can hop
/// executors.
pub trait FetchCapability
where
	Self: 'static + Send + Sync,
{
	/// Executes one HTTP request.
	fn fetch(&self, request: FetchRequest) -> FetchFuture;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token requests should not follow redirects, matching OAuth 2.0 guidance that token endpoints
/// return results directly instead of delegating to another URI. Configure any custom
/// [`ReqwestClient`] accordingly before wrapping it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestFetch(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestFetch {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestFetch {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestFetch {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl FetchCapability for ReqwestFetch {
	fn fetch(&self, request: FetchRequest) -> FetchFuture {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = match request.method {
				FetchMethod::Get => client.get(request.url),
				FetchMethod::Post => client.post(request.url),
			};

			for (name, value) in request.headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(FetchResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn form_requests_encode_pairs_and_content_type() {
		let form = BTreeMap::from_iter([
			("code".to_owned(), "CODE".to_owned()),
			("grant_type".to_owned(), "authorization_code".to_owned()),
		]);
		let request = FetchRequest::form(
			Url::parse("https://idp.example.com/token").expect("Fixture URL should parse."),
			&form,
		);

		assert_eq!(request.method, FetchMethod::Post);
		assert_eq!(request.body.as_deref(), Some("code=CODE&grant_type=authorization_code"));
		assert_eq!(
			request.headers.first().map(|(name, _)| name.as_str()),
			Some("content-type"),
		);
	}

	#[test]
	fn basic_auth_encodes_credentials() {
		let request = FetchRequest::get(
			Url::parse("https://idp.example.com/userinfo").expect("Fixture URL should parse."),
		)
		.basic_auth("id", "secret");
		let (_, value) =
			request.headers.first().expect("Basic auth should append a header.").clone();

		assert_eq!(value, format!("Basic {}", STANDARD.encode("id:secret")));
	}
}
