#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use oauth2_providers::{
	auth::{CanonicalIdentity, ProfileMapper, ProviderId, Secret, TokenPayload},
	error::{BoxError, Error, ProviderRequestError, RequestErrorKind},
	flows::{AuthorizationContext, FlowEngine},
	obs::FlowStep,
	provider::{
		AuthorizationOverride, Endpoint, ProviderDefaults, ProviderDefinition, ProviderOptions,
		TokenOverride, UserinfoOverride,
	},
	url::Url,
};

fn url(value: &str) -> Url {
	Url::parse(value).expect("Failed to parse fixture URL.")
}

fn base_defaults(server: &MockServer) -> ProviderDefaults {
	ProviderDefaults::new(
		ProviderId::new("mock-override")
			.expect("Provider identifier should be valid for override tests."),
		"Mock",
	)
	.with_authorization(url(&server.url("/authorize")))
	.with_token(url(&server.url("/token")))
	.with_userinfo(url(&server.url("/userinfo")))
	.with_profile_mapper(ProfileMapper::new(|raw| {
		Ok(CanonicalIdentity::new(raw["openid"].as_str().unwrap_or_default()))
	}))
}

fn resolve(defaults: ProviderDefaults) -> ProviderDefinition {
	ProviderDefinition::resolve(
		ProviderOptions::new().with_client_id("APPID").with_client_secret("SECRET"),
		defaults,
	)
	.expect("Provider definition should resolve successfully.")
}

#[tokio::test]
async fn token_override_suppresses_the_default_request() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let defaults = base_defaults(&server).with_token(
		Endpoint::new(url(&server.url("/token"))).with_request(TokenOverride::new(
			|inputs| async move {
				let mut payload = TokenPayload::bearer("override-access");

				payload
					.extra
					.insert("openid".into(), serde_json::Value::String(inputs.code.clone()));

				Ok(payload)
			},
		)),
	);
	let engine = FlowEngine::new(resolve(defaults));
	let payload = engine
		.exchange_code("CODE-1")
		.await
		.expect("Token override should succeed without contacting the endpoint.");

	token_mock.assert_hits_async(0).await;

	assert_eq!(payload.access_token.as_ref().map(Secret::expose), Some("override-access"));
	assert_eq!(payload.extra_str("openid"), Some("CODE-1"));
}

#[tokio::test]
async fn override_output_flows_unchanged_into_the_next_step() {
	let server = MockServer::start_async().await;
	let userinfo_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/userinfo").header("authorization", "Bearer override-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"openid\":\"abc\"}");
		})
		.await;
	let defaults = base_defaults(&server).with_token(
		Endpoint::new(url(&server.url("/token")))
			.with_request(TokenOverride::new(|_inputs| async move {
				Ok(TokenPayload::bearer("override-access"))
			})),
	);
	let engine = FlowEngine::new(resolve(defaults));
	let identity = engine
		.complete_sign_in("CODE-2")
		.await
		.expect("The chain should complete with the override-issued token.");

	userinfo_mock.assert_async().await;

	assert_eq!(identity.id, "abc");
}

#[tokio::test]
async fn userinfo_override_owns_the_retrieval_entirely() {
	let server = MockServer::start_async().await;
	let userinfo_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/userinfo");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let defaults = base_defaults(&server).with_userinfo(
		Endpoint::new(url(&server.url("/userinfo"))).with_request(UserinfoOverride::new(
			|inputs| async move {
				Ok(serde_json::json!({
					"openid": inputs.tokens.extra_str("openid").unwrap_or_default(),
				}))
			},
		)),
	);
	let engine = FlowEngine::new(resolve(defaults));
	let mut tokens = TokenPayload::bearer("unused");

	tokens.extra.insert("openid".into(), serde_json::Value::String("abc".into()));

	let raw = engine
		.fetch_userinfo(&tokens)
		.await
		.expect("Userinfo override should succeed without contacting the endpoint.");

	userinfo_mock.assert_hits_async(0).await;

	assert_eq!(raw, serde_json::json!({ "openid": "abc" }));
}

#[tokio::test]
async fn authorization_override_reshapes_the_prepared_url() {
	let server = MockServer::start_async().await;
	let defaults = base_defaults(&server).with_authorization(
		Endpoint::new(url(&server.url("/authorize"))).with_param("appid", "APPID").with_request(
			AuthorizationOverride::new(|inputs| async move {
				let mut url = inputs.url;

				url.set_fragment(Some("wechat_redirect"));

				Ok(url)
			}),
		),
	);
	let engine = FlowEngine::new(resolve(defaults));
	let redirect = engine
		.authorization_redirect(AuthorizationContext::new().with_state("S1"))
		.await
		.expect("Authorization override should succeed.");

	assert_eq!(redirect.fragment(), Some("wechat_redirect"));
	assert!(redirect.query().unwrap_or_default().contains("state=S1"));
}

#[tokio::test]
async fn override_failures_surface_with_the_failing_step() {
	let server = MockServer::start_async().await;
	let defaults = base_defaults(&server).with_token(
		Endpoint::new(url(&server.url("/token")))
			.with_request(TokenOverride::new(|_inputs| async move {
				Err(BoxError::from("provider requires signed requests"))
			})),
	);
	let engine = FlowEngine::new(resolve(defaults));
	let err = engine
		.complete_sign_in("CODE-3")
		.await
		.expect_err("Override failures must end the attempt.");

	match err {
		Error::Request(ProviderRequestError {
			step: FlowStep::Token,
			kind: RequestErrorKind::Override { source },
		}) => {
			assert_eq!(source.to_string(), "provider requires signed requests");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
