//! Shows a provider overriding individual flow steps: the authorization override reshapes the
//! prepared redirect URL and the token override owns the exchange end to end.

// crates.io
use color_eyre::Result;
use url::Url;
// self
use oauth2_providers::{
	auth::{CanonicalIdentity, ProfileMapper, ProviderId, TokenPayload},
	flows::{AuthorizationContext, FlowEngine},
	provider::{
		AuthorizationOverride, Endpoint, ProviderDefaults, ProviderDefinition, ProviderOptions,
		TokenOverride,
	},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let defaults = ProviderDefaults::new(ProviderId::new("wechat")?, "WeChat")
		.with_authorization(
			Endpoint::new(Url::parse("https://open.weixin.qq.com/connect/qrconnect")?)
				.with_param("scope", "snsapi_login")
				// WeChat only honors the redirect when the URL carries this fragment.
				.with_request(AuthorizationOverride::new(|inputs| async move {
					let mut url = inputs.url;

					url.set_fragment(Some("wechat_redirect"));

					Ok(url)
				})),
		)
		.with_token(
			Endpoint::new(Url::parse("https://api.weixin.qq.com/sns/oauth2/access_token")?)
				.with_request(TokenOverride::new(|inputs| async move {
					// A real integration would fetch `inputs.url` with `inputs.form` and remap
					// the response; the demo stays offline and fabricates the payload.
					let mut payload = TokenPayload::bearer("demo-access-token");

					payload.extra.insert(
						"openid".into(),
						serde_json::Value::String(format!("openid-for-{}", inputs.code)),
					);

					Ok(payload)
				})),
		)
		.with_userinfo(Url::parse("https://api.weixin.qq.com/sns/userinfo")?)
		.with_profile_mapper(ProfileMapper::new(|raw| {
			Ok(CanonicalIdentity::new(raw["openid"].as_str().unwrap_or_default()))
		}));
	let definition = ProviderDefinition::resolve(
		ProviderOptions::new()
			.with_client_id("demo-appid")
			.with_client_secret("demo-secret")
			.with_redirect_uri(Url::parse("https://app.example.com/oauth/callback")?),
		defaults,
	)?;
	let engine = FlowEngine::new(definition);
	let redirect = engine
		.authorization_redirect(AuthorizationContext::new().with_state("state-from-host-engine"))
		.await?;

	println!("Redirect with provider fragment: {redirect}.");

	let tokens = engine.exchange_code("code-from-callback").await?;

	println!(
		"Override-issued token carries openid `{}`.",
		tokens.extra_str("openid").unwrap_or_default(),
	);

	Ok(())
}
