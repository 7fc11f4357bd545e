//! Resolves a WeChat-style provider definition from integrator options and built-in defaults,
//! then builds the authorization redirect a host engine would send the user to.

// crates.io
use color_eyre::Result;
use url::Url;
// self
use oauth2_providers::{
	auth::{CanonicalIdentity, ProfileMapper, ProviderId},
	flows::{AuthorizationContext, FlowEngine},
	provider::{Endpoint, ProviderDefaults, ProviderDefinition, ProviderOptions, TokenEndpoint},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let defaults = ProviderDefaults::new(ProviderId::new("wechat")?, "WeChat")
		.with_authorization(
			Endpoint::new(Url::parse("https://open.weixin.qq.com/connect/qrconnect")?)
				.with_param("scope", "snsapi_login"),
		)
		.with_token(TokenEndpoint::new(Url::parse(
			"https://api.weixin.qq.com/sns/oauth2/access_token",
		)?))
		.with_userinfo(Url::parse("https://api.weixin.qq.com/sns/userinfo")?)
		.with_profile_mapper(ProfileMapper::new(|raw| {
			let mut identity = CanonicalIdentity::new(raw["openid"].as_str().unwrap_or_default());

			if let Some(nickname) = raw["nickname"].as_str() {
				identity = identity.with_name(nickname);
			}
			if let Some(headimgurl) = raw["headimgurl"].as_str() {
				identity = identity.with_image(headimgurl);
			}

			Ok(identity)
		}))
		.require_redirect_uri();
	let definition = ProviderDefinition::resolve(
		ProviderOptions::new()
			.with_client_id("demo-appid")
			.with_client_secret("demo-secret")
			.with_redirect_uri(Url::parse("https://app.example.com/oauth/callback")?)
			.with_extra("lang", "en"),
		defaults,
	)?;
	let engine = FlowEngine::new(definition);
	let redirect = engine
		.authorization_redirect(AuthorizationContext::new().with_state("state-from-host-engine"))
		.await?;

	println!("Send your user to {redirect}.");

	// Simulate the normalizer running on the payload the userinfo step would return.
	let raw_profile = serde_json::json!({
		"openid": "demo-openid",
		"nickname": "Demo User",
		"headimgurl": "https://thirdwx.example.com/avatar.png",
	});
	let identity = engine.normalize_profile(&raw_profile)?;

	println!("Link the session to `{}` ({:?}).", identity.id, identity.name);

	Ok(())
}
