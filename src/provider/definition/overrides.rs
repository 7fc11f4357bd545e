// self
use crate::{_prelude::*, auth::TokenPayload, provider::ProviderDefinition};

/// Future type returned by step overrides.
pub type OverrideFuture<T> = Pin<Box<dyn Future<Output = Result<T, BoxError>> + Send>>;

/// Inputs handed to an authorization step override.
///
/// `url` is the redirect URL the default implementation would have returned, with baseline,
/// static, and dynamic parameters already merged; overrides may return it adjusted (WeChat
/// appends a `#wechat_redirect` fragment) or build a different one entirely.
#[derive(Clone, Debug)]
pub struct AuthorizationInputs {
	/// Prepared redirect URL.
	pub url: Url,
	/// Merged query parameters backing `url`.
	pub params: BTreeMap<String, String>,
	/// Resolved definition of the provider being driven.
	pub definition: ProviderDefinition,
}

/// Inputs handed to a token step override.
///
/// The override owns the whole exchange: it may post `form` to `url`, call somewhere else, or
/// skip the network entirely, as long as it returns a [`TokenPayload`].
#[derive(Clone, Debug)]
pub struct TokenInputs {
	/// Token endpoint URL from the descriptor.
	pub url: Url,
	/// Form the default implementation would have posted, including static params.
	pub form: BTreeMap<String, String>,
	/// Authorization code returned by the provider's redirect.
	pub code: String,
	/// Resolved definition of the provider being driven.
	pub definition: ProviderDefinition,
}

/// Inputs handed to a userinfo step override.
#[derive(Clone, Debug)]
pub struct UserinfoInputs {
	/// Userinfo endpoint URL from the descriptor.
	pub url: Url,
	/// In-flight tokens produced by the token step, passed unchanged.
	pub tokens: TokenPayload,
	/// Resolved definition of the provider being driven.
	pub definition: ProviderDefinition,
}

macro_rules! def_override {
	($name:ident, $inputs:ty, $output:ty, $doc:literal) => {
		#[doc = $doc]
		///
		/// When present on an endpoint descriptor the default network behavior is skipped
		/// entirely; the override is fully responsible for producing a value of the step's
		/// output shape. Errors surface verbatim, tagged with the failing step.
		#[derive(Clone)]
		pub struct $name(Arc<dyn Fn($inputs) -> OverrideFuture<$output> + Send + Sync>);
		impl $name {
			/// Wraps an async override function.
			pub fn new<F, Fut>(f: F) -> Self
			where
				F: 'static + Fn($inputs) -> Fut + Send + Sync,
				Fut: 'static + Future<Output = Result<$output, BoxError>> + Send,
			{
				Self(Arc::new(move |inputs| -> OverrideFuture<$output> { Box::pin(f(inputs)) }))
			}

			/// Invokes the override with the step's prepared inputs.
			pub fn call(&self, inputs: $inputs) -> OverrideFuture<$output> {
				(self.0)(inputs)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(concat!(stringify!($name), "(..)"))
			}
		}
	};
}

def_override! {
	AuthorizationOverride,
	AuthorizationInputs,
	Url,
	"Provider-supplied replacement for the authorization redirect construction."
}
def_override! {
	TokenOverride,
	TokenInputs,
	TokenPayload,
	"Provider-supplied replacement for the authorization-code-for-token exchange."
}
def_override! {
	UserinfoOverride,
	UserinfoInputs,
	Value,
	"Provider-supplied replacement for the userinfo retrieval."
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::{CanonicalIdentity, ProfileMapper, ProviderId},
		provider::{ProviderDefaults, ProviderOptions},
	};

	fn fixture_definition() -> ProviderDefinition {
		let url = |value: &str| Url::parse(value).expect("Fixture URL should parse.");
		let defaults = ProviderDefaults::new(
			ProviderId::new("demo").expect("Provider fixture should be valid."),
			"Demo",
		)
		.with_authorization(url("https://idp.example.com/authorize"))
		.with_token(url("https://idp.example.com/token"))
		.with_userinfo(url("https://idp.example.com/userinfo"))
		.with_profile_mapper(ProfileMapper::new(|raw| {
			Ok(CanonicalIdentity::new(raw["id"].as_str().unwrap_or_default()))
		}));

		ProviderDefinition::resolve(
			ProviderOptions::new().with_client_id("CLIENT").with_client_secret("SECRET"),
			defaults,
		)
		.expect("Definition fixture should resolve.")
	}

	#[tokio::test]
	async fn overrides_pass_inputs_through_unchanged() {
		let seam = UserinfoOverride::new(|inputs: UserinfoInputs| async move {
			Ok(serde_json::json!({ "echo": inputs.tokens.access_token.is_some() }))
		});
		let value = seam
			.call(UserinfoInputs {
				url: Url::parse("https://idp.example.com/userinfo")
					.expect("Fixture URL should parse."),
				tokens: TokenPayload::bearer("ACCESS"),
				definition: fixture_definition(),
			})
			.await
			.expect("Override fixture should succeed.");

		assert_eq!(value, serde_json::json!({ "echo": true }));
	}

	#[tokio::test]
	async fn override_errors_surface_verbatim() {
		let seam = TokenOverride::new(|_inputs: TokenInputs| async move {
			Err::<TokenPayload, _>("exchange refused".into())
		});
		let err = seam
			.call(TokenInputs {
				url: Url::parse("https://idp.example.com/token")
					.expect("Fixture URL should parse."),
				form: BTreeMap::new(),
				code: "CODE".into(),
				definition: fixture_definition(),
			})
			.await
			.expect_err("Override failure should propagate.");

		assert_eq!(err.to_string(), "exchange refused");
	}
}
