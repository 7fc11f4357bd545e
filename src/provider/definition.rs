//! Immutable provider definition data structures shared by all flow steps.

/// Override function seams and their owned step inputs.
pub mod overrides;
/// Resolution of integrator options over built-in provider defaults.
pub mod resolve;

pub use overrides::*;
pub use resolve::*;

// self
use crate::{
	_prelude::*,
	auth::{ProfileMapper, ProviderId, Secret},
};

/// Flow orchestration discriminator applied by the host engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
	/// OAuth 2.0 authorization-code orchestration.
	#[default]
	#[serde(rename = "oauth")]
	OAuth,
}
impl ProviderKind {
	/// Returns the stable discriminator label.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderKind::OAuth => "oauth",
		}
	}
}
impl Display for ProviderKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Preferred client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	#[default]
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}

/// Per-step dispatch decision, resolved once at definition construction.
///
/// `Default` runs the shared step implementation against the endpoint descriptor; `Custom` hands
/// the step entirely to a provider-supplied function, skipping the default network call.
#[derive(Clone, Debug, Default)]
pub enum StepBehavior<F> {
	/// Run the shared default implementation.
	#[default]
	Default,
	/// Run the provider-supplied override instead.
	Custom(F),
}
impl<F> StepBehavior<F> {
	/// Returns true when a provider-supplied override replaces the default implementation.
	pub fn is_custom(&self) -> bool {
		matches!(self, Self::Custom(_))
	}
}

/// Endpoint descriptor for one flow step: target URL, static parameters, dispatch decision.
#[derive(Clone, Debug)]
pub struct Endpoint<F> {
	/// Endpoint URL the default implementation targets.
	pub url: Url,
	/// Static parameters merged into every request (authorization query, token form).
	pub params: BTreeMap<String, String>,
	/// Dispatch decision for the step.
	pub request: StepBehavior<F>,
}
impl<F> Endpoint<F> {
	/// Creates a descriptor with no static params and default behavior.
	pub fn new(url: Url) -> Self {
		Self { url, params: BTreeMap::new(), request: StepBehavior::Default }
	}

	/// Adds a single static parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(key.into(), value.into());

		self
	}

	/// Adds multiple static parameters.
	pub fn with_params<I, K, V>(mut self, pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		for (key, value) in pairs {
			self.params.insert(key.into(), value.into());
		}

		self
	}

	/// Replaces the default implementation with a provider-supplied override.
	pub fn with_request(mut self, request: F) -> Self {
		self.request = StepBehavior::Custom(request);

		self
	}

	/// Returns true when the step carries a provider-supplied override.
	pub fn has_override(&self) -> bool {
		self.request.is_custom()
	}
}

/// Authorization step descriptor.
pub type AuthorizationEndpoint = Endpoint<AuthorizationOverride>;
/// Token step descriptor.
pub type TokenEndpoint = Endpoint<TokenOverride>;
/// Userinfo step descriptor.
pub type UserinfoEndpoint = Endpoint<UserinfoOverride>;

/// Cosmetic provider metadata; carries no behavior.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMeta {
	/// Logo asset path or URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub logo: Option<String>,
	/// Logo variant for dark backgrounds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub logo_dark: Option<String>,
	/// Button background color.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bg: Option<String>,
	/// Button background color for dark mode.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bg_dark: Option<String>,
	/// Button text color.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
	/// Button text color for dark mode.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text_dark: Option<String>,
}

/// Immutable, fully-resolved description of one identity provider.
///
/// Constructed once at host-engine startup via [`ProviderDefinition::resolve`], then treated as
/// read-only for the lifetime of the process; function members are `Arc`-backed, so cloning is
/// cheap and concurrent sign-in attempts share one definition without synchronization.
#[derive(Clone, Debug)]
pub struct ProviderDefinition {
	/// Unique key within the host engine's registry.
	pub id: ProviderId,
	/// Orchestration discriminator.
	pub kind: ProviderKind,
	/// Human-readable provider name.
	pub display_name: String,
	/// OAuth client identifier supplied by the integrator.
	pub client_id: String,
	/// OAuth client secret supplied by the integrator; never logged or echoed.
	pub client_secret: Secret,
	/// Redirect URI, when the provider requires it at the definition level.
	pub redirect_uri: Option<Url>,
	/// Client authentication mode applied by the default token step.
	pub client_auth_method: ClientAuthMethod,
	/// Authorization step descriptor.
	pub authorization: AuthorizationEndpoint,
	/// Token step descriptor.
	pub token: TokenEndpoint,
	/// Userinfo step descriptor.
	pub userinfo: UserinfoEndpoint,
	/// Mapper from raw profile payloads into the canonical identity record.
	pub profile_mapper: ProfileMapper,
	/// Integrator-owned extra configuration, stored opaquely and never interpreted here.
	pub extra: BTreeMap<String, Value>,
	/// Optional cosmetic metadata.
	pub display: Option<DisplayMeta>,
}
impl ProviderDefinition {
	/// Returns the integrator extra under `key` as a string slice, when present.
	pub fn extra_str(&self, key: &str) -> Option<&str> {
		self.extra.get(key).and_then(Value::as_str)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn step_behavior_reports_custom_dispatch() {
		let plain: AuthorizationEndpoint = Endpoint::new(
			Url::parse("https://idp.example.com/authorize").expect("Fixture URL should parse."),
		);

		assert!(!plain.has_override());

		let custom = plain
			.with_request(AuthorizationOverride::new(|inputs: overrides::AuthorizationInputs| {
				async move { Ok(inputs.url) }
			}));

		assert!(custom.has_override());
	}

	#[test]
	fn provider_kind_label_is_stable() {
		assert_eq!(ProviderKind::OAuth.as_str(), "oauth");
		assert_eq!(
			serde_json::to_string(&ProviderKind::OAuth).expect("Kind should serialize."),
			"\"oauth\"",
		);
	}
}
