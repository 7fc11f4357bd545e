// self
use crate::{
	_prelude::*,
	auth::{ProfileMapper, ProviderId, ProviderIdError, Secret},
	obs::FlowStep,
	provider::{
		AuthorizationOverride, ClientAuthMethod, DisplayMeta, Endpoint, ProviderDefinition,
		ProviderKind, TokenOverride, UserinfoOverride,
	},
};

/// Errors raised while resolving or validating a provider definition.
///
/// All variants are fatal at startup and prevent the provider from being registered.
#[derive(Debug, ThisError)]
pub enum ConfigurationError {
	/// Integrator options carry no client identifier.
	#[error("Provider `{provider}` is missing a client id.")]
	MissingClientId {
		/// Provider identifier string.
		provider: String,
	},
	/// Integrator options carry no client secret.
	#[error("Provider `{provider}` is missing a client secret.")]
	MissingClientSecret {
		/// Provider identifier string.
		provider: String,
	},
	/// Neither the defaults nor the integrator supplied a profile mapper.
	#[error("Provider `{provider}` is missing a profile mapper.")]
	MissingProfileMapper {
		/// Provider identifier string.
		provider: String,
	},
	/// The provider requires a redirect URI at the definition level and none was supplied.
	#[error("Provider `{provider}` requires a redirect URI.")]
	MissingRedirectUri {
		/// Provider identifier string.
		provider: String,
	},
	/// Neither the defaults nor the integrator declared the step's endpoint.
	#[error("Provider `{provider}` declares no {step} endpoint.")]
	MissingEndpoint {
		/// Provider identifier string.
		provider: String,
		/// Step whose endpoint is absent.
		step: FlowStep,
	},
	/// Provider identifier failed validation.
	#[error(transparent)]
	InvalidId(#[from] ProviderIdError),
}

/// Endpoint configuration accepted during resolution: either a literal URL or a structured
/// descriptor carrying static params and an optional step override.
#[derive(Clone, Debug)]
pub enum EndpointSetting<F> {
	/// Literal endpoint URL; no static params, default behavior.
	Url(Url),
	/// Structured descriptor.
	Descriptor(Endpoint<F>),
}
impl<F> EndpointSetting<F> {
	fn into_endpoint(self) -> Endpoint<F> {
		match self {
			Self::Url(url) => Endpoint::new(url),
			Self::Descriptor(endpoint) => endpoint,
		}
	}
}
impl<F> From<Url> for EndpointSetting<F> {
	fn from(url: Url) -> Self {
		Self::Url(url)
	}
}
impl<F> From<Endpoint<F>> for EndpointSetting<F> {
	fn from(endpoint: Endpoint<F>) -> Self {
		Self::Descriptor(endpoint)
	}
}

/// Integrator-supplied options for one provider.
///
/// Everything is optional at the type level; [`ProviderDefinition::resolve`] enforces which
/// fields are required for the provider being resolved.
#[derive(Clone, Debug, Default)]
pub struct ProviderOptions {
	/// OAuth client identifier.
	pub client_id: Option<String>,
	/// OAuth client secret.
	pub client_secret: Option<Secret>,
	/// Redirect URI, for providers that pin it at the definition level.
	pub redirect_uri: Option<Url>,
	/// Client authentication mode override.
	pub client_auth_method: Option<ClientAuthMethod>,
	/// Authorization endpoint replacement; replaces the default wholesale.
	pub authorization: Option<EndpointSetting<AuthorizationOverride>>,
	/// Token endpoint replacement; replaces the default wholesale.
	pub token: Option<EndpointSetting<TokenOverride>>,
	/// Userinfo endpoint replacement; replaces the default wholesale.
	pub userinfo: Option<EndpointSetting<UserinfoOverride>>,
	/// Profile mapper replacement.
	pub profile_mapper: Option<ProfileMapper>,
	/// Cosmetic metadata replacement.
	pub display: Option<DisplayMeta>,
	/// Provider-specific extra configuration; merged per key over the defaults' extras.
	pub extra: BTreeMap<String, Value>,
}
impl ProviderOptions {
	/// Creates empty options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the client identifier.
	pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the client secret.
	pub fn with_client_secret(mut self, client_secret: impl Into<Secret>) -> Self {
		self.client_secret = Some(client_secret.into());

		self
	}

	/// Sets the definition-level redirect URI.
	pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
		self.redirect_uri = Some(redirect_uri);

		self
	}

	/// Overrides the client authentication mode.
	pub fn with_client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.client_auth_method = Some(method);

		self
	}

	/// Replaces the authorization endpoint wholesale.
	pub fn with_authorization(
		mut self,
		setting: impl Into<EndpointSetting<AuthorizationOverride>>,
	) -> Self {
		self.authorization = Some(setting.into());

		self
	}

	/// Replaces the token endpoint wholesale.
	pub fn with_token(mut self, setting: impl Into<EndpointSetting<TokenOverride>>) -> Self {
		self.token = Some(setting.into());

		self
	}

	/// Replaces the userinfo endpoint wholesale.
	pub fn with_userinfo(mut self, setting: impl Into<EndpointSetting<UserinfoOverride>>) -> Self {
		self.userinfo = Some(setting.into());

		self
	}

	/// Replaces the profile mapper.
	pub fn with_profile_mapper(mut self, mapper: ProfileMapper) -> Self {
		self.profile_mapper = Some(mapper);

		self
	}

	/// Replaces the cosmetic metadata.
	pub fn with_display(mut self, display: DisplayMeta) -> Self {
		self.display = Some(display);

		self
	}

	/// Adds one provider-specific extra value.
	pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extra.insert(key.into(), value.into());

		self
	}
}

/// Built-in defaults for one provider, authored alongside the host engine.
#[derive(Clone, Debug)]
pub struct ProviderDefaults {
	/// Unique key within the host engine's registry.
	pub id: ProviderId,
	/// Orchestration discriminator.
	pub kind: ProviderKind,
	/// Human-readable provider name.
	pub display_name: String,
	/// Default client authentication mode.
	pub client_auth_method: ClientAuthMethod,
	/// Default authorization endpoint descriptor.
	pub authorization: Option<EndpointSetting<AuthorizationOverride>>,
	/// Default token endpoint descriptor.
	pub token: Option<EndpointSetting<TokenOverride>>,
	/// Default userinfo endpoint descriptor.
	pub userinfo: Option<EndpointSetting<UserinfoOverride>>,
	/// Default profile mapper.
	pub profile_mapper: Option<ProfileMapper>,
	/// Marks the redirect URI as required during resolution (WeChat pins it per definition).
	pub requires_redirect_uri: bool,
	/// Default cosmetic metadata.
	pub display: Option<DisplayMeta>,
	/// Default provider-specific extras.
	pub extra: BTreeMap<String, Value>,
}
impl ProviderDefaults {
	/// Creates defaults seeded with the provider identity.
	pub fn new(id: ProviderId, display_name: impl Into<String>) -> Self {
		Self {
			id,
			kind: ProviderKind::OAuth,
			display_name: display_name.into(),
			client_auth_method: ClientAuthMethod::default(),
			authorization: None,
			token: None,
			userinfo: None,
			profile_mapper: None,
			requires_redirect_uri: false,
			display: None,
			extra: BTreeMap::new(),
		}
	}

	/// Sets the default client authentication mode.
	pub fn with_client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.client_auth_method = method;

		self
	}

	/// Sets the default authorization endpoint.
	pub fn with_authorization(
		mut self,
		setting: impl Into<EndpointSetting<AuthorizationOverride>>,
	) -> Self {
		self.authorization = Some(setting.into());

		self
	}

	/// Sets the default token endpoint.
	pub fn with_token(mut self, setting: impl Into<EndpointSetting<TokenOverride>>) -> Self {
		self.token = Some(setting.into());

		self
	}

	/// Sets the default userinfo endpoint.
	pub fn with_userinfo(mut self, setting: impl Into<EndpointSetting<UserinfoOverride>>) -> Self {
		self.userinfo = Some(setting.into());

		self
	}

	/// Sets the default profile mapper.
	pub fn with_profile_mapper(mut self, mapper: ProfileMapper) -> Self {
		self.profile_mapper = Some(mapper);

		self
	}

	/// Marks the redirect URI as required during resolution.
	pub fn require_redirect_uri(mut self) -> Self {
		self.requires_redirect_uri = true;

		self
	}

	/// Sets the default cosmetic metadata.
	pub fn with_display(mut self, display: DisplayMeta) -> Self {
		self.display = Some(display);

		self
	}

	/// Adds one default extra value.
	pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extra.insert(key.into(), value.into());

		self
	}
}

impl ProviderDefinition {
	/// Resolves integrator options over built-in defaults into an immutable definition.
	///
	/// Pure data assembly with no network or IO side effects. Integrator-supplied fields take
	/// precedence over defaults field-by-field; endpoint descriptors are replaced wholesale
	/// rather than deep-merged, so a partially-overridden endpoint config cannot arise; extras
	/// merge per key with integrator values winning.
	pub fn resolve(
		options: ProviderOptions,
		defaults: ProviderDefaults,
	) -> Result<Self, ConfigurationError> {
		let provider = defaults.id.to_string();
		let client_id = options
			.client_id
			.ok_or_else(|| ConfigurationError::MissingClientId { provider: provider.clone() })?;
		let client_secret = options
			.client_secret
			.ok_or_else(|| ConfigurationError::MissingClientSecret { provider: provider.clone() })?;
		let redirect_uri = options.redirect_uri;

		if defaults.requires_redirect_uri && redirect_uri.is_none() {
			return Err(ConfigurationError::MissingRedirectUri { provider });
		}

		let authorization = resolve_endpoint(
			&provider,
			FlowStep::Authorization,
			options.authorization,
			defaults.authorization,
		)?;
		let token = resolve_endpoint(&provider, FlowStep::Token, options.token, defaults.token)?;
		let userinfo =
			resolve_endpoint(&provider, FlowStep::Userinfo, options.userinfo, defaults.userinfo)?;
		let profile_mapper = options
			.profile_mapper
			.or(defaults.profile_mapper)
			.ok_or(ConfigurationError::MissingProfileMapper { provider })?;
		let mut extra = defaults.extra;

		extra.extend(options.extra);

		Ok(Self {
			id: defaults.id,
			kind: defaults.kind,
			display_name: defaults.display_name,
			client_id,
			client_secret,
			redirect_uri,
			client_auth_method: options.client_auth_method.unwrap_or(defaults.client_auth_method),
			authorization,
			token,
			userinfo,
			profile_mapper,
			extra,
			display: options.display.or(defaults.display),
		})
	}
}

fn resolve_endpoint<F>(
	provider: &str,
	step: FlowStep,
	supplied: Option<EndpointSetting<F>>,
	default: Option<EndpointSetting<F>>,
) -> Result<Endpoint<F>, ConfigurationError> {
	supplied
		.or(default)
		.map(EndpointSetting::into_endpoint)
		.ok_or_else(|| ConfigurationError::MissingEndpoint { provider: provider.to_owned(), step })
}
