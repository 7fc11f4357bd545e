//! Authorization step: redirect URL construction with override dispatch.

// self
use crate::{
	_prelude::*,
	error::ProviderRequestError,
	flows::{FlowEngine, common},
	http::FetchCapability,
	obs::{self, FlowStep, StepOutcome, StepSpan},
	provider::{AuthorizationInputs, ProviderDefinition, StepBehavior},
};

/// Per-attempt inputs for the authorization step, supplied by the host engine.
///
/// State generation and storage belong to the host engine's CSRF layer; this step only places
/// the value into the redirect URL.
#[derive(Clone, Debug, Default)]
pub struct AuthorizationContext {
	/// Callback URI the provider should redirect back to; falls back to the definition-level
	/// redirect URI when absent.
	pub redirect_uri: Option<Url>,
	/// Opaque state value that must round-trip via the callback.
	pub state: Option<String>,
	/// Scope string requested for this attempt.
	pub scope: Option<String>,
	/// Additional dynamic parameters; win over baseline and static params.
	pub params: BTreeMap<String, String>,
}
impl AuthorizationContext {
	/// Creates an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the callback URI for this attempt.
	pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
		self.redirect_uri = Some(redirect_uri);

		self
	}

	/// Sets the state value for this attempt.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Sets the requested scope string.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Adds one dynamic parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(key.into(), value.into());

		self
	}

	fn into_dynamic_params(self, definition: &ProviderDefinition) -> BTreeMap<String, String> {
		let mut params = BTreeMap::new();

		if let Some(redirect_uri) = self.redirect_uri.or_else(|| definition.redirect_uri.clone()) {
			params.insert("redirect_uri".into(), redirect_uri.into());
		}
		if let Some(state) = self.state {
			params.insert("state".into(), state);
		}
		if let Some(scope) = self.scope {
			params.insert("scope".into(), scope);
		}

		params.extend(self.params);

		params
	}
}

impl<C> FlowEngine<C>
where
	C: ?Sized + FetchCapability,
{
	/// Builds the authorization redirect URL for one sign-in attempt.
	///
	/// The default implementation performs no network call: the step's "request" is the redirect
	/// URL itself, assembled from the baseline (`response_type=code`, `client_id`), the
	/// descriptor's static params, and the per-attempt dynamics, later layers winning. An
	/// override receives the prepared URL and params and returns the URL to redirect to.
	pub async fn authorization_redirect(&self, context: AuthorizationContext) -> Result<Url> {
		const STEP: FlowStep = FlowStep::Authorization;

		let span = StepSpan::new(STEP, "authorization_redirect");

		obs::record_step_outcome(STEP, StepOutcome::Attempt);

		let result = span
			.instrument(async move {
				let endpoint = &self.definition.authorization;
				let baseline = BTreeMap::from_iter([
					("response_type".to_owned(), "code".to_owned()),
					("client_id".to_owned(), self.definition.client_id.clone()),
				]);
				let dynamic = context.into_dynamic_params(&self.definition);
				let params =
					common::layer_params([baseline, endpoint.params.clone(), dynamic]);
				let url = common::apply_query(&endpoint.url, &params);

				match &endpoint.request {
					StepBehavior::Default => Ok(url),
					StepBehavior::Custom(seam) => seam
						.call(AuthorizationInputs {
							url,
							params,
							definition: self.definition.clone(),
						})
						.await
						.map_err(|source| {
							ProviderRequestError::override_failure(STEP, source).into()
						}),
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_step_outcome(STEP, StepOutcome::Success),
			Err(_) => obs::record_step_outcome(STEP, StepOutcome::Failure),
		}

		result
	}
}
