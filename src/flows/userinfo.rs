//! Userinfo step: raw profile retrieval with override dispatch.

// self
use crate::{
	_prelude::*,
	auth::TokenPayload,
	error::{ProviderRequestError, RequestErrorKind},
	flows::{FlowEngine, common},
	http::{FetchCapability, FetchRequest},
	obs::{self, FlowStep, StepOutcome, StepSpan},
	provider::{StepBehavior, UserinfoInputs},
};

impl<C> FlowEngine<C>
where
	C: ?Sized + FetchCapability,
{
	/// Retrieves the raw userinfo payload, using the token step's output as the credential.
	///
	/// The default implementation issues one `GET` with the descriptor's static params as query
	/// pairs and the access token as a `Bearer` header; a payload with no access token fails
	/// here, where the credential is actually needed. The response is handed to the normalizer
	/// untouched. Overrides receive the in-flight tokens (including provider-specific extras
	/// such as WeChat's `openid`) and own the retrieval entirely.
	pub async fn fetch_userinfo(&self, tokens: &TokenPayload) -> Result<Value> {
		const STEP: FlowStep = FlowStep::Userinfo;

		let span = StepSpan::new(STEP, "fetch_userinfo");

		obs::record_step_outcome(STEP, StepOutcome::Attempt);

		let result = span
			.instrument(async move {
				let endpoint = &self.definition.userinfo;

				match &endpoint.request {
					StepBehavior::Default => {
						let access_token = tokens.access_token.as_ref().ok_or_else(|| {
							ProviderRequestError::new(STEP, RequestErrorKind::MissingAccessToken)
						})?;
						let url = common::apply_query(&endpoint.url, &endpoint.params);
						let request = FetchRequest::get(url).bearer(access_token.expose());
						let response = self
							.fetch
							.fetch(request)
							.await
							.map_err(|e| ProviderRequestError::transport(STEP, e))?;

						common::ensure_success(STEP, &response)?;

						Ok(common::parse_json(STEP, &response)?)
					},
					StepBehavior::Custom(seam) => seam
						.call(UserinfoInputs {
							url: endpoint.url.clone(),
							tokens: tokens.clone(),
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
