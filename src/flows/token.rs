//! Token step: authorization-code exchange with override dispatch.

// self
use crate::{
	_prelude::*,
	auth::TokenPayload,
	error::ProviderRequestError,
	flows::{FlowEngine, common},
	http::{FetchCapability, FetchRequest},
	obs::{self, FlowStep, StepOutcome, StepSpan},
	provider::{ClientAuthMethod, StepBehavior, TokenInputs},
};

impl<C> FlowEngine<C>
where
	C: ?Sized + FetchCapability,
{
	/// Exchanges an authorization code for the provider's token payload.
	///
	/// The default implementation posts one `application/x-www-form-urlencoded` request:
	/// `grant_type=authorization_code`, the code, the definition-level redirect URI when
	/// configured, the descriptor's static params, and client credentials per the definition's
	/// auth method. The response parses as a [`TokenPayload`]; fields the provider omits stay
	/// `None` and only fail downstream, where they are actually needed. An override owns the
	/// whole exchange and its return value flows unchanged to the userinfo step.
	pub async fn exchange_code(&self, code: &str) -> Result<TokenPayload> {
		const STEP: FlowStep = FlowStep::Token;

		let span = StepSpan::new(STEP, "exchange_code");

		obs::record_step_outcome(STEP, StepOutcome::Attempt);

		let result = span
			.instrument(async move {
				let endpoint = &self.definition.token;
				let mut baseline = BTreeMap::from_iter([(
					"grant_type".to_owned(),
					"authorization_code".to_owned(),
				)]);

				if self.definition.client_auth_method == ClientAuthMethod::ClientSecretPost {
					baseline.insert("client_id".into(), self.definition.client_id.clone());
					baseline.insert(
						"client_secret".into(),
						self.definition.client_secret.expose().to_owned(),
					);
				}

				let mut dynamic =
					BTreeMap::from_iter([("code".to_owned(), code.to_owned())]);

				if let Some(redirect_uri) = &self.definition.redirect_uri {
					dynamic.insert("redirect_uri".into(), redirect_uri.to_string());
				}

				let form =
					common::layer_params([baseline, endpoint.params.clone(), dynamic]);

				match &endpoint.request {
					StepBehavior::Default => {
						let mut request = FetchRequest::form(endpoint.url.clone(), &form);

						if self.definition.client_auth_method
							== ClientAuthMethod::ClientSecretBasic
						{
							request = request.basic_auth(
								&self.definition.client_id,
								self.definition.client_secret.expose(),
							);
						}

						let response = self
							.fetch
							.fetch(request)
							.await
							.map_err(|e| ProviderRequestError::transport(STEP, e))?;

						common::ensure_success(STEP, &response)?;

						Ok(common::parse_json(STEP, &response)?)
					},
					StepBehavior::Custom(seam) => seam
						.call(TokenInputs {
							url: endpoint.url.clone(),
							form,
							code: code.to_owned(),
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
