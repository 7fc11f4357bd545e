//! Profile normalization: raw userinfo payload → canonical identity record.

// self
use crate::{
	_prelude::*,
	auth::CanonicalIdentity,
	error::{ProfileMappingError, ProfileValidationError},
	flows::FlowEngine,
	http::FetchCapability,
	obs::{self, FlowStep, StepOutcome, StepSpan},
};

impl<C> FlowEngine<C>
where
	C: ?Sized + FetchCapability,
{
	/// Normalizes a raw userinfo payload into the canonical identity record.
	///
	/// Runs the definition's mapper synchronously with respect to the flow. Mapper failures
	/// propagate as [`ProfileMappingError`]; a mapped record whose `id` is missing or empty
	/// fails with [`ProfileValidationError`], terminal for the sign-in attempt. No partial
	/// record is ever returned.
	pub fn normalize_profile(&self, raw_profile: &Value) -> Result<CanonicalIdentity> {
		const STEP: FlowStep = FlowStep::Profile;

		let _guard = StepSpan::new(STEP, "normalize_profile").entered();

		obs::record_step_outcome(STEP, StepOutcome::Attempt);

		let result = self
			.definition
			.profile_mapper
			.map(raw_profile)
			.map_err(|source| {
				Error::from(ProfileMappingError {
					provider: self.definition.id.to_string(),
					source,
				})
			})
			.and_then(|identity| {
				if identity.id.trim().is_empty() {
					Err(ProfileValidationError::MissingId {
						provider: self.definition.id.to_string(),
					}
					.into())
				} else {
					Ok(identity)
				}
			});

		match &result {
			Ok(_) => obs::record_step_outcome(STEP, StepOutcome::Success),
			Err(_) => obs::record_step_outcome(STEP, StepOutcome::Failure),
		}

		result
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		flows::common::testkit::{self, NeverFetch},
		provider::{ProviderDefinition, ProviderOptions},
	};

	#[test]
	fn wechat_shaped_profiles_round_trip() {
		let engine = testkit::engine_with(NeverFetch);
		let raw = serde_json::json!({
			"openid": "abc",
			"nickname": "Bob",
			"headimgurl": "http://x/y.png",
		});
		let identity =
			engine.normalize_profile(&raw).expect("Normalization fixture should succeed.");

		assert_eq!(identity.id, "abc");
		assert_eq!(identity.name.as_deref(), Some("Bob"));
		assert_eq!(identity.email, None);
		assert_eq!(identity.image.as_deref(), Some("http://x/y.png"));
	}

	#[test]
	fn missing_or_empty_ids_are_terminal() {
		let engine = testkit::engine_with(NeverFetch);
		let missing = serde_json::json!({ "nickname": "Bob" });
		let err = engine
			.normalize_profile(&missing)
			.expect_err("A profile without an id must not normalize.");

		assert!(matches!(err, Error::ProfileValidation(ProfileValidationError::MissingId { .. })));

		let empty = serde_json::json!({ "openid": "" });

		assert!(engine.normalize_profile(&empty).is_err());
	}

	#[test]
	fn mapper_failures_propagate_unchanged() {
		let defaults = testkit::qrconnect_defaults().with_profile_mapper(
			crate::auth::ProfileMapper::new(|_raw| Err(BoxError::from("unexpected payload"))),
		);
		let definition = ProviderDefinition::resolve(
			ProviderOptions::new().with_client_id("APPID").with_client_secret("SECRET"),
			defaults,
		)
		.expect("Definition fixture should resolve.");
		let engine = FlowEngine::with_fetch(definition, NeverFetch);
		let err = engine
			.normalize_profile(&serde_json::json!({}))
			.expect_err("Mapper failures should propagate.");

		match err {
			Error::ProfileMapping(ProfileMappingError { provider, source }) => {
				assert_eq!(provider, "wechat");
				assert_eq!(source.to_string(), "unexpected payload");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
