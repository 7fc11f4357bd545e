//! Token-step payload handed from the token exchange to the userinfo step.

// self
use crate::{_prelude::*, auth::Secret};

/// Loosely typed token endpoint payload.
///
/// The token step parses (or an override returns) this shape without further validation: a
/// payload with no access token only fails later, when the default userinfo request cannot be
/// built. Provider-specific response fields such as WeChat's `openid` survive in [`extra`] so
/// userinfo overrides can reach them.
///
/// [`extra`]: TokenPayload::extra
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
	/// Access token used as the userinfo credential.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_token: Option<Secret>,
	/// Token type reported by the provider (usually `bearer`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_type: Option<String>,
	/// Lifetime in seconds, relative to issuance.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<i64>,
	/// Refresh token, when the provider issues one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<Secret>,
	/// Granted scope string, when the provider reports it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
	/// Provider-specific response fields preserved verbatim.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}
impl TokenPayload {
	/// Creates a payload carrying a single bearer access token.
	pub fn bearer(access_token: impl Into<Secret>) -> Self {
		Self {
			access_token: Some(access_token.into()),
			token_type: Some("bearer".into()),
			..Self::default()
		}
	}

	/// Computes the absolute expiry for a payload issued at `issued_at`.
	pub fn expires_at(&self, issued_at: OffsetDateTime) -> Option<OffsetDateTime> {
		self.expires_in.map(|secs| issued_at + Duration::seconds(secs))
	}

	/// Returns a provider-specific extra field as a string slice, when present.
	pub fn extra_str(&self, key: &str) -> Option<&str> {
		self.extra.get(key).and_then(Value::as_str)
	}
}
