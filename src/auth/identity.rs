//! Canonical identity record and the provider-supplied mapper that produces it.

// self
use crate::_prelude::*;

/// Normalized, provider-agnostic representation of a signed-in user.
///
/// Created fresh per sign-in attempt; persistence belongs to the host engine. `email` is `None`
/// when the provider exposes no email at all, which stays distinguishable from `Some("")`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalIdentity {
	/// Stable unique external identifier; downstream session linkage keys on it.
	pub id: String,
	/// Display name, when the provider exposes one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Email address, or `None` when the provider exposes no email.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Avatar URL, when the provider exposes one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
}
impl CanonicalIdentity {
	/// Creates a record carrying only the external identifier.
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into(), name: None, email: None, image: None }
	}

	/// Sets the display name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Sets the email address.
	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());

		self
	}

	/// Sets the avatar URL.
	pub fn with_image(mut self, image: impl Into<String>) -> Self {
		self.image = Some(image.into());

		self
	}
}

/// Provider-supplied function mapping a raw userinfo payload into a [`CanonicalIdentity`].
///
/// Required on every definition; no implicit default exists because provider payload shapes are
/// provider-specific. The mapper runs synchronously with respect to the flow.
#[derive(Clone)]
pub struct ProfileMapper(Arc<dyn Fn(&Value) -> Result<CanonicalIdentity, BoxError> + Send + Sync>);
impl ProfileMapper {
	/// Wraps a mapping function.
	pub fn new<F>(f: F) -> Self
	where
		F: 'static + Fn(&Value) -> Result<CanonicalIdentity, BoxError> + Send + Sync,
	{
		Self(Arc::new(f))
	}

	/// Applies the mapper to a raw profile payload.
	pub fn map(&self, raw: &Value) -> Result<CanonicalIdentity, BoxError> {
		(self.0)(raw)
	}
}
impl Debug for ProfileMapper {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ProfileMapper(..)")
	}
}
