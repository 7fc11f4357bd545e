//! Error taxonomy shared across definition resolution, flow steps, and profile normalization.

// self
use crate::{_prelude::*, obs::FlowStep, provider::ConfigurationError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error type accepted from overrides, mappers, and fetch implementations.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every variant is fatal to its scope: configuration failures prevent a provider from being
/// registered, the remaining variants end the current sign-in attempt. Nothing is retried here;
/// retry and user-messaging policy belong to the host engine.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Definition assembly failed; reported at startup.
	#[error(transparent)]
	Configuration(#[from] ConfigurationError),
	/// A flow step's network call or override failed.
	#[error(transparent)]
	Request(#[from] ProviderRequestError),
	/// The provider's profile mapper raised.
	#[error(transparent)]
	ProfileMapping(#[from] ProfileMappingError),
	/// The mapper succeeded but produced an invalid identity record.
	#[error(transparent)]
	ProfileValidation(#[from] ProfileValidationError),
}

/// Failure of a single flow step, retaining the step identity for diagnostics.
#[derive(Debug, ThisError)]
#[error("The {step} step failed.")]
pub struct ProviderRequestError {
	/// Flow step that produced the failure.
	pub step: FlowStep,
	/// Failure detail.
	#[source]
	pub kind: RequestErrorKind,
}
impl ProviderRequestError {
	/// Creates a new step failure from the provided detail.
	pub fn new(step: FlowStep, kind: RequestErrorKind) -> Self {
		Self { step, kind }
	}

	pub(crate) fn transport(step: FlowStep, source: TransportError) -> Self {
		Self::new(step, RequestErrorKind::Transport(source))
	}

	pub(crate) fn status(step: FlowStep, status: u16, body_preview: Option<String>) -> Self {
		Self::new(step, RequestErrorKind::Status { status, body_preview })
	}

	pub(crate) fn malformed(
		step: FlowStep,
		status: u16,
		source: serde_path_to_error::Error<serde_json::Error>,
	) -> Self {
		Self::new(step, RequestErrorKind::MalformedPayload { source, status })
	}

	pub(crate) fn override_failure(step: FlowStep, source: BoxError) -> Self {
		Self::new(step, RequestErrorKind::Override { source })
	}
}

/// Failure detail recorded for a flow step.
#[derive(Debug, ThisError)]
pub enum RequestErrorKind {
	/// Underlying fetch capability reported a transport failure.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider answered with a non-success HTTP status.
	#[error("Provider returned HTTP {status}.")]
	Status {
		/// HTTP status code returned by the provider.
		status: u16,
		/// Truncated response body retained for diagnostics.
		body_preview: Option<String>,
	},
	/// Provider answered with a body that does not parse as the step's expected shape.
	#[error("Provider returned a malformed payload.")]
	MalformedPayload {
		/// Structured parsing failure including the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code returned alongside the malformed body.
		status: u16,
	},
	/// A provider-supplied override raised; surfaced verbatim, never retried.
	#[error("Step override failed.")]
	Override {
		/// Error raised inside the override function.
		#[source]
		source: BoxError,
	},
	/// The token payload carries no access token, so the default userinfo request cannot be built.
	#[error("Token payload does not carry an access token.")]
	MissingAccessToken,
}

/// Failure raised by the provider's profile mapper itself.
#[derive(Debug, ThisError)]
#[error("Profile mapper failed for provider `{provider}`.")]
pub struct ProfileMappingError {
	/// Provider identifier string.
	pub provider: String,
	/// Error raised inside the mapper.
	#[source]
	pub source: BoxError,
}

/// Mapper output rejected during normalization.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProfileValidationError {
	/// Downstream session linkage keys on `id`, so an empty one ends the attempt.
	#[error("Mapped profile for provider `{provider}` is missing a stable `id`.")]
	MissingId {
		/// Provider identifier string.
		provider: String,
	},
}

/// Transport-level failures (network, IO) surfaced by fetch implementations.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
