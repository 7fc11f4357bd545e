//! Flow-step orchestration: per-step override dispatch over shared default implementations.
//!
//! Step order is fixed and sequential: authorization redirect → (external user interaction,
//! callback with a code) → token exchange → userinfo retrieval → profile normalization. Each
//! step's output feeds the next; every failure ends the current sign-in attempt without retries.

pub mod authorization;
pub mod common;
pub mod profile;
pub mod token;
pub mod userinfo;

pub use authorization::*;

// self
use crate::{
	_prelude::*, auth::CanonicalIdentity, http::FetchCapability, provider::ProviderDefinition,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestFetch;

#[cfg(feature = "reqwest")]
/// Flow engine specialized for the crate's default reqwest transport.
pub type ReqwestFlowEngine = FlowEngine<ReqwestFetch>;

/// Drives the flow steps for a single resolved provider definition.
///
/// The engine owns the fetch capability and the definition so step implementations can focus on
/// their own request shapes. Definitions are immutable and function members are `Arc`-backed, so
/// one engine serves arbitrarily many concurrent sign-in attempts without synchronization; the
/// only suspension points are the fetches issued by default steps or inside overrides.
#[derive(Clone)]
pub struct FlowEngine<C>
where
	C: ?Sized + FetchCapability,
{
	/// Fetch capability used by default step implementations.
	pub fetch: Arc<C>,
	/// Resolved definition the engine is bound to.
	pub definition: ProviderDefinition,
}
impl<C> FlowEngine<C>
where
	C: ?Sized + FetchCapability,
{
	/// Creates an engine that reuses the caller-provided fetch capability.
	pub fn with_fetch(definition: ProviderDefinition, fetch: impl Into<Arc<C>>) -> Self {
		Self { fetch: fetch.into(), definition }
	}

	/// Runs the post-callback half of the chain: token exchange → userinfo → normalization.
	///
	/// Convenience over calling the steps individually; the host engine typically invokes this
	/// from its callback route once state validation has passed.
	pub async fn complete_sign_in(&self, code: &str) -> Result<CanonicalIdentity> {
		let tokens = self.exchange_code(code).await?;
		let raw_profile = self.fetch_userinfo(&tokens).await?;

		self.normalize_profile(&raw_profile)
	}
}
#[cfg(feature = "reqwest")]
impl FlowEngine<ReqwestFetch> {
	/// Creates an engine with the crate's default reqwest transport.
	pub fn new(definition: ProviderDefinition) -> Self {
		Self::with_fetch(definition, ReqwestFetch::default())
	}
}
impl<C> Debug for FlowEngine<C>
where
	C: ?Sized + FetchCapability,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FlowEngine").field("definition", &self.definition).finish()
	}
}
