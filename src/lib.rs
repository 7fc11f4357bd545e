//! Provider definitions, per-step override dispatch, and profile normalization for OAuth 2.0
//! sign-in engines.
//!
//! A sign-in engine hands this crate a resolved [`provider::ProviderDefinition`] and drives the
//! authorization-code flow step by step through a [`flows::FlowEngine`]; each step either runs the
//! shared default implementation or a provider-supplied override, and the chain ends in a
//! [`auth::CanonicalIdentity`] the engine links sessions to.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod provider;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{flows::FlowEngine, http::ReqwestFetch, provider::ProviderDefinition};

	/// Flow engine type alias used by reqwest-backed integration tests.
	pub type ReqwestTestEngine = FlowEngine<ReqwestFetch>;

	/// Builds a reqwest fetch capability that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_fetch() -> ReqwestFetch {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestFetch::with_client(client)
	}

	/// Constructs a [`FlowEngine`] bound to the provided definition and the reqwest transport
	/// used across integration tests.
	pub fn build_reqwest_test_engine(definition: ProviderDefinition) -> ReqwestTestEngine {
		FlowEngine::with_fetch(definition, test_reqwest_fetch())
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{BoxError, Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
