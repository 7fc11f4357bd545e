//! Provider-facing definitions (data) and per-step override seams (behavior).
//!
//! `definition` exposes the immutable [`ProviderDefinition`] consumed by flows, the
//! [`Endpoint`]/[`StepBehavior`] dispatch resolved at construction time, the override function
//! seams, and the [`ProviderDefinition::resolve`] merge of integrator options over built-in
//! provider defaults.

pub mod definition;

pub use definition::*;
