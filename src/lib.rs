//! AI layer of the CODE BATELL learning platform.
//!
//! Interchangeable hosted completion providers behind a sequential-fallback
//! dispatcher, the domain tasks built on top of it, and the small HTTP proxy
//! the web client talks to:
//! - [`config`] describes the provider lineup; lineup order is trial order.
//! - [`providers`] wraps each hosted endpoint behind the [`Provider`] trait.
//! - [`orchestrator`] walks the lineup and serves the first usable reply.
//! - [`tasks`] holds the platform's prompts and per-surface fallbacks.
//! - [`compiler`] runs code remotely, simulating with AI when that fails.
//! - [`server`] is the HTTP facade the web client calls.
//! - [`error`] carries the per-attempt and exhaustion failure types.

pub mod compiler;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod providers;
pub mod server;
pub mod tasks;
pub mod types;

pub use compiler::Compiler;
pub use config::{AiConfig, ProviderSpec};
pub use error::{FailureKind, ProviderFailure, ProvidersExhausted};
pub use orchestrator::{DEGRADED_PREFIX, Orchestrator, is_degraded};
pub use providers::Provider;
pub use types::{ArenaChallenge, BrokenCode, ChallengeVerdict, CodeMarker};
