use tracing::{debug, error, info, warn};

use crate::config::AiConfig;
use crate::error::{ProviderFailure, ProvidersExhausted};
use crate::providers::Provider;

/// Marker prefix carried by every degraded reply from
/// [`Orchestrator::complete`]. Callers that need to distinguish a real
/// completion from the apology can match on this (see [`is_degraded`])
/// without parsing the failure detail after it.
pub const DEGRADED_PREFIX: &str = "عذراً، المساعد الذكي غير متوفر حالياً";

/// True when a reply produced by [`Orchestrator::complete`] is the degraded
/// apology rather than provider output.
pub fn is_degraded(reply: &str) -> bool {
    reply.starts_with(DEGRADED_PREFIX)
}

/// Ordered sequential dispatcher over the provider lineup.
///
/// Providers are tried strictly in lineup order and the first non-blank
/// completion wins; providers after the winner are never contacted. A blank
/// completion counts as that provider failing, and the loop moves on. The
/// dispatcher holds no mutable state, so one instance can serve concurrent
/// callers.
pub struct Orchestrator {
    providers: Vec<Box<dyn Provider>>,
}

impl Orchestrator {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            providers: config.providers.iter().map(|spec| spec.build()).collect(),
        }
    }

    /// Builds the default lineup straight from the environment.
    pub fn from_env() -> Self {
        Self::new(&AiConfig::from_env())
    }

    /// Builds from provider instances directly, bypassing [`AiConfig`].
    pub fn with_providers(providers: Vec<Box<dyn Provider>>) -> Self {
        Self { providers }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Tries each provider in order and returns the first non-blank
    /// completion, or the full exhaustion report once the lineup runs out.
    /// An empty lineup exhausts immediately with zero attempts.
    pub async fn try_complete(&self, prompt: &str) -> Result<String, ProvidersExhausted> {
        let mut last: Option<ProviderFailure> = None;

        for provider in &self.providers {
            debug!(provider = provider.name(), "Trying provider");
            match provider.complete(prompt).await {
                Ok(text) if !text.trim().is_empty() => {
                    info!(provider = provider.name(), "Completion served");
                    return Ok(text);
                }
                Ok(_) => {
                    warn!(provider = provider.name(), "Blank completion, trying next");
                    last = Some(ProviderFailure::empty(provider.name()));
                }
                Err(failure) => {
                    warn!(
                        provider = provider.name(),
                        error = %failure.kind,
                        "Provider attempt failed, trying next"
                    );
                    last = Some(failure);
                }
            }
        }

        let exhausted = ProvidersExhausted {
            attempts: self.providers.len(),
            last,
        };
        error!(error = %exhausted, "All providers exhausted");
        Err(exhausted)
    }

    /// Like [`Orchestrator::try_complete`], but never fails: once the lineup
    /// is exhausted the caller gets an apology string starting with
    /// [`DEGRADED_PREFIX`] and carrying the last failure, so chat surfaces
    /// can render it as-is.
    pub async fn complete(&self, prompt: &str) -> String {
        match self.try_complete(prompt).await {
            Ok(text) => text,
            Err(exhausted) => format!("{DEGRADED_PREFIX} ({exhausted})"),
        }
    }
}
