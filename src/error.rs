use std::fmt;

use thiserror::Error;

/// Why a single provider attempt failed.
///
/// Every kind is recoverable from the dispatcher's point of view: the failure
/// is logged and the next provider in the lineup is tried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    /// No API key configured. Raised before any network contact is made.
    #[error("missing API key")]
    MissingCredential,
    /// The request never produced a usable HTTP response.
    #[error("transport error: {0}")]
    Transport(String),
    /// Non-2xx status, or an error object embedded in a 2xx body.
    #[error("upstream error: {0}")]
    Upstream(String),
    /// 2xx response whose body does not carry the expected text field.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// 2xx response whose text field was empty or whitespace-only.
    #[error("empty completion")]
    EmptyCompletion,
}

/// Uniform failure report for one provider attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{provider}: {kind}")]
pub struct ProviderFailure {
    /// Short provider identifier, e.g. `"gemini"` or `"groq"`.
    pub provider: String,
    pub kind: FailureKind,
}

impl ProviderFailure {
    pub fn new(provider: impl Into<String>, kind: FailureKind) -> Self {
        Self {
            provider: provider.into(),
            kind,
        }
    }

    pub fn missing_credential(provider: impl Into<String>) -> Self {
        Self::new(provider, FailureKind::MissingCredential)
    }

    pub fn transport(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(provider, FailureKind::Transport(message.into()))
    }

    pub fn upstream(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(provider, FailureKind::Upstream(message.into()))
    }

    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(provider, FailureKind::MalformedResponse(message.into()))
    }

    pub fn empty(provider: impl Into<String>) -> Self {
        Self::new(provider, FailureKind::EmptyCompletion)
    }
}

/// Every configured provider failed (or the lineup was empty) for one request.
///
/// [`Orchestrator::try_complete`](crate::Orchestrator::try_complete) returns
/// this as-is; [`Orchestrator::complete`](crate::Orchestrator::complete)
/// flattens it into the degraded apology string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidersExhausted {
    /// Number of providers attempted, in lineup order.
    pub attempts: usize,
    /// Failure recorded for the last attempted provider. `None` only when the
    /// lineup was empty.
    pub last: Option<ProviderFailure>,
}

impl fmt::Display for ProvidersExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.last {
            Some(failure) => write!(
                f,
                "all {} provider attempt(s) failed; last: {}",
                self.attempts, failure
            ),
            None => write!(f, "no completion providers configured"),
        }
    }
}

impl std::error::Error for ProvidersExhausted {}
