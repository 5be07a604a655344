use std::env;

const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";
const GROQ_DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
const MISTRAL_DEFAULT_MODEL: &str = "mistral-medium-latest";

/// One entry in the provider lineup.
///
/// A keyless spec is deliberately legal: the provider stays in the lineup and
/// fails each attempt with `MissingCredential` without touching the network,
/// so enabling a provider is purely a matter of supplying its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSpec {
    Gemini {
        api_key: Option<String>,
        model: String,
    },
    Groq {
        api_key: Option<String>,
        model: String,
    },
    Mistral {
        api_key: Option<String>,
        model: String,
    },
}

impl ProviderSpec {
    pub fn gemini(api_key: Option<String>) -> Self {
        Self::Gemini {
            api_key,
            model: GEMINI_DEFAULT_MODEL.to_string(),
        }
    }

    pub fn groq(api_key: Option<String>) -> Self {
        Self::Groq {
            api_key,
            model: GROQ_DEFAULT_MODEL.to_string(),
        }
    }

    pub fn mistral(api_key: Option<String>) -> Self {
        Self::Mistral {
            api_key,
            model: MISTRAL_DEFAULT_MODEL.to_string(),
        }
    }

    /// Replaces the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        match &mut self {
            Self::Gemini { model: m, .. }
            | Self::Groq { model: m, .. }
            | Self::Mistral { model: m, .. } => *m = model.into(),
        }
        self
    }
}

/// Ordered provider lineup for the dispatcher.
///
/// Insertion order is trial order: the first entry is always tried first and
/// the rest are fallbacks, in sequence. The host application assembles this
/// once and hands it to [`Orchestrator::new`](crate::Orchestrator::new);
/// nothing in the dispatch path reads the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AiConfig {
    pub providers: Vec<ProviderSpec>,
}

impl AiConfig {
    pub fn new(providers: Vec<ProviderSpec>) -> Self {
        Self { providers }
    }

    /// Assembles the platform's default lineup (Gemini, then Groq, then
    /// Mistral) from `GEMINI_API_KEY` / `GROQ_API_KEY` / `MISTRAL_API_KEY`,
    /// with optional `GEMINI_MODEL` / `GROQ_MODEL` / `MISTRAL_MODEL`
    /// overrides.
    ///
    /// An unset (or empty) key leaves its provider keyless rather than
    /// dropping it from the lineup.
    pub fn from_env() -> Self {
        Self::new(vec![
            spec_from_env("GEMINI_API_KEY", "GEMINI_MODEL", ProviderSpec::gemini),
            spec_from_env("GROQ_API_KEY", "GROQ_MODEL", ProviderSpec::groq),
            spec_from_env("MISTRAL_API_KEY", "MISTRAL_MODEL", ProviderSpec::mistral),
        ])
    }
}

fn spec_from_env(
    key_var: &str,
    model_var: &str,
    make: fn(Option<String>) -> ProviderSpec,
) -> ProviderSpec {
    // An empty key counts as unset.
    let key = env::var(key_var).ok().filter(|key| !key.is_empty());
    let spec = make(key);
    match env::var(model_var) {
        Ok(model) if !model.is_empty() => spec.with_model(model),
        _ => spec,
    }
}
