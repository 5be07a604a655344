pub mod gemini;
pub mod groq;
pub mod mistral;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::config::ProviderSpec;
use crate::error::ProviderFailure;

pub use gemini::GeminiProvider;
pub use groq::GroqProvider;
pub use mistral::MistralProvider;

/// Shared HTTP client. reqwest pools connections internally, so one instance
/// serves the whole lineup.
pub(crate) static HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// A hosted completion backend: one prompt in, one plain-text completion out.
///
/// Implementations own their wire format end to end and map every way a call
/// can go wrong onto [`ProviderFailure`], so the dispatcher can treat all
/// backends uniformly. A missing key must be reported without any network
/// contact.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short identifier used in logs and failure reports.
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String, ProviderFailure>;
}

impl ProviderSpec {
    /// Instantiates the concrete client for this spec.
    pub fn build(&self) -> Box<dyn Provider> {
        match self {
            ProviderSpec::Gemini { api_key, model } => {
                Box::new(GeminiProvider::new(api_key.clone(), model.clone()))
            }
            ProviderSpec::Groq { api_key, model } => {
                Box::new(GroqProvider::new(api_key.clone(), model.clone()))
            }
            ProviderSpec::Mistral { api_key, model } => {
                Box::new(MistralProvider::new(api_key.clone(), model.clone()))
            }
        }
    }
}
