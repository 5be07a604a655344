use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::orchestrator::Orchestrator;
use crate::providers::HTTP;
use crate::tasks;

const DEFAULT_HOST: &str = "cpp-17-code-compiler.p.rapidapi.com";

/// Remote C++ compiler client. Every failure path falls back to the AI
/// compiler simulation, so a learner always gets some output back.
pub struct Compiler {
    api_key: Option<String>,
    host: String,
}

#[derive(Serialize)]
struct CompileRequest<'a> {
    code: &'a str,
    stdin: &'a str,
}

#[derive(Deserialize)]
struct CompileResponse {
    output: Option<String>,
}

impl Compiler {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            host: DEFAULT_HOST.to_string(),
        }
    }

    /// Reads `RAPIDAPI_KEY`, with an optional `RAPIDAPI_HOST` override.
    pub fn from_env() -> Self {
        let mut compiler = Self::new(
            std::env::var("RAPIDAPI_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
        );
        if let Ok(host) = std::env::var("RAPIDAPI_HOST")
            && !host.is_empty()
        {
            compiler.host = host;
        }
        compiler
    }

    /// Compiles and runs the snippet remotely. On any failure (no key,
    /// transport error, non-2xx, missing or empty `output`) the same snippet
    /// goes to the AI simulation instead.
    pub async fn compile(&self, ai: &Orchestrator, code: &str, stdin: &str) -> String {
        match self.compile_remote(code, stdin).await {
            Some(output) => output,
            None => tasks::simulate_execution(ai, code, stdin).await,
        }
    }

    async fn compile_remote(&self, code: &str, stdin: &str) -> Option<String> {
        let key = self.api_key.as_deref()?;

        let response = HTTP
            .post(format!("https://{}/compile/", self.host))
            .header("x-rapidapi-key", key)
            .header("x-rapidapi-host", self.host.as_str())
            .json(&CompileRequest { code, stdin })
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Compiler API unreachable");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "Compiler API rejected the request");
            return None;
        }

        let parsed = match response.json::<CompileResponse>().await {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "Compiler API body was unreadable");
                return None;
            }
        };

        parsed.output.filter(|output| !output.is_empty())
    }
}
