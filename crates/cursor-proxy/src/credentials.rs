//! API key resolution for the agent CLI.
//!
//! The key can come from three places, in order of precedence:
//! - `CURSOR_API_KEY`: the literal key.
//! - `CURSOR_API_KEY_URL`: a URL whose response body is the key.
//! - `CURSOR_API_KEY_SCRIPT`: a shell command whose stdout is the key.
//!
//! The source is captured once at startup; URL fetches and script runs still
//! happen per request, so a failure surfaces on the request that hit it.
//! Resolved values are passed through as-is, without trimming.

use anyhow::{anyhow, Context, Result};
use tracing::debug;

/// Where the agent API key comes from.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    Static(String),
    Url(String),
    Script(String),
}

impl CredentialSource {
    /// Read the credential source from the environment, honoring precedence.
    /// Returns `None` when no source is configured.
    pub fn from_env() -> Option<Self> {
        if let Ok(key) = std::env::var("CURSOR_API_KEY") {
            if !key.is_empty() {
                return Some(CredentialSource::Static(key));
            }
        }
        if let Ok(url) = std::env::var("CURSOR_API_KEY_URL") {
            if !url.is_empty() {
                return Some(CredentialSource::Url(url));
            }
        }
        if let Ok(script) = std::env::var("CURSOR_API_KEY_SCRIPT") {
            if !script.is_empty() {
                return Some(CredentialSource::Script(script));
            }
        }
        None
    }

    /// Produce the API key for one request.
    pub async fn resolve(&self, client: &reqwest::Client) -> Result<String> {
        match self {
            CredentialSource::Static(key) => Ok(key.clone()),
            CredentialSource::Url(url) => {
                debug!(url = %url, "fetching api key from url");
                let resp = client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("failed to fetch api key from {url}"))?;
                resp.text()
                    .await
                    .context("failed to read api key response body")
            }
            CredentialSource::Script(script) => {
                debug!(script = %script, "resolving api key from script");
                let output = tokio::process::Command::new("bash")
                    .arg("-c")
                    .arg(script)
                    .stderr(std::process::Stdio::inherit())
                    .output()
                    .await
                    .context("failed to run api key script")?;
                if !output.status.success() {
                    return Err(anyhow!("api key script exited with {}", output.status));
                }
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
        }
    }
}

/// Mask an API key for log output: first four characters, rest hidden.
pub fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}******")
}
