//! Configuration from environment variables.
//!
//! All configuration is read once at startup and passed to handlers through
//! [`crate::server::AppState`]; nothing reads the environment during request
//! handling.
//!
//! **Environment variables:**
//! - `PORT`: server port (default: 8000)
//! - `CURSOR_AGENT_PATH`: agent executable (default: `cursor-agent`)
//! - `API_TOKEN`: shared secret for incoming requests (unset: open access)
//! - `CURSOR_API_KEY` / `CURSOR_API_KEY_URL` / `CURSOR_API_KEY_SCRIPT`:
//!   credential source, see [`crate::credentials`]

use std::env;

use crate::credentials::CredentialSource;

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub port: u16,
    pub agent_path: String,
    pub auth_token: Option<String>,
    pub credentials: Option<CredentialSource>,
    /// Static list served by `GET /v1/models`. The proxy does no routing on
    /// these; the model id is passed straight to the agent.
    pub models: Vec<String>,
}

fn default_models() -> Vec<String> {
    ["gpt-5", "sonnet-4", "sonnet-4-thinking"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            agent_path: "cursor-agent".to_string(),
            auth_token: None,
            credentials: None,
            models: default_models(),
        }
    }
}

impl ProxyConfig {
    /// Read configuration from the environment once at startup.
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            agent_path: env::var("CURSOR_AGENT_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "cursor-agent".to_string()),
            auth_token: env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),
            credentials: CredentialSource::from_env(),
            models: default_models(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ProxyConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.agent_path, "cursor-agent");
        assert!(config.auth_token.is_none());
        assert!(config.credentials.is_none());
        assert_eq!(
            config.models,
            vec!["gpt-5", "sonnet-4", "sonnet-4-thinking"]
        );
    }
}
