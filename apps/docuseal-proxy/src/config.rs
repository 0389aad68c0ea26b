//! Runtime configuration read from the environment

pub const DEFAULT_DOCUSEAL_URL: &str = "https://api.docuseal.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Sent as `X-Auth-Token` on every upstream call
    pub api_key: Option<String>,
    /// DocuSeal API base, without a trailing slash
    pub docuseal_url: String,
    /// Embedded in builder tokens
    pub user_email: Option<String>,
    /// Signs and verifies session tokens. Without it no session validates.
    pub auth_secret: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            docuseal_url: DEFAULT_DOCUSEAL_URL.to_string(),
            user_email: None,
            auth_secret: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let docuseal_url = get("DOCUSEAL_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_DOCUSEAL_URL.to_string());

        Self {
            api_key: get("DOCUSEAL_API_KEY"),
            docuseal_url,
            user_email: get("DOCUSEAL_USER_EMAIL"),
            auth_secret: get("AUTH_SECRET"),
        }
    }

    /// API key to forward; empty when none is configured
    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or("")
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
