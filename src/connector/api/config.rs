use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{
    FallbackPolicy, PromptFormatter, DEFAULT_MAX_INPUT_CHARS, DEFAULT_MAX_PROMPT_CHARS,
    DEFAULT_MIN_INPUT_CHARS,
};
use crate::connector::adapter::{
    default_endpoint, AwsCredentials, DEFAULT_COMPLETION_BASE_URL, DEFAULT_COMPLETION_MODEL,
    DEFAULT_MODEL_ID, DEFAULT_REGION,
};
use crate::domain::DomainError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Which model endpoint the pipeline talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Cloud foundation model taking `{"inputText": ...}`, signed with SigV4.
    #[default]
    Foundation,
    /// OpenAI-compatible chat completions.
    Completion,
    /// Offline echo of the prompt.
    Mock,
}

/// Startup configuration, resolved once and injected into the [`super::Container`].
///
/// Sources, lowest precedence first: defaults, optional TOML file, environment,
/// command-line flags (applied by `main`).
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: Backend,
    pub region: String,
    /// Overrides the backend's default endpoint / base URL.
    pub endpoint: Option<String>,
    /// Overrides the backend's default model id.
    pub model: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub min_input_chars: usize,
    pub max_input_chars: usize,
    pub max_prompt_chars: usize,
    pub include_history: bool,
    pub require_keywords: bool,
    pub fallback: FallbackPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            model: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            min_input_chars: DEFAULT_MIN_INPUT_CHARS,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            include_history: false,
            require_keywords: false,
            fallback: FallbackPolicy::default(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("AppConfig")
            .field("backend", &self.backend)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("access_key_id", &redact(&self.access_key_id))
            .field("secret_access_key", &redact(&self.secret_access_key))
            .field("session_token", &redact(&self.session_token))
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .field("min_input_chars", &self.min_input_chars)
            .field("max_input_chars", &self.max_input_chars)
            .field("max_prompt_chars", &self.max_prompt_chars)
            .field("include_history", &self.include_history)
            .field("require_keywords", &self.require_keywords)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl AppConfig {
    /// Defaults, then the TOML file when given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, DomainError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DomainError::config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
            .map_err(|e| DomainError::config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(text: &str) -> Result<Self, DomainError> {
        toml::from_str(text).map_err(|e| DomainError::config(format!("invalid TOML: {}", e)))
    }

    /// Overlays values found through `lookup`; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("AWS_ACCESS_KEY_ID") {
            self.access_key_id = Some(v);
        }
        if let Some(v) = get("AWS_SECRET_ACCESS_KEY") {
            self.secret_access_key = Some(v);
        }
        if let Some(v) = get("AWS_SESSION_TOKEN") {
            self.session_token = Some(v);
        }
        if let Some(v) = get("AWS_REGION").or_else(|| get("AWS_DEFAULT_REGION")) {
            self.region = v;
        }
        if let Some(v) = get("OPENAI_API_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = get("BA_GENIE_ENDPOINT") {
            self.endpoint = Some(v);
        }
        if let Some(v) = get("BA_GENIE_MODEL") {
            self.model = Some(v);
        }
        debug!("Configuration after environment overlay: {:?}", self);
    }

    /// Checked once at startup; the running pipeline never re-reads configuration.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self.backend {
            Backend::Foundation => {
                if self.credentials().map_or(true, |c| !c.is_complete()) {
                    return Err(DomainError::config(
                        "foundation backend needs AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY",
                    ));
                }
                if self.region.trim().is_empty() {
                    return Err(DomainError::config("foundation backend needs a region"));
                }
            }
            Backend::Completion => {
                if self.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
                    return Err(DomainError::config("completion backend needs OPENAI_API_KEY"));
                }
            }
            Backend::Mock => {}
        }

        if self.timeout_secs == 0 {
            return Err(DomainError::config("timeout_secs must be greater than zero"));
        }
        if self.min_input_chars > self.max_input_chars {
            return Err(DomainError::config(format!(
                "min_input_chars ({}) exceeds max_input_chars ({})",
                self.min_input_chars, self.max_input_chars
            )));
        }
        let overhead = PromptFormatter::template_overhead();
        if self.max_input_chars.saturating_add(overhead) > self.max_prompt_chars {
            return Err(DomainError::config(format!(
                "max_prompt_chars ({}) must leave room for max_input_chars ({}) plus {} chars of prompt template",
                self.max_prompt_chars, self.max_input_chars, overhead
            )));
        }
        Ok(())
    }

    pub fn credentials(&self) -> Option<AwsCredentials> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some(
                AwsCredentials::new(id.clone(), secret.clone())
                    .with_session_token(self.session_token.clone()),
            ),
            _ => None,
        }
    }

    pub fn resolved_endpoint(&self) -> String {
        match (&self.endpoint, self.backend) {
            (Some(e), _) => e.clone(),
            (None, Backend::Foundation) => default_endpoint(&self.region),
            (None, Backend::Completion) => DEFAULT_COMPLETION_BASE_URL.to_string(),
            (None, Backend::Mock) => String::new(),
        }
    }

    pub fn resolved_model(&self) -> String {
        match (&self.model, self.backend) {
            (Some(m), _) => m.clone(),
            (None, Backend::Completion) => DEFAULT_COMPLETION_MODEL.to_string(),
            (None, _) => DEFAULT_MODEL_ID.to_string(),
        }
    }
}
