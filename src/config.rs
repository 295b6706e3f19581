use std::env;
use std::fmt;

use crate::error::ChatError;

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

const DEFAULT_MODEL: &str = "gpt-5";
const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub model: String,
    pub api_base_url: String,
    /// Optional system instruction forwarded with every prompt. Unset by
    /// default, in which case requests carry only the user message.
    pub system_prompt: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Self {
        Self {
            model: get_var("MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base_url: get_var("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            system_prompt: get_var("SYSTEM_PROMPT")
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
        }
    }
}

/// The secret authorizing calls to the completion API. Resolution fails as a
/// value when the variable is absent or empty; a resolved credential is
/// always non-empty and carried exactly as found in the environment.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn resolve() -> Result<Self, ChatError> {
        Self::resolve_with(|key| env::var(key).ok())
    }

    pub(crate) fn resolve_with(
        mut get_var: impl FnMut(&str) -> Option<String>,
    ) -> Result<Self, ChatError> {
        get_var(API_KEY_VAR)
            .filter(|value| !value.is_empty())
            .map(Self)
            .ok_or(ChatError::MissingCredential)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
