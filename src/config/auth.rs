//! API key resolution
//!
//! The key comes from the `MARKETPLACE_API_KEY` environment variable when it is
//! set and non-empty, and from `--api-key` otherwise. The environment is passed
//! in explicitly so resolution can be tested without touching process state.

use std::collections::HashMap;
use std::fmt;

use crate::config::defaults::API_KEY_ENV;
use crate::error::{CliError, Result};

/// Read access to environment variables
pub trait Environment {
    /// Value of `key`, or `None` when unset
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Marketplace credential, never empty
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting empty values
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingCredential`] when `key` is empty
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(CliError::MissingCredential);
        }
        Ok(Self(key))
    }

    /// The raw key, as sent in the request header
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Key with everything but the last four characters hidden
    #[must_use]
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let visible = if chars.len() > 8 { 4 } else { 0 };
        let hidden = chars.len() - visible;
        let tail: String = chars[hidden..].iter().collect();
        format!("{}{tail}", "*".repeat(hidden))
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.masked()).finish()
    }
}

/// Resolve the API key from the environment, falling back to the flag value
///
/// A non-empty environment value wins even when the flag is also set.
///
/// # Errors
///
/// Returns [`CliError::MissingCredential`] when neither source has a value
pub fn resolve_api_key(env: &impl Environment, flag: Option<&str>) -> Result<ApiKey> {
    if let Some(key) = env.var(API_KEY_ENV).filter(|key| !key.is_empty()) {
        tracing::debug!("using API key from {API_KEY_ENV}");
        return ApiKey::new(key);
    }
    ApiKey::new(flag.unwrap_or_default())
}
