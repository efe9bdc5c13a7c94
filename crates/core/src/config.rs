//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables. Each `*_from_env_value`
//! helper takes the raw optional value so it can be tested without touching the environment.

use crate::constants::{
    DEFAULT_API_BASE, DEFAULT_INFERENCE_TIMEOUT_SECS, DEFAULT_MODEL, ENV_API_BASE, ENV_API_KEY,
    ENV_EXTRACTION_STRATEGY, ENV_INFERENCE_TIMEOUT_SECS, ENV_MEDICINE_FALLBACK, ENV_MODEL,
    MAX_INFERENCE_TIMEOUT_SECS,
};
use crate::normalizer::ExtractionStrategy;
use crate::{CoreError, CoreResult};
use hai_types::MedicineName;
use std::time::Duration;

/// Settings for the outbound chat-completion client.
#[derive(Clone)]
pub struct InferenceConfig {
    api_key: Option<String>,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl InferenceConfig {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> CoreResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CoreError::InvalidConfig(format!(
                "inference base URL must start with http:// or https:// (got {base_url:?})"
            )));
        }

        let model = model.trim().to_string();
        if model.is_empty() {
            return Err(CoreError::InvalidConfig("model cannot be empty".into()));
        }

        if timeout.is_zero() {
            return Err(CoreError::InvalidConfig(
                "inference timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url,
            model,
            timeout,
        })
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    inference: InferenceConfig,
    extraction_strategy: ExtractionStrategy,
    medicine_fallback: Option<MedicineName>,
}

impl CoreConfig {
    pub fn new(
        inference: InferenceConfig,
        extraction_strategy: ExtractionStrategy,
        medicine_fallback: Option<MedicineName>,
    ) -> Self {
        Self {
            inference,
            extraction_strategy,
            medicine_fallback,
        }
    }

    /// Resolve configuration from the process environment.
    ///
    /// Call once at startup, after `.env` has been loaded.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let inference = InferenceConfig::new(
            lookup(ENV_API_KEY),
            non_blank(lookup(ENV_API_BASE)).unwrap_or_else(|| DEFAULT_API_BASE.into()),
            non_blank(lookup(ENV_MODEL)).unwrap_or_else(|| DEFAULT_MODEL.into()),
            timeout_from_env_value(lookup(ENV_INFERENCE_TIMEOUT_SECS))?,
        )?;

        Ok(Self::new(
            inference,
            extraction_strategy_from_env_value(lookup(ENV_EXTRACTION_STRATEGY))?,
            medicine_fallback_from_env_value(lookup(ENV_MEDICINE_FALLBACK))?,
        ))
    }

    pub fn inference(&self) -> &InferenceConfig {
        &self.inference
    }

    pub fn extraction_strategy(&self) -> ExtractionStrategy {
        self.extraction_strategy
    }

    pub fn medicine_fallback(&self) -> Option<&MedicineName> {
        self.medicine_fallback.as_ref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the inference timeout from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn timeout_from_env_value(value: Option<String>) -> CoreResult<Duration> {
    let Some(value) = non_blank(value) else {
        return Ok(Duration::from_secs(DEFAULT_INFERENCE_TIMEOUT_SECS));
    };

    let secs: u64 = value.parse().map_err(|_| {
        CoreError::InvalidConfig(format!(
            "{ENV_INFERENCE_TIMEOUT_SECS} must be a whole number of seconds (got {value:?})"
        ))
    })?;

    if secs == 0 || secs > MAX_INFERENCE_TIMEOUT_SECS {
        return Err(CoreError::InvalidConfig(format!(
            "{ENV_INFERENCE_TIMEOUT_SECS} must be between 1 and {MAX_INFERENCE_TIMEOUT_SECS}"
        )));
    }

    Ok(Duration::from_secs(secs))
}

/// Parse the extraction strategy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`ExtractionStrategy::OuterBraces`].
pub fn extraction_strategy_from_env_value(value: Option<String>) -> CoreResult<ExtractionStrategy> {
    non_blank(value)
        .map(|v| v.parse::<ExtractionStrategy>())
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Parse the optional fallback medicine name.
pub fn medicine_fallback_from_env_value(value: Option<String>) -> CoreResult<Option<MedicineName>> {
    non_blank(value)
        .map(|v| {
            MedicineName::new(&v).map_err(|e| {
                CoreError::InvalidConfig(format!("{ENV_MEDICINE_FALLBACK} is not usable: {e}"))
            })
        })
        .transpose()
}
