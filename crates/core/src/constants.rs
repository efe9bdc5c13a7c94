//! Constants used throughout the Hospital AI core crate.
//!
//! Environment variable names, inference defaults and the fixed medicine field set live here so
//! the run binary, the CLI and the tests agree on them.

/// Environment variable holding the inference API key.
pub const ENV_API_KEY: &str = "GROQ_API_KEY";

/// Environment variable overriding the OpenAI-compatible API base URL.
pub const ENV_API_BASE: &str = "GROQ_API_BASE";

/// Environment variable overriding the model identifier.
pub const ENV_MODEL: &str = "GROQ_MODEL";

/// Environment variable for the outbound inference timeout, in whole seconds.
pub const ENV_INFERENCE_TIMEOUT_SECS: &str = "HAI_INFERENCE_TIMEOUT_SECS";

/// Environment variable selecting the JSON extraction strategy (`outer` or `balanced`).
pub const ENV_EXTRACTION_STRATEGY: &str = "HAI_EXTRACTION_STRATEGY";

/// Environment variable enabling the legacy fallback medicine name for unreadable uploads.
pub const ENV_MEDICINE_FALLBACK: &str = "HAI_MEDICINE_FALLBACK";

/// Default OpenAI-compatible base URL for Groq.
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Default chat-completion model.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Default outbound inference timeout in seconds.
pub const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 30;

/// Upper bound accepted for the inference timeout.
pub const MAX_INFERENCE_TIMEOUT_SECS: u64 = 600;

/// Fields every successfully parsed medicine record carries, in display order.
pub const MEDICINE_FIELDS: [&str; 12] = [
    "name",
    "generic",
    "strength",
    "form",
    "indications",
    "contraindications",
    "side_effects",
    "warnings",
    "interactions",
    "pregnancy",
    "schedule",
    "note",
];
