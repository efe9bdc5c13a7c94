//! HTTP server settings, resolved once at startup.

use anyhow::Context;
use std::path::{Path, PathBuf};

pub const ENV_REST_ADDR: &str = "HAI_REST_ADDR";
pub const ENV_STATIC_DIR: &str = "HAI_STATIC_DIR";
pub const ENV_MAX_UPLOAD_BYTES: &str = "HAI_MAX_UPLOAD_BYTES";

pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    addr: String,
    static_dir: PathBuf,
    max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn new(addr: String, static_dir: PathBuf, max_upload_bytes: usize) -> Self {
        Self {
            addr,
            static_dir,
            max_upload_bytes,
        }
    }

    /// Resolve settings from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings from an arbitrary key lookup, falling back to defaults.
    ///
    /// # Errors
    /// Returns an error if `HAI_MAX_UPLOAD_BYTES` is not a positive integer.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let addr = value(ENV_REST_ADDR).unwrap_or_else(|| DEFAULT_REST_ADDR.into());
        let static_dir = value(ENV_STATIC_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let max_upload_bytes = match value(ENV_MAX_UPLOAD_BYTES) {
            Some(raw) => {
                let bytes: usize = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{ENV_MAX_UPLOAD_BYTES} must be an integer"))?;
                anyhow::ensure!(bytes > 0, "{ENV_MAX_UPLOAD_BYTES} must be greater than zero");
                bytes
            }
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self::new(addr, static_dir, max_upload_bytes))
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}
