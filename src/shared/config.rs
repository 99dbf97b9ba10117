//! Application configuration. API credentials and session naming.
//!
//! Read once at startup from the environment (plus optional .env file):
//! TELEGRAM_API_ID, TELEGRAM_API_HASH, TELEGRAM_SESSION_NAME.

use serde::Deserialize;
use std::path::PathBuf;

/// Session name used when TELEGRAM_SESSION_NAME is unset. The session file
/// becomes `<name>.session` in the working directory.
pub const DEFAULT_SESSION_NAME: &str = "tg_session";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Application id from https://my.telegram.org. Read from TELEGRAM_API_ID.
    pub api_id: Option<i32>,

    /// Application secret. Read from TELEGRAM_API_HASH.
    pub api_hash: Option<String>,

    /// Session identifier. Read from TELEGRAM_SESSION_NAME.
    #[serde(default)]
    pub session_name: Option<String>,
}

impl AppConfig {
    /// Reads configuration from the environment, the whole surface. Callers
    /// that want `.env` support load it first (main does, via dotenv).
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("TELEGRAM").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the session identifier. Defaults to [`DEFAULT_SESSION_NAME`].
    pub fn session_name_or_default(&self) -> String {
        self.session_name
            .clone()
            .unwrap_or_else(|| DEFAULT_SESSION_NAME.to_string())
    }

    /// Path of the session file owned by the Telegram client library.
    /// Opaque to this application: never created or inspected here.
    pub fn session_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.session", self.session_name_or_default()))
    }
}
