//! Configuration for the [`Client`](super::Client).
mod file;

pub use self::file::FileStore;
use crate::codec::CodecConfig;
use devid_auth::Token;
use devid_http::{Error, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Configuration data struct for the [`Client`](super::Client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// The base URL of the API.
    pub endpoint: String,
    /// The OAuth 2.0 token endpoint. Defaults to `{endpoint}/oauth2/token`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Scope to request when refreshing the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,
    /// Timeout for a whole call, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// The token to start with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Token>,
    #[serde(default)]
    pub codec: CodecConfig,
}

impl Config {
    /// Loads the configuration from the provided loader.
    pub async fn load(loader: &impl Loader) -> Result<Self> {
        loader
            .load()
            .await
            .map_err(|e| Error::InvalidArgument(format!("failed to load config: {e}")))
    }
    /// Saves the configuration using the provided saver.
    pub async fn save(&self, saver: &impl Saver) -> Result<()> {
        saver
            .save(self)
            .await
            .map_err(|e| Error::InvalidArgument(format!("failed to save config: {e}")))
    }
}

impl Default for Config {
    /// Creates a new default configuration.
    ///
    /// The default configuration uses the base URL `https://localhost`.
    fn default() -> Self {
        Self {
            endpoint: String::from("https://localhost"),
            token_endpoint: None,
            client_id: None,
            client_secret: None,
            scope: None,
            connect_timeout_secs: None,
            timeout_secs: None,
            token: None,
            codec: CodecConfig::default(),
        }
    }
}

/// The trait for loading configuration data.
pub trait Loader {
    /// Loads the configuration data.
    fn load(
        &self,
    ) -> impl Future<
        Output = core::result::Result<Config, Box<dyn std::error::Error + Send + Sync + 'static>>,
    > + Send;
}

/// The trait for saving configuration data.
pub trait Saver {
    /// Saves the configuration data.
    fn save(
        &self,
        config: &Config,
    ) -> impl Future<
        Output = core::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>,
    > + Send;
}
