use super::config::Config;
use super::Client;
use crate::codec::Codec;
use crate::executor::RequestExecutor;
use chrono::Utc;
use devid_auth::{MemoryTokenStore, OAuthTokenEndpoint, SessionRefresher, Token, TokenStore};
use devid_http::{Error, HttpClient, Result};
#[cfg(feature = "default-client")]
use devid_http_client::reqwest::ReqwestClient;
use std::sync::Arc;
use tracing::warn;

/// A builder for creating a [`Client`].
pub struct ClientBuilder<T, S = MemoryTokenStore>
where
    T: HttpClient + Send + Sync + 'static,
    S: TokenStore + Send + Sync + 'static,
{
    config: Config,
    store: S,
    client: T,
}

impl<T> ClientBuilder<T>
where
    T: HttpClient + Send + Sync + 'static,
{
    /// Create a new builder with the given HTTP client.
    pub fn new(client: T) -> Self {
        Self { config: Config::default(), store: MemoryTokenStore::default(), client }
    }
}

impl<T, S> ClientBuilder<T, S>
where
    T: HttpClient + Send + Sync + 'static,
    S: TokenStore + Send + Sync + 'static,
{
    /// Set the configuration for the client.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }
    /// Set the token store for the client.
    ///
    /// Returns a new builder with the token store set.
    pub fn store<S0>(self, store: S0) -> ClientBuilder<T, S0>
    where
        S0: TokenStore + Send + Sync + 'static,
    {
        ClientBuilder { config: self.config, store, client: self.client }
    }
    /// Set the HTTP client for the client.
    ///
    /// Returns a new builder with the HTTP client set.
    pub fn client<T0>(self, client: T0) -> ClientBuilder<T0, S>
    where
        T0: HttpClient + Send + Sync + 'static,
    {
        ClientBuilder { config: self.config, store: self.store, client }
    }
    /// Builds the client.
    ///
    /// The initial token is taken from the configuration and written to the store, or
    /// else read from the store. Without either, only unauthenticated requests can be
    /// sent.
    pub async fn build(self) -> Result<Client<T, S>> {
        let Self { config, store, client } = self;
        let codec = Codec::new(config.codec.clone())?;
        let http_client = Arc::new(client);
        let token_url = config.token_endpoint.clone().unwrap_or_else(|| {
            format!("{}/oauth2/token", config.endpoint.trim_end_matches('/'))
        });
        let mut endpoint = OAuthTokenEndpoint::new(
            Arc::clone(&http_client),
            token_url,
            config.client_id.clone().unwrap_or_default(),
        );
        if let Some(client_secret) = &config.client_secret {
            endpoint = endpoint.client_secret(client_secret.as_str());
        }
        if let Some(scope) = &config.scope {
            endpoint = endpoint.scope(scope.as_str());
        }
        let token = match &config.token {
            Some(token) => {
                if let Err(e) = store.set(token.clone()).await {
                    warn!(error = %e, "failed to persist configured token");
                }
                token.clone()
            }
            None => match store.get().await {
                Ok(Some(token)) => token,
                Ok(None) => no_token(),
                Err(e) => {
                    return Err(Error::InvalidArgument(format!("failed to load token: {e}")))
                }
            },
        };
        let refresher = SessionRefresher::new(endpoint, store, token);
        Ok(Client {
            executor: RequestExecutor::new(http_client, refresher),
            codec,
            config,
        })
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "default-client")))]
#[cfg(feature = "default-client")]
impl ClientBuilder<ReqwestClient, MemoryTokenStore> {
    /// Create a new builder with a [`ReqwestClient`] honoring the timeouts of `config`.
    pub fn with_config(config: Config) -> Result<Self> {
        let mut builder = ReqwestClient::builder();
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(std::time::Duration::from_secs(secs));
        }
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::InvalidArgument(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::new(client).config(config))
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "default-client")))]
#[cfg(feature = "default-client")]
impl Default for ClientBuilder<ReqwestClient, MemoryTokenStore> {
    /// Create a new builder with the default client and token store.
    ///
    /// Default client is [`ReqwestClient`] and default token store is [`MemoryTokenStore`].
    fn default() -> Self {
        Self::new(ReqwestClient::new())
    }
}

fn no_token() -> Token {
    Token {
        scope: String::new(),
        token_type: String::new(),
        access_token: String::new(),
        refresh_token: String::new(),
        issued_at: Utc::now(),
        expires_in: 0,
        signed_token: None,
        id_token: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devid_auth::TokenRefresher;
    use devid_http::http::{Request, Response};
    use devid_http::TransportError;

    struct NoopClient;

    impl HttpClient for NoopClient {
        async fn send_http(
            &self,
            _request: Request<Vec<u8>>,
        ) -> core::result::Result<Response<Vec<u8>>, TransportError> {
            unimplemented!()
        }
    }

    fn token() -> Token {
        Token {
            scope: String::from("device:provision"),
            token_type: String::from("Bearer"),
            access_token: String::from("access"),
            refresh_token: String::from("refresh"),
            issued_at: "2024-03-01T00:00:00Z".parse().expect("valid datetime"),
            expires_in: 3600,
            signed_token: None,
            id_token: None,
        }
    }

    #[tokio::test]
    async fn build_with_config_token() -> Result<()> {
        let store = MemoryTokenStore::default();
        let client = ClientBuilder::new(NoopClient)
            .config(Config { token: Some(token()), ..Default::default() })
            .store(store.clone())
            .build()
            .await?;
        assert_eq!(client.current_token(), token());
        assert_eq!(store.get().await.expect("infallible"), Some(token()));
        Ok(())
    }

    #[tokio::test]
    async fn build_with_stored_token() -> Result<()> {
        let client = ClientBuilder::new(NoopClient)
            .store(MemoryTokenStore::new(token()))
            .build()
            .await?;
        assert_eq!(client.executor.refresher().current_token(), token());
        Ok(())
    }

    #[tokio::test]
    async fn build_without_token() -> Result<()> {
        let client = ClientBuilder::new(NoopClient).build().await?;
        assert!(client.current_token().access_token.is_empty());
        assert_eq!(client.to_config().token, None);
        Ok(())
    }

    #[tokio::test]
    async fn build_with_codec_config() -> Result<()> {
        let config = Config {
            codec: crate::codec::CodecConfig { pretty: true, ..Default::default() },
            ..Default::default()
        };
        let client = ClientBuilder::new(NoopClient).config(config.clone()).build().await?;
        assert_eq!(client.codec().config(), &config.codec);
        assert_eq!(client.to_config(), config);
        Ok(())
    }

    #[tokio::test]
    async fn build_with_invalid_codec_config() {
        let config = Config {
            codec: crate::codec::CodecConfig {
                type_field: String::from("meta"),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = ClientBuilder::new(NoopClient).config(config).build().await.err();
        assert!(matches!(err, Some(Error::InvalidArgument(_))), "got {err:?}");
    }

    #[cfg(feature = "default-client")]
    #[test]
    fn with_config() {
        let config = Config {
            connect_timeout_secs: Some(5),
            timeout_secs: Some(30),
            ..Default::default()
        };
        let builder = ClientBuilder::with_config(config.clone()).expect("builder");
        assert_eq!(builder.config, config);
    }
}
