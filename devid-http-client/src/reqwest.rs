#![doc = "HttpClient implementation for [reqwest]"]
use devid_http::http::{Request, Response};
use devid_http::{HttpClient, TransportError};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// A [`reqwest::Client`] based [`HttpClient`].
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone, Debug, Default)]
pub struct ReqwestClient {
    client: Arc<Client>,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn builder() -> ReqwestClientBuilder {
        ReqwestClientBuilder::default()
    }
}

#[derive(Default)]
pub struct ReqwestClientBuilder {
    client: Option<Client>,
    connect_timeout: Option<Duration>,
    timeout: Option<Duration>,
}

impl ReqwestClientBuilder {
    /// Use a preconfigured client. Timeouts set on this builder are then ignored.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }
    /// Timeout for establishing a connection.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
    /// Timeout for a whole call, from sending the request to reading the full body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
    pub fn build(self) -> Result<ReqwestClient, TransportError> {
        let client = match self.client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()?
            }
        };
        Ok(ReqwestClient { client: Arc::new(client) })
    }
}

impl HttpClient for ReqwestClient {
    async fn send_http(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, TransportError> {
        let response = self.client.execute(request.try_into()?).await?;
        let mut builder = Response::builder().status(response.status());
        for (k, v) in response.headers() {
            builder = builder.header(k, v);
        }
        builder.body(response.bytes().await?.to_vec()).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        let client = ReqwestClient::new();
        assert_eq!(Arc::strong_count(&client.client), 1);
        let cloned = client.clone();
        assert!(Arc::ptr_eq(&client.client, &cloned.client));
    }

    #[test]
    fn builder_with_timeouts() -> Result<(), TransportError> {
        ReqwestClient::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_millis(500))
            .build()?;
        Ok(())
    }

    #[test]
    fn builder_with_client() -> Result<(), TransportError> {
        ReqwestClient::builder()
            .client(Client::builder().user_agent("USER_AGENT").build()?)
            .build()?;
        Ok(())
    }
}
