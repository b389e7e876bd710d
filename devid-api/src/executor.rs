//! Sends requests with the caller's bearer token.
use devid_auth::{Token, TokenRefresher};
use devid_http::challenge::bearer_challenge;
use devid_http::http::{HeaderMap, Response, StatusCode};
use devid_http::{ApiRequest, AuthorizationToken, Error, HttpClient, Result};
use tracing::{debug, info, warn};

/// Executes [`ApiRequest`]s, attaching the current bearer token.
///
/// When an authorized request is answered with a `Bearer` challenge, the request is
/// sent once more with a renewed token. Nothing else is retried.
pub struct RequestExecutor<T, R> {
    http_client: T,
    refresher: R,
}

impl<T, R> RequestExecutor<T, R>
where
    T: HttpClient + Send + Sync,
    R: TokenRefresher + Send + Sync,
{
    pub fn new(http_client: T, refresher: R) -> Self {
        Self { http_client, refresher }
    }
    pub fn http_client(&self) -> &T {
        &self.http_client
    }
    pub fn refresher(&self) -> &R {
        &self.refresher
    }
    /// Sends `request` and passes the successful response to `decode`.
    ///
    /// Fails with [`Error::InvalidArgument`] without sending anything if the request
    /// needs authorization and the held access token is empty. A non-2xx response
    /// becomes [`Error::Http`]. Errors returned by `decode` are passed through.
    pub async fn execute<O, F>(&self, request: &ApiRequest, decode: F) -> Result<O>
    where
        F: FnOnce(StatusCode, &HeaderMap, &[u8]) -> Result<O>,
    {
        let access_token = if request.requires_authorization() {
            let token = self.refresher.current_token();
            if token.access_token.is_empty() {
                return Err(Error::InvalidArgument(String::from("access token is empty")));
            }
            Some(token.access_token)
        } else {
            None
        };
        let mut response = self.send(request, access_token.as_deref()).await?;
        if access_token.is_some() {
            if let Some(challenge) = bearer_challenge(response.headers()) {
                info!(
                    method = %request.method,
                    uri = %request.uri,
                    error = challenge.param("error").unwrap_or_default(),
                    "bearer challenge received, retrying with a renewed token"
                );
                let token = self.renew().await?;
                if token.access_token.is_empty() {
                    return Err(Error::InvalidArgument(String::from("access token is empty")));
                }
                response = self.send(request, Some(&token.access_token)).await?;
            }
        }
        let status = response.status();
        if !status.is_success() {
            warn!(method = %request.method, uri = %request.uri, %status, "request failed");
            return Err(Error::http(status, response.body()));
        }
        decode(status, response.headers(), response.body())
    }
    async fn renew(&self) -> Result<Token> {
        let token = self.refresher.current_token();
        if token.is_expired() {
            self.refresher.refresh().await
        } else {
            Ok(token)
        }
    }
    async fn send(
        &self,
        request: &ApiRequest,
        access_token: Option<&str>,
    ) -> Result<Response<Vec<u8>>> {
        let http_request =
            request.to_http(access_token.map(|t| AuthorizationToken::Bearer(t.to_owned())))?;
        debug!(method = %request.method, uri = %request.uri, "sending request");
        self.http_client.send_http(http_request).await.map_err(Error::Network)
    }
}
