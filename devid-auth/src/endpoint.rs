use crate::refresher::TokenEndpoint;
use crate::token::{Token, TokenErrorResponse, TokenResponse};
use chrono::Utc;
use devid_http::http::StatusCode;
use devid_http::types::{Header, APPLICATION_JSON};
use devid_http::{ApiRequest, DecodeError, Error, HttpClient, Result};
use serde::Serialize;
use tracing::debug;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

// https://datatracker.ietf.org/doc/html/rfc6749#section-6
#[derive(Debug, Serialize)]
struct RefreshRequestParameters<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
    client_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_secret: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<&'a str>,
}

/// An OAuth 2.0 token endpoint using the `refresh_token` grant.
#[derive(Clone, Debug)]
pub struct OAuthTokenEndpoint<T> {
    http_client: T,
    token_url: String,
    client_id: String,
    client_secret: Option<String>,
    scope: Option<String>,
}

impl<T> OAuthTokenEndpoint<T> {
    pub fn new(http_client: T, token_url: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            http_client,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: None,
            scope: None,
        }
    }
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }
    /// Requests a narrower scope than the one originally granted.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
    fn build_request(&self, refresh_token: &str) -> Result<ApiRequest> {
        let body = serde_html_form::to_string(RefreshRequestParameters {
            grant_type: "refresh_token",
            refresh_token,
            client_id: &self.client_id,
            client_secret: self.client_secret.as_deref(),
            scope: self.scope.as_deref(),
        })?;
        ApiRequest::post(&self.token_url)
            .unauthenticated()
            .header(Header::Accept, APPLICATION_JSON)?
            .body(body.into_bytes(), FORM_URLENCODED)
    }
}

impl<T> TokenEndpoint for OAuthTokenEndpoint<T>
where
    T: HttpClient + Send + Sync,
{
    async fn exchange(&self, token: &Token) -> Result<Token> {
        if token.refresh_token.is_empty() {
            return Err(Error::Authentication(String::from("no refresh token available")));
        }
        let request = self.build_request(&token.refresh_token)?.to_http(None)?;
        let issued_at = Utc::now();
        debug!(url = %self.token_url, "exchanging refresh token");
        let response = self.http_client.send_http(request).await.map_err(Error::Network)?;
        let status = response.status();
        let body = response.body();
        if status.is_success() {
            let output = serde_json::from_slice::<TokenResponse>(body)
                .map_err(|e| DecodeError::from_json("$", &e))?;
            Ok(Token::from_response(output, Some(token), issued_at))
        } else if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            Err(Error::Authentication(match serde_json::from_slice::<TokenErrorResponse>(body) {
                Ok(TokenErrorResponse { error, error_description: Some(description) }) => {
                    format!("{error}: {description}")
                }
                Ok(TokenErrorResponse { error, .. }) => error,
                Err(_) => format!("token endpoint returned {status}"),
            }))
        } else {
            Err(Error::http(status, body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devid_http::http::{header, Request, Response};
    use devid_http::TransportError;
    use std::sync::Mutex;

    struct MockClient {
        status: StatusCode,
        body: &'static str,
        requests: Mutex<Vec<Request<Vec<u8>>>>,
    }

    impl MockClient {
        fn new(status: StatusCode, body: &'static str) -> Self {
            Self { status, body, requests: Mutex::new(Vec::new()) }
        }
    }

    impl HttpClient for MockClient {
        async fn send_http(
            &self,
            request: Request<Vec<u8>>,
        ) -> core::result::Result<Response<Vec<u8>>, TransportError> {
            self.requests.lock().expect("lock").push(request);
            Ok(Response::builder().status(self.status).body(self.body.as_bytes().to_vec())?)
        }
    }

    fn token() -> Token {
        Token {
            scope: String::from("device:provision"),
            token_type: String::from("Bearer"),
            access_token: String::from("expired"),
            refresh_token: String::from("refresh"),
            issued_at: "2024-01-01T00:00:00Z".parse().expect("valid datetime"),
            expires_in: 60,
            signed_token: None,
            id_token: None,
        }
    }

    #[tokio::test]
    async fn exchange_ok() {
        let endpoint = OAuthTokenEndpoint::new(
            MockClient::new(
                StatusCode::OK,
                r#"{"access_token":"access","token_type":"Bearer","expires_in":3600,"refresh_token":"rotated"}"#,
            ),
            "https://auth.example.com/oauth2/token",
            "device-client",
        )
        .client_secret("s3cret");
        let refreshed = endpoint.exchange(&token()).await.expect("exchange should be succeeded");
        assert_eq!(refreshed.access_token, "access");
        assert_eq!(refreshed.refresh_token, "rotated");
        assert_eq!(refreshed.scope, "device:provision");
        assert!(refreshed.is_valid());

        let requests = endpoint.http_client.requests.lock().expect("lock");
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method(), "POST");
        assert_eq!(request.uri(), "https://auth.example.com/oauth2/token");
        assert_eq!(request.headers()[header::CONTENT_TYPE], FORM_URLENCODED);
        assert!(request.headers().get(header::AUTHORIZATION).is_none());
        assert_eq!(
            request.body(),
            b"grant_type=refresh_token&refresh_token=refresh&client_id=device-client&client_secret=s3cret"
        );
    }

    #[tokio::test]
    async fn exchange_rejected() {
        let endpoint = OAuthTokenEndpoint::new(
            MockClient::new(
                StatusCode::BAD_REQUEST,
                r#"{"error":"invalid_grant","error_description":"refresh token revoked"}"#,
            ),
            "https://auth.example.com/oauth2/token",
            "device-client",
        );
        match endpoint.exchange(&token()).await {
            Err(Error::Authentication(message)) => {
                assert_eq!(message, "invalid_grant: refresh token revoked")
            }
            result => panic!("must be Error::Authentication, got {result:?}"),
        }
    }

    #[tokio::test]
    async fn exchange_server_error() {
        let endpoint = OAuthTokenEndpoint::new(
            MockClient::new(StatusCode::SERVICE_UNAVAILABLE, "maintenance"),
            "https://auth.example.com/oauth2/token",
            "device-client",
        );
        let err = endpoint.exchange(&token()).await.expect_err("must be error");
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn exchange_without_refresh_token() {
        let endpoint = OAuthTokenEndpoint::new(
            MockClient::new(StatusCode::OK, "{}"),
            "https://auth.example.com/oauth2/token",
            "device-client",
        );
        let token = Token { refresh_token: String::new(), ..token() };
        let err = endpoint.exchange(&token).await.expect_err("must be error");
        assert!(matches!(err, Error::Authentication(_)), "got {err:?}");
        assert!(endpoint.http_client.requests.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn exchange_malformed_response() {
        let endpoint = OAuthTokenEndpoint::new(
            MockClient::new(StatusCode::OK, r#"{"token_type":"Bearer"}"#),
            "https://auth.example.com/oauth2/token",
            "device-client",
        );
        let err = endpoint.exchange(&token()).await.expect_err("must be error");
        assert!(matches!(err, Error::Decode(_)), "got {err:?}");
    }
}
