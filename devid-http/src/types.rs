use crate::error::{Error, Result};
use http::header::{
    HeaderName, HeaderValue, InvalidHeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE,
};
use http::{HeaderMap, Method, Request};
use serde::Serialize;

pub const APPLICATION_JSON: &str = "application/json";

/// A credential to put in the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationToken {
    Bearer(String),
}

impl TryFrom<AuthorizationToken> for HeaderValue {
    type Error = InvalidHeaderValue;

    fn try_from(token: AuthorizationToken) -> core::result::Result<Self, Self::Error> {
        let mut value = HeaderValue::from_str(&match token {
            AuthorizationToken::Bearer(t) => format!("Bearer {t}"),
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

/// HTTP headers which are handled by this library.
pub enum Header {
    Accept,
    ContentType,
    Authorization,
}

impl From<Header> for HeaderName {
    fn from(value: Header) -> Self {
        match value {
            Header::Accept => ACCEPT,
            Header::ContentType => CONTENT_TYPE,
            Header::Authorization => AUTHORIZATION,
        }
    }
}

/// Whether a request is sent with the caller's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Authorization {
    #[default]
    Required,
    None,
}

/// A fully described request, not yet carrying an `Authorization` header.
///
/// It is kept independent of [`http::Request`] so that it can be rebuilt with a
/// different token when the first attempt is challenged.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub authorization: Authorization,
}

impl ApiRequest {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: HeaderMap::new(),
            body: None,
            authorization: Authorization::Required,
        }
    }
    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri)
    }
    pub fn post(uri: impl Into<String>) -> Self {
        Self::new(Method::POST, uri)
    }
    pub fn put(uri: impl Into<String>) -> Self {
        Self::new(Method::PUT, uri)
    }
    pub fn delete(uri: impl Into<String>) -> Self {
        Self::new(Method::DELETE, uri)
    }
    /// Marks the request as one that must be sent without a bearer token.
    pub fn unauthenticated(mut self) -> Self {
        self.authorization = Authorization::None;
        self
    }
    pub fn requires_authorization(&self) -> bool {
        self.authorization == Authorization::Required
    }
    pub fn header(mut self, name: impl Into<HeaderName>, value: &str) -> Result<Self> {
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::InvalidArgument(format!("invalid header value: {e}")))?;
        self.headers.insert(name.into(), value);
        Ok(self)
    }
    /// Appends `parameters` to the URI as a query string.
    pub fn query<P>(mut self, parameters: &P) -> Result<Self>
    where
        P: Serialize + ?Sized,
    {
        let qs = serde_html_form::to_string(parameters)?;
        if !qs.is_empty() {
            self.uri.push(if self.uri.contains('?') { '&' } else { '?' });
            self.uri += &qs;
        }
        Ok(self)
    }
    /// Sets a JSON body.
    pub fn json<I>(self, input: &I) -> Result<Self>
    where
        I: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(input)
            .map_err(|e| Error::InvalidArgument(format!("failed to encode body: {e}")))?;
        self.body(body, APPLICATION_JSON)
    }
    /// Sets a raw body with its content type.
    pub fn body(mut self, body: Vec<u8>, content_type: &str) -> Result<Self> {
        self = self.header(Header::ContentType, content_type)?;
        self.body = Some(body);
        Ok(self)
    }
    /// Builds the request to send, replacing any `Authorization` header with `token`.
    pub fn to_http(&self, token: Option<AuthorizationToken>) -> Result<Request<Vec<u8>>> {
        let mut builder = Request::builder().method(&self.method).uri(&self.uri);
        if let Some(headers) = builder.headers_mut() {
            headers.extend(self.headers.clone());
            headers.remove(AUTHORIZATION);
            if let Some(token) = token {
                let value = HeaderValue::try_from(token)
                    .map_err(|e| Error::InvalidArgument(format!("invalid token: {e}")))?;
                headers.insert(AUTHORIZATION, value);
            }
        }
        Ok(builder.body(self.body.clone().unwrap_or_default())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Parameters {
        identifier: String,
        count: Option<u32>,
    }

    #[test]
    fn query_is_appended() -> Result<()> {
        let request = ApiRequest::get("https://example.com/Identity")
            .query(&Parameters { identifier: "a b".into(), count: Some(2) })?;
        assert_eq!(request.uri, "https://example.com/Identity?identifier=a+b&count=2");
        let request = ApiRequest::get("https://example.com/Identity?x=1")
            .query(&Parameters { identifier: "c".into(), count: None })?;
        assert_eq!(request.uri, "https://example.com/Identity?x=1&identifier=c");
        Ok(())
    }

    #[test]
    fn to_http_replaces_authorization() -> Result<()> {
        let request = ApiRequest::post("https://example.com/$provision")
            .header(Header::Authorization, "Bearer stale")?
            .json(&serde_json::json!({"resourceType": "Parameters"}))?;
        let http_request = request.to_http(Some(AuthorizationToken::Bearer("fresh".into())))?;
        assert_eq!(http_request.method(), Method::POST);
        let values = http_request.headers().get_all(AUTHORIZATION).iter().collect::<Vec<_>>();
        assert_eq!(values, vec!["Bearer fresh"]);
        assert_eq!(http_request.headers()[CONTENT_TYPE], APPLICATION_JSON);
        assert_eq!(http_request.body(), br#"{"resourceType":"Parameters"}"#);

        let http_request = request.to_http(None)?;
        assert!(http_request.headers().get(AUTHORIZATION).is_none());
        Ok(())
    }

    #[test]
    fn header_names() {
        assert_eq!(HeaderName::from(Header::Accept), ACCEPT);
        assert_eq!(HeaderName::from(Header::ContentType), CONTENT_TYPE);
        assert_eq!(HeaderName::from(Header::Authorization), AUTHORIZATION);
    }

    #[test]
    fn unauthenticated() {
        let request = ApiRequest::get("https://example.com/metadata");
        assert!(request.requires_authorization());
        assert!(!request.unauthenticated().requires_authorization());
    }

    #[test]
    fn invalid_uri() {
        let err = ApiRequest::get("not a uri").to_http(None).expect_err("must be error");
        assert!(matches!(err, Error::InvalidArgument(_)), "got {err:?}");
    }
}
