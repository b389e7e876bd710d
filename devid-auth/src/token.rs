use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A bearer credential and its validity window.
///
/// Tokens are never updated in place: a refresh produces a new `Token`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub scope: String,
    pub token_type: String,
    pub access_token: String,
    pub refresh_token: String,
    pub issued_at: DateTime<Utc>,
    /// Validity duration in seconds, counted from `issued_at`.
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl Token {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match TimeDelta::try_seconds(self.expires_in) {
            Some(validity) => now - self.issued_at > validity,
            // a validity that does not fit in a TimeDelta never runs out
            None => false,
        }
    }
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && !self.token_type.is_empty() && !self.is_expired_at(now)
    }
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        TimeDelta::try_seconds(self.expires_in).and_then(|v| self.issued_at.checked_add_signed(v))
    }
    /// Builds a token from a token endpoint response.
    ///
    /// The refresh token and scope of `previous` are kept when the response omits them
    /// ([RFC 6749 section 6](https://datatracker.ietf.org/doc/html/rfc6749#section-6)).
    pub fn from_response(
        response: TokenResponse,
        previous: Option<&Token>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            scope: response
                .scope
                .or_else(|| previous.map(|t| t.scope.clone()))
                .unwrap_or_default(),
            token_type: response.token_type,
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .or_else(|| previous.map(|t| t.refresh_token.clone()))
                .unwrap_or_default(),
            issued_at,
            expires_in: response.expires_in.unwrap_or_default(),
            signed_token: response.signed_token,
            id_token: response.id_token,
        }
    }
}

// https://datatracker.ietf.org/doc/html/rfc6749#section-5.1
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub signed_token: Option<String>,
    // OpenID Connect
    pub id_token: Option<String>,
}

// https://datatracker.ietf.org/doc/html/rfc6749#section-5.2
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}
