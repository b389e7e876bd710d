//! Ready-made response transforms for executor callers.
//!
//! A transform receives the status, headers and body of a successful response.
use crate::error::{DecodeError, Result};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

/// Deserializes the body as JSON.
pub fn json<O>(_status: StatusCode, _headers: &HeaderMap, body: &[u8]) -> Result<O>
where
    O: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|e| DecodeError::from_json("$", &e).into())
}

/// Ignores the body.
pub fn empty(_status: StatusCode, _headers: &HeaderMap, _body: &[u8]) -> Result<()> {
    Ok(())
}

/// Returns the body as is.
pub fn bytes(_status: StatusCode, _headers: &HeaderMap, body: &[u8]) -> Result<Vec<u8>> {
    Ok(body.to_vec())
}
