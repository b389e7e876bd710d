//! Transport abstraction, request description and error types shared by the devid crates.
pub mod challenge;
pub mod decode;
pub mod error;
mod traits;
pub mod types;

pub use crate::error::{DecodeError, Error, Result};
pub use crate::traits::{HttpClient, TransportError};
pub use crate::types::{ApiRequest, Authorization, AuthorizationToken};
pub use http;
