#![cfg_attr(docsrs, feature(doc_cfg))]
//! [`HttpClient`](devid_http::HttpClient) implementations backed by real HTTP libraries.

#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
#[cfg(feature = "reqwest")]
pub mod reqwest;
