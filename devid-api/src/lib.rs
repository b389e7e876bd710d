#![cfg_attr(docsrs, feature(doc_cfg))]
//! Typed client for the device identity provisioning API.
//!
//! Resources travel as JSON objects tagged with their type. The device entities are
//! carried as flat lists of named [`Parameter`](parameter::Parameter)s, which
//! [`mapper`] converts to and from nested Rust types.
//!
//! ```no_run
//! use devid_api::agent::config::{Config, FileStore};
//! use devid_api::agent::ClientBuilder;
//! use devid_api::device::{DeviceAttributes, DeviceIdentity};
//! use devid_api::http::Method;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(&FileStore::new("config.json")).await?;
//! let client = ClientBuilder::with_config(config)?.build().await?;
//! let device = DeviceIdentity {
//!     device_attributes: Some(DeviceAttributes::new("SN-0001")),
//!     ..DeviceIdentity::new("IoTPRS")
//! };
//! let registered = client
//!     .send_entity(client.request(Method::POST, "Device/register"), Some(&device))
//!     .await?;
//! println!("{:?}", registered.status);
//! # Ok(())
//! # }
//! ```
pub mod agent;
pub mod codec;
pub mod device;
pub mod executor;
pub mod mapper;
pub mod parameter;
pub mod resource;
pub mod types;

pub use devid_auth as auth;
pub use devid_http::{http, Error, Result};
