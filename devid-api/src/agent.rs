//! A ready-to-use client combining the executor, the token refresher and the codec.
mod builder;
pub mod config;

pub use self::builder::ClientBuilder;
use self::config::Config;
use crate::codec::Codec;
use crate::executor::RequestExecutor;
use crate::mapper::ParameterEntity;
use crate::resource::{Parameters, Resource, ResourceType};
use devid_auth::{
    MemoryTokenStore, OAuthTokenEndpoint, SessionRefresher, Token, TokenRefresher, TokenStore,
};
use devid_http::http::{HeaderMap, Method, StatusCode};
use devid_http::types::{Header, APPLICATION_JSON};
use devid_http::{ApiRequest, DecodeError, HttpClient, Result};
use std::sync::Arc;

type Refresher<T, S> = SessionRefresher<OAuthTokenEndpoint<Arc<T>>, S>;

/// A client for the device identity API.
///
/// Build one with [`ClientBuilder`].
pub struct Client<T, S = MemoryTokenStore> {
    executor: RequestExecutor<Arc<T>, Refresher<T, S>>,
    codec: Codec,
    config: Config,
}

impl<T, S> Client<T, S>
where
    T: HttpClient + Send + Sync + 'static,
    S: TokenStore + Send + Sync + 'static,
{
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
    pub fn codec(&self) -> &Codec {
        &self.codec
    }
    pub fn current_token(&self) -> Token {
        self.executor.refresher().current_token()
    }
    /// The configuration this client was built with, holding the current token.
    pub fn to_config(&self) -> Config {
        let token = self.current_token();
        Config {
            token: if token.access_token.is_empty() { None } else { Some(token) },
            ..self.config.clone()
        }
    }
    /// A request for `path` relative to the endpoint.
    pub fn request(&self, method: Method, path: &str) -> ApiRequest {
        ApiRequest::new(
            method,
            format!(
                "{}/{}",
                self.config.endpoint.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
        )
    }
    /// Sends `request`, decoding the successful response with `decode`.
    pub async fn send<O, F>(&self, request: &ApiRequest, decode: F) -> Result<O>
    where
        F: FnOnce(StatusCode, &HeaderMap, &[u8]) -> Result<O>,
    {
        self.executor.execute(request, decode).await
    }
    /// Sends `request` with `resource` as its body, if any, and decodes the response as a
    /// resource.
    pub async fn send_resource(
        &self,
        request: ApiRequest,
        resource: Option<&Resource>,
    ) -> Result<Resource> {
        let mut request = request.header(Header::Accept, APPLICATION_JSON)?;
        if let Some(resource) = resource {
            request = request.body(self.codec.encode(resource)?, APPLICATION_JSON)?;
        }
        self.executor.execute(&request, self.codec.decoder()).await
    }
    /// Sends `entity` as a `Parameters` resource and reads the entity from the
    /// `Parameters` resource returned.
    pub async fn send_entity<E>(&self, request: ApiRequest, entity: Option<&E>) -> Result<E>
    where
        E: ParameterEntity,
    {
        let parameters = entity.map(|e| Resource::Parameters(Parameters::from_entity(e)));
        match self.send_resource(request, parameters.as_ref()).await? {
            Resource::Parameters(parameters) => Ok(parameters.to_entity()?),
            resource => {
                let config = self.codec.config();
                Err(DecodeError::new(
                    format!("$.{}", config.type_field),
                    format!(
                        "expected {}, found {}",
                        config.tag(ResourceType::Parameters),
                        config.tag(resource.resource_type())
                    ),
                )
                .into())
            }
        }
    }
}
