use http::{Request, Response};
use std::future::Future;
use std::sync::Arc;

/// Errors returned by a transport, such as connection failures or timeouts.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An abstract HTTP client.
///
/// Connection pooling, TLS, redirects and timeouts are all left to the implementation.
#[cfg_attr(not(target_arch = "wasm32"), trait_variant::make(Send))]
pub trait HttpClient {
    /// Send an HTTP request and return the response.
    fn send_http(
        &self,
        request: Request<Vec<u8>>,
    ) -> impl Future<Output = core::result::Result<Response<Vec<u8>>, TransportError>>;
}

impl<T> HttpClient for Arc<T>
where
    T: HttpClient + Send + Sync,
{
    async fn send_http(
        &self,
        request: Request<Vec<u8>>,
    ) -> core::result::Result<Response<Vec<u8>>, TransportError> {
        self.as_ref().send_http(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingClient {
        count: AtomicUsize,
    }

    impl HttpClient for CountingClient {
        async fn send_http(
            &self,
            _request: Request<Vec<u8>>,
        ) -> core::result::Result<Response<Vec<u8>>, TransportError> {
            self.count.fetch_add(1, Ordering::SeqCst);
            Ok(Response::builder().status(StatusCode::NO_CONTENT).body(Vec::new())?)
        }
    }

    #[tokio::test]
    async fn shared_client() -> core::result::Result<(), TransportError> {
        let client = Arc::new(CountingClient::default());
        let shared = Arc::clone(&client);
        let response = shared.send_http(Request::builder().uri("/").body(Vec::new())?).await?;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        client.send_http(Request::builder().uri("/").body(Vec::new())?).await?;
        assert_eq!(client.count.load(Ordering::SeqCst), 2);
        Ok(())
    }
}
