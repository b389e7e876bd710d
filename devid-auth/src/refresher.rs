use crate::token::Token;
use devid_http::Result;
use std::future::Future;
use std::sync::Arc;

/// Supplies the current [`Token`] and obtains new ones.
#[cfg_attr(not(target_arch = "wasm32"), trait_variant::make(Send))]
pub trait TokenRefresher {
    /// The token currently held, possibly expired. Never performs I/O.
    fn current_token(&self) -> Token;
    /// Obtains a new token and installs it as the current one.
    ///
    /// Fails with [`Error::Authentication`](devid_http::Error::Authentication) when the
    /// exchange is rejected, or [`Error::Network`](devid_http::Error::Network) on transport failure.
    fn refresh(&self) -> impl Future<Output = Result<Token>>;
}

impl<T> TokenRefresher for Arc<T>
where
    T: TokenRefresher + Send + Sync,
{
    fn current_token(&self) -> Token {
        self.as_ref().current_token()
    }
    async fn refresh(&self) -> Result<Token> {
        self.as_ref().refresh().await
    }
}

/// Exchanges a held token for a new one.
#[cfg_attr(not(target_arch = "wasm32"), trait_variant::make(Send))]
pub trait TokenEndpoint {
    fn exchange(&self, token: &Token) -> impl Future<Output = Result<Token>>;
}
