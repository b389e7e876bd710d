mod memory;

use crate::token::Token;
use std::error::Error;
use std::future::Future;

pub use self::memory::MemoryTokenStore;

/// Persistence for the token held by a [`SessionRefresher`](crate::SessionRefresher).
#[cfg_attr(not(target_arch = "wasm32"), trait_variant::make(Send))]
pub trait TokenStore {
    type Error: Error + Send + Sync + 'static;

    fn get(&self) -> impl Future<Output = Result<Option<Token>, Self::Error>>;
    fn set(&self, token: Token) -> impl Future<Output = Result<(), Self::Error>>;
    fn clear(&self) -> impl Future<Output = Result<(), Self::Error>>;
}
