use super::TokenStore;
use crate::token::Token;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default, Clone)]
pub struct MemoryTokenStore {
    token: Arc<RwLock<Option<Token>>>,
}

impl MemoryTokenStore {
    pub fn new(token: Token) -> Self {
        Self { token: Arc::new(RwLock::new(Some(token))) }
    }
}

impl TokenStore for MemoryTokenStore {
    type Error = Infallible;

    async fn get(&self) -> Result<Option<Token>, Self::Error> {
        Ok(self.token.read().await.clone())
    }
    async fn set(&self, token: Token) -> Result<(), Self::Error> {
        self.token.write().await.replace(token);
        Ok(())
    }
    async fn clear(&self) -> Result<(), Self::Error> {
        self.token.write().await.take();
        Ok(())
    }
}
