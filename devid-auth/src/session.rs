use crate::refresher::{TokenEndpoint, TokenRefresher};
use crate::store::{MemoryTokenStore, TokenStore};
use crate::token::Token;
use devid_http::{Error, Result};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// A [`TokenRefresher`] that exchanges tokens through a [`TokenEndpoint`] and keeps
/// every new token in a [`TokenStore`].
///
/// Refreshes are serialized: a caller that had to wait for another refresh to finish
/// reuses the token that refresh installed instead of exchanging again. The exchange
/// runs on its own task and completes even if the caller that started it is dropped.
pub struct SessionRefresher<E, S = MemoryTokenStore> {
    session: Arc<Session<E, S>>,
    refresh_lock: Arc<Mutex<()>>,
}

struct Session<E, S> {
    endpoint: E,
    store: S,
    token: RwLock<Token>,
}

impl<E, S> Session<E, S>
where
    E: TokenEndpoint + Send + Sync,
    S: TokenStore + Send + Sync,
{
    fn current_token(&self) -> Token {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
    async fn exchange(&self, current: Token) -> Result<Token> {
        info!("refreshing access token");
        let token = match self.endpoint.exchange(&current).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "token refresh failed");
                return Err(e);
            }
        };
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token.clone();
        if let Err(e) = self.store.set(token.clone()).await {
            warn!(error = %e, "failed to persist refreshed token");
        }
        Ok(token)
    }
}

impl<E, S> SessionRefresher<E, S>
where
    S: TokenStore,
{
    pub fn new(endpoint: E, store: S, token: Token) -> Self {
        Self {
            session: Arc::new(Session { endpoint, store, token: RwLock::new(token) }),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }
    /// Resumes the session persisted in `store`.
    pub async fn from_store(endpoint: E, store: S) -> Result<Self> {
        match store.get().await {
            Ok(Some(token)) => Ok(Self::new(endpoint, store, token)),
            Ok(None) => Err(Error::InvalidArgument(String::from("no token in store"))),
            Err(e) => Err(Error::InvalidArgument(format!("failed to load token: {e}"))),
        }
    }
    pub fn store(&self) -> &S {
        &self.session.store
    }
}

impl<E, S> TokenRefresher for SessionRefresher<E, S>
where
    E: TokenEndpoint + Send + Sync + 'static,
    S: TokenStore + Send + Sync + 'static,
{
    fn current_token(&self) -> Token {
        self.session.current_token()
    }
    async fn refresh(&self) -> Result<Token> {
        let stale = self.current_token();
        let guard = Arc::clone(&self.refresh_lock).lock_owned().await;
        let current = self.current_token();
        if current.access_token != stale.access_token && current.is_valid() {
            debug!("token was refreshed while waiting, reusing it");
            return Ok(current);
        }
        let session = Arc::clone(&self.session);
        // the lock is held by the task until the new token is installed
        let task = tokio::spawn(async move {
            let _guard = guard;
            session.exchange(current).await
        });
        match task.await {
            Ok(result) => result,
            Err(e) => Err(Error::Authentication(format!("token refresh did not complete: {e}"))),
        }
    }
}
