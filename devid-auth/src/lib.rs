//! Bearer token lifecycle: the [`Token`] value, the [`TokenRefresher`] capability and
//! an OAuth 2.0 refresh-token based implementation of it.
mod endpoint;
mod refresher;
mod session;
pub mod store;
mod token;

pub use self::endpoint::OAuthTokenEndpoint;
pub use self::refresher::{TokenEndpoint, TokenRefresher};
pub use self::session::SessionRefresher;
pub use self::store::{MemoryTokenStore, TokenStore};
pub use self::token::{Token, TokenErrorResponse, TokenResponse};
