//! Cookie-based JWT authentication.
//!
//! A single stateless session token is carried in the `token` cookie.
//! The extractor only authenticates; handlers that serve per-user data
//! check ownership themselves with [`AuthenticatedUser::require_owner`].

mod cookie;
mod errors;
mod extractors;
mod state;
mod types;

pub use cookie::{CookiePolicy, SameSite, TOKEN_COOKIE_NAME, get_cookie};
pub use errors::{ApiAuthError, AuthErrorKind};
pub use extractors::ApiAuth;
pub use state::HasAuthBackend;
pub use types::AuthenticatedUser;
