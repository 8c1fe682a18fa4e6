//! Session gate backed by the shared auth server.
//!
//! Every non-exempt request must carry a session cookie that the auth
//! server's `/api/verify` endpoint accepts; otherwise the browser is sent to
//! `{AUTH_SERVER_URL}/login/{PROJECT_ID}?redirect={original URL}`. After login
//! the auth server calls back `/auth/callback`, which stores the token in the
//! project-scoped cookie `session_{PROJECT_ID}`.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use transport_search::middleware::{AuthConfig, with_auth};
//! use transport_search::VerifyClient;
//!
//! let config = AuthConfig::from_env()?;
//! let verifier = VerifyClient::new(config.auth_server_url())?;
//!
//! let app = with_auth(pages_and_api, config, verifier);
//! ```

mod config;
mod cookies;
mod error;
mod gate;
mod routes;
mod state;
mod traits;

pub use config::AuthConfig;
pub use cookies::{session_candidates, session_cookie_name};
pub use error::AuthError;
pub use routes::{auth_routes, with_auth};
pub use traits::SessionVerifier;
