use std::future::Future;

use crate::error::Error;
use crate::verify::VerifyClient;

/// Checks a session token against the shared auth server.
///
/// [`VerifyClient`] is the production implementation; tests substitute
/// their own.
///
/// # Example
///
/// ```rust,ignore
/// struct AcceptAll;
///
/// impl SessionVerifier for AcceptAll {
///     async fn verify(&self, _token: &str) -> Result<(), Error> {
///         Ok(())
///     }
/// }
/// ```
pub trait SessionVerifier: Send + Sync + 'static {
    /// `Ok(())` when the auth server accepts the token.
    fn verify(&self, token: &str) -> impl Future<Output = Result<(), Error>> + Send;
}

impl SessionVerifier for VerifyClient {
    fn verify(&self, token: &str) -> impl Future<Output = Result<(), Error>> + Send {
        self.verify_token(token)
    }
}
