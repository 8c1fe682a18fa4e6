use url::Url;

use crate::error::Error;

/// Client for the shared auth server's token verification endpoint.
///
/// Uses reqwest's default client, so there is no caller-side timeout.
#[derive(Clone)]
pub struct VerifyClient {
    verify_url: Url,
    http: reqwest::Client,
}

impl VerifyClient {
    /// Verification endpoint is `{auth_server_url}/api/verify`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the endpoint URL cannot be built.
    pub fn new(auth_server_url: &Url) -> Result<Self, Error> {
        let base = auth_server_url.as_str().trim_end_matches('/');
        let verify_url = format!("{base}/api/verify")
            .parse()
            .map_err(|e| Error::Config(format!("verify URL: {e}")))?;

        Ok(Self {
            verify_url,
            http: reqwest::Client::new(),
        })
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    #[must_use]
    pub fn verify_url(&self) -> &Url {
        &self.verify_url
    }

    /// Verify a session token as a bearer credential.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or
    /// [`Error::Verify`] if the auth server rejects the token.
    pub async fn verify_token(&self, token: &str) -> Result<(), Error> {
        let response = self
            .http
            .get(self.verify_url.clone())
            .bearer_auth(token)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        Err(Error::Verify { status, detail })
    }
}
