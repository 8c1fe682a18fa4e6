use std::sync::Arc;

use super::config::{AuthConfig, AuthSettings};
use super::traits::SessionVerifier;

/// Shared state for the gate and the auth route handlers.
pub(super) struct AuthState<V> {
    pub(super) verifier: Arc<V>,
    pub(super) settings: AuthSettings,
}

impl<V: SessionVerifier> AuthState<V> {
    pub(super) fn new(config: AuthConfig, verifier: V) -> Self {
        Self {
            verifier: Arc::new(verifier),
            settings: config.settings,
        }
    }
}

// Manual Clone: avoid derive adding a `V: Clone` bound.
impl<V> Clone for AuthState<V> {
    fn clone(&self) -> Self {
        Self {
            verifier: self.verifier.clone(),
            settings: self.settings.clone(),
        }
    }
}
