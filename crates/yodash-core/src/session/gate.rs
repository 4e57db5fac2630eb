//! Identity provider capability and the session gate wrapper.

use std::sync::Arc;

use super::model::{IdentitySnapshot, Redirect, SessionState};
use crate::error::Result;

/// Capability exposed by an identity provider client.
///
/// Implementations own the token lifecycle and session storage. The rest
/// of the system only reads snapshots and triggers redirects.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current client state.
    fn snapshot(&self) -> IdentitySnapshot;

    /// Starts the hosted sign-in flow and returns where to navigate.
    async fn signin_redirect(&self) -> Result<Redirect>;

    /// Starts the hosted sign-out flow and returns where to navigate.
    async fn signout_redirect(&self) -> Result<Redirect>;
}

/// Read-only session view handed explicitly to the root shell.
///
/// No local validation: whatever the provider reports is surfaced as is.
#[derive(Clone)]
pub struct SessionGate {
    provider: Arc<dyn IdentityProvider>,
}

impl SessionGate {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub fn state(&self) -> SessionState {
        SessionState::from(&self.provider.snapshot())
    }

    /// Email of the signed-in user, used as the backend user identifier.
    pub fn user_identity(&self) -> Option<String> {
        match self.state() {
            SessionState::Authenticated { email } => email,
            _ => None,
        }
    }

    pub async fn sign_in(&self) -> Result<Redirect> {
        tracing::info!("[SessionGate] Redirecting to hosted sign-in");
        self.provider.signin_redirect().await
    }

    pub async fn sign_out(&self) -> Result<Redirect> {
        tracing::info!("[SessionGate] Redirecting to hosted sign-out");
        self.provider.signout_redirect().await
    }
}
