//! Session state derived from the identity provider.

use serde::{Deserialize, Serialize};

/// Raw view of the identity provider's client state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySnapshot {
    pub is_loading: bool,
    /// Message of the provider's error object, if any.
    pub error: Option<String>,
    pub is_authenticated: bool,
    /// `user.profile.email`; may be absent even when authenticated.
    pub email: Option<String>,
}

/// The four mutually exclusive states the rest of the system observes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionState {
    Loading,
    Errored(String),
    Unauthenticated,
    Authenticated { email: Option<String> },
}

impl From<&IdentitySnapshot> for SessionState {
    /// Precedence: loading, then error, then unauthenticated.
    fn from(snapshot: &IdentitySnapshot) -> Self {
        if snapshot.is_loading {
            SessionState::Loading
        } else if let Some(message) = &snapshot.error {
            SessionState::Errored(message.clone())
        } else if !snapshot.is_authenticated {
            SessionState::Unauthenticated
        } else {
            SessionState::Authenticated {
                email: snapshot.email.clone(),
            }
        }
    }
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }
}

/// A full-page navigation to the identity provider's hosted flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub url: String,
}
