//! OidcIdentityProvider - hosted-UI identity provider client.
//!
//! Performs OpenID discovery, reads the stored ID token and builds the
//! redirect URLs for the hosted sign-in and sign-out flows. The
//! authorization-code exchange itself happens outside this process; the
//! resulting ID token is picked up from the session file or
//! `YODASH_ID_TOKEN`.

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use yodash_core::config::{IdentitySettings, session_file};
use yodash_core::session::{IdentityProvider, IdentitySnapshot, Redirect};
use yodash_core::{DashError, Result};

use crate::http::{check_status, transport_error};

pub const ENV_ID_TOKEN: &str = "YODASH_ID_TOKEN";

const DISCOVERY_PATH: &str = "/.well-known/openid-configuration";

#[derive(Debug, Clone, Deserialize)]
struct DiscoveryDocument {
    authorization_endpoint: String,
    #[serde(default)]
    end_session_endpoint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    exp: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    id_token: String,
}

/// Where the provider keeps its session between runs.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    path: Option<PathBuf>,
    env_token: Option<String>,
}

impl TokenStore {
    pub fn new(path: Option<PathBuf>, env_token: Option<String>) -> Self {
        Self { path, env_token }
    }

    /// `~/.config/yodash/session.json` plus `YODASH_ID_TOKEN`.
    pub fn from_env() -> Self {
        Self::new(
            session_file().ok(),
            std::env::var(ENV_ID_TOKEN).ok().filter(|t| !t.trim().is_empty()),
        )
    }

    /// Stored session file first, then the environment.
    pub async fn load(&self) -> Result<Option<String>> {
        if let Some(path) = &self.path
            && tokio::fs::try_exists(path).await?
        {
            let content = tokio::fs::read_to_string(path).await?;
            let stored: StoredSession = serde_json::from_str(&content)?;
            return Ok(Some(stored.id_token));
        }
        Ok(self.env_token.clone())
    }

    pub async fn clear(&self) -> Result<()> {
        if let Some(path) = &self.path
            && tokio::fs::try_exists(path).await?
        {
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ProviderState {
    is_loading: bool,
    error: Option<String>,
    discovery: Option<DiscoveryDocument>,
    id_token: Option<String>,
    email: Option<String>,
}

/// Identity provider client for an OpenID Connect hosted UI.
pub struct OidcIdentityProvider {
    client: Client,
    settings: IdentitySettings,
    store: TokenStore,
    state: RwLock<ProviderState>,
}

impl OidcIdentityProvider {
    /// Creates the provider in the loading state. Call [`initialize`](Self::initialize) next.
    pub fn new(settings: IdentitySettings, store: TokenStore) -> Self {
        Self {
            client: Client::new(),
            settings,
            store,
            state: RwLock::new(ProviderState {
                is_loading: true,
                ..Default::default()
            }),
        }
    }

    /// Runs discovery and restores the stored session.
    pub async fn initialize(&self) {
        let discovery = self.discover().await;
        let token = match self.store.load().await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!("[OidcProvider] Ignoring unreadable session: {}", err);
                None
            }
        };

        let (id_token, email) = match token {
            Some(token) => match read_claims(&token) {
                Ok(claims) if !is_expired(&claims) => (Some(token), claims.email),
                Ok(_) => {
                    tracing::info!("[OidcProvider] Stored ID token has expired");
                    (None, None)
                }
                Err(err) => {
                    tracing::warn!("[OidcProvider] Ignoring malformed ID token: {}", err);
                    (None, None)
                }
            },
            None => (None, None),
        };

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.is_loading = false;
        match discovery {
            Ok(doc) => {
                state.discovery = Some(doc);
                state.error = None;
            }
            Err(err) => {
                tracing::error!("[OidcProvider] Discovery failed: {}", err);
                state.error = Some(err.to_string());
            }
        }
        state.id_token = id_token;
        state.email = email;
    }

    async fn discover(&self) -> Result<DiscoveryDocument> {
        let url = format!(
            "{}{}",
            self.settings.authority.trim_end_matches('/'),
            DISCOVERY_PATH
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| transport_error("OpenID discovery", err))?;
        check_status(&response)?;
        response
            .json::<DiscoveryDocument>()
            .await
            .map_err(|err| DashError::auth(format!("Invalid discovery document: {err}")))
    }

    fn discovery(&self) -> Result<DiscoveryDocument> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .discovery
            .clone()
            .ok_or_else(|| DashError::auth("Identity provider metadata is not loaded"))
    }
}

#[async_trait]
impl IdentityProvider for OidcIdentityProvider {
    fn snapshot(&self) -> IdentitySnapshot {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        IdentitySnapshot {
            is_loading: state.is_loading,
            error: state.error.clone(),
            is_authenticated: state.id_token.is_some(),
            email: state.email.clone(),
        }
    }

    async fn signin_redirect(&self) -> Result<Redirect> {
        let discovery = self.discovery()?;
        let request_state = uuid::Uuid::new_v4().simple().to_string();
        let url = Url::parse_with_params(
            &discovery.authorization_endpoint,
            &[
                ("response_type", self.settings.response_type.as_str()),
                ("client_id", self.settings.client_id.as_str()),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
                ("scope", self.settings.scope.as_str()),
                ("state", request_state.as_str()),
            ],
        )
        .map_err(|err| DashError::auth(format!("Invalid authorization endpoint: {err}")))?;

        Ok(Redirect { url: url.into() })
    }

    async fn signout_redirect(&self) -> Result<Redirect> {
        let discovery = self.discovery()?;
        let end_session = discovery.end_session_endpoint.ok_or_else(|| {
            DashError::auth("Identity provider does not advertise an end_session_endpoint")
        })?;

        let id_token = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.email = None;
            state.id_token.take()
        };
        self.store.clear().await?;

        let mut params = vec![
            ("client_id", self.settings.client_id.clone()),
            (
                "post_logout_redirect_uri",
                self.settings.post_logout_redirect_uri.clone(),
            ),
        ];
        if let Some(token) = id_token {
            params.push(("id_token_hint", token));
        }
        let url = Url::parse_with_params(&end_session, &params)
            .map_err(|err| DashError::auth(format!("Invalid end_session_endpoint: {err}")))?;

        Ok(Redirect { url: url.into() })
    }
}

fn read_claims(id_token: &str) -> Result<IdTokenClaims> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| DashError::auth("ID token is not a JWT"))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| DashError::auth(format!("ID token payload is not base64url: {err}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|err| DashError::auth(format!("ID token claims are not JSON: {err}")))
}

fn is_expired(claims: &IdTokenClaims) -> bool {
    let Some(exp) = claims.exp else {
        return false;
    };
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    exp <= now
}
