//! HTTP adapters for the services Yodash consumes.
//!
//! - [`InferenceClient`]: `POST /inference` (multipart upload)
//! - [`HistoryClient`]: `POST /query` (JSON)
//! - [`OidcIdentityProvider`]: hosted sign-in / sign-out redirects

mod http;

pub mod history_client;
pub mod inference_client;
pub mod oidc_provider;

pub use history_client::HistoryClient;
pub use inference_client::InferenceClient;
pub use oidc_provider::{OidcIdentityProvider, TokenStore};
