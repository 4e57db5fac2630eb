//! Session gate over an external identity provider.
//!
//! # Module Structure
//!
//! - `model`: provider snapshot, derived session state and redirects
//! - `gate`: the `IdentityProvider` capability and the `SessionGate` wrapper
//!
//! # Usage
//!
//! ```ignore
//! use yodash_core::session::{SessionGate, SessionState};
//! ```

mod gate;
mod model;

pub use gate::{IdentityProvider, SessionGate};
pub use model::{IdentitySnapshot, Redirect, SessionState};
