//! Ports implemented by the interaction layer and the front end.

use crate::error::Result;
use crate::model::{DetectionBox, HistoryEntry, ImageFile, ModelVersion};

/// Placeholder user identifier sent when no identity is available.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Submits an image to the remote inference endpoint.
#[async_trait::async_trait]
pub trait InferencePort: Send + Sync {
    /// Runs detection on `image` with the selected model.
    ///
    /// Errors are `Transport`, `Backend` or `Decode`.
    async fn submit(
        &self,
        image: &ImageFile,
        model: ModelVersion,
        user: Option<&str>,
    ) -> Result<Vec<DetectionBox>>;
}

/// Queries the remote history endpoint for a user's recent runs.
#[async_trait::async_trait]
pub trait HistoryPort: Send + Sync {
    async fn query(&self, user: Option<&str>) -> Result<Vec<HistoryEntry>>;
}

/// A user-visible alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Warning(m) | Notice::Error(m) => m,
        }
    }
}

/// Blocking feedback channel to the user (alerts).
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
