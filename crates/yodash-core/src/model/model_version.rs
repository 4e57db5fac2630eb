use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Model variant selector sent with every inference request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum ModelVersion {
    #[default]
    #[serde(rename = "yolov12-small")]
    #[strum(serialize = "yolov12-small")]
    Small,
    #[serde(rename = "yolov12-medium")]
    #[strum(serialize = "yolov12-medium")]
    Medium,
    #[serde(rename = "yolov12-large")]
    #[strum(serialize = "yolov12-large")]
    Large,
}

impl ModelVersion {
    /// Wire identifier, e.g. `yolov12-small`.
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn all() -> Vec<ModelVersion> {
        ModelVersion::iter().collect()
    }
}
