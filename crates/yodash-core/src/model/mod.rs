//! Domain models exchanged with the detection backends.
//!
//! # Module Structure
//!
//! - `detection`: bounding boxes returned by the inference endpoint
//! - `history`: past inference runs returned by the history endpoint
//! - `model_version`: supported model variants
//! - `image_file`: an image selected for upload

mod detection;
mod history;
mod image_file;
mod model_version;

pub use detection::{BoundingBox, DetectionBox, DetectionStatus};
pub use history::{HistoryEntry, RunStatus};
pub use image_file::ImageFile;
pub use model_version::ModelVersion;
