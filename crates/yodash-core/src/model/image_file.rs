//! Image selected by the user for upload.

use std::path::Path;
use std::sync::Arc;

use crate::error::{DashError, Result};

/// An image held in memory between selection and upload.
///
/// The bytes are shared, so cloning an `ImageFile` into an in-flight
/// request does not copy the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl ImageFile {
    /// Creates an image from raw bytes. The MIME type is guessed from the file name.
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let mime_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            name,
            mime_type,
            bytes: bytes.into(),
        }
    }

    /// Reads an image from disk. Files whose name does not map to an
    /// `image/*` type are rejected, as the upload picker only offers images.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DashError::invalid_input(format!("Not a file path: {}", path.display())))?
            .to_string();
        let file = Self::new(name, bytes);
        if !file.mime_type.starts_with("image/") {
            return Err(DashError::Image(format!(
                "{} is not an image ({})",
                file.name, file.mime_type
            )));
        }
        Ok(file)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
