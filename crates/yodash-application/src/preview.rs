//! Scoped preview handles for the selected image.
//!
//! A [`PreviewUrl`] plays the role of a revocable object URL: it is issued
//! when a file is selected and released when dropped, so replacing the
//! selection or discarding the controller always frees the entry.

use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use yodash_core::model::ImageFile;
use yodash_core::overlay::Size;

const SCHEME: &str = "preview://";

/// What a preview URL resolves to.
#[derive(Debug, Clone)]
pub struct PreviewEntry {
    pub file: ImageFile,
    /// `None` when the bytes could not be decoded as an image.
    pub natural_size: Option<Size>,
}

/// Issues and resolves preview URLs.
#[derive(Clone, Default)]
pub struct PreviewRegistry {
    entries: Arc<Mutex<HashMap<String, PreviewEntry>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `file` and returns the owning handle.
    pub fn create(&self, file: ImageFile) -> PreviewUrl {
        let natural_size = decode_natural_size(&file);
        let url = format!("{SCHEME}{}", uuid::Uuid::new_v4());
        self.lock().insert(
            url.clone(),
            PreviewEntry {
                file,
                natural_size,
            },
        );
        tracing::debug!("[Preview] Created {}", url);
        PreviewUrl {
            url,
            registry: self.clone(),
        }
    }

    pub fn resolve(&self, url: &str) -> Option<PreviewEntry> {
        self.lock().get(url).cloned()
    }

    /// Number of URLs not yet released.
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn release(&self, url: &str) {
        if self.lock().remove(url).is_some() {
            tracing::debug!("[Preview] Released {}", url);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PreviewEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owning handle to a registered preview. Released on drop.
pub struct PreviewUrl {
    url: String,
    registry: PreviewRegistry,
}

impl PreviewUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn resolve(&self) -> Option<PreviewEntry> {
        self.registry.resolve(&self.url)
    }
}

impl fmt::Debug for PreviewUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreviewUrl").field(&self.url).finish()
    }
}

impl Drop for PreviewUrl {
    fn drop(&mut self) {
        self.registry.release(&self.url);
    }
}

fn decode_natural_size(file: &ImageFile) -> Option<Size> {
    let reader = image::ImageReader::new(Cursor::new(file.bytes()))
        .with_guessed_format()
        .ok()?;
    match reader.into_dimensions() {
        Ok((width, height)) => Some(Size::new(width as f64, height as f64)),
        Err(err) => {
            tracing::warn!("[Preview] Cannot read dimensions of {}: {}", file.name(), err);
            None
        }
    }
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    image::RgbImage::new(width, height)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}
