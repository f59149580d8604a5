//! Small bounded image sequences.
//!
//! [`ImageCollection`] holds an ordered set of shared image handles, e.g.
//! the faces of a texture array or the pages of a multi-image document.
//! Capacity is fixed; misuse (overfilling, bad index) is a programming
//! error and asserts rather than returning a result.

use crate::Image;
use std::sync::Arc;

/// Maximum number of images a collection can hold.
pub const MAX_IMAGES: usize = 32;

/// A fixed-capacity ordered sequence of shared image handles.
///
/// # Example
///
/// ```rust
/// use raster_core::{Image, ImageCollection};
/// use std::sync::Arc;
///
/// let mut set = ImageCollection::new();
/// set.add(Arc::new(Image::rgba8(4, 4).unwrap()));
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.get(0).width(), 4);
/// ```
#[derive(Debug, Default)]
pub struct ImageCollection {
    images: Vec<Arc<Image>>,
}

impl ImageCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            images: Vec::with_capacity(MAX_IMAGES),
        }
    }

    /// Appends an image, retaining a shared handle.
    ///
    /// # Panics
    ///
    /// Panics if the collection already holds [`MAX_IMAGES`] images.
    pub fn add(&mut self, image: Arc<Image>) {
        assert!(
            self.images.len() < MAX_IMAGES,
            "image collection capacity ({MAX_IMAGES}) exceeded"
        );
        self.images.push(image);
    }

    /// Number of images currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns `true` if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Returns the image at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> &Arc<Image> {
        assert!(
            index < self.images.len(),
            "image index {index} out of bounds ({})",
            self.images.len()
        );
        &self.images[index]
    }

    /// Iterates over the held images in order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Image>> {
        self.images.iter()
    }
}
