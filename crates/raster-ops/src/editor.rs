//! Editing session façade.
//!
//! [`Editor`] owns the image currently being edited and hands out copies
//! for display while operations mutate the working image. This is the
//! surface UI or bridging layers talk to; the operations themselves are
//! the free functions of this crate applied to [`image_mut`](Editor::image_mut).

use raster_core::{Image, Result};

/// Owns the image being edited.
///
/// # Example
///
/// ```rust
/// use raster_core::Image;
/// use raster_ops::Editor;
///
/// let mut editor = Editor::new();
/// editor.edit(Image::rgba8(8, 8).unwrap());
/// let snapshot = editor.image_copy().unwrap();
/// assert_eq!(snapshot.width(), 8);
/// ```
#[derive(Debug, Default)]
pub struct Editor {
    image: Option<Image>,
}

impl Editor {
    /// Creates an editor with no image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the image being edited.
    pub fn edit(&mut self, image: Image) {
        self.image = Some(image);
    }

    /// Releases and returns the image being edited.
    pub fn take(&mut self) -> Option<Image> {
        self.image.take()
    }

    /// Borrows the image being edited.
    #[inline]
    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    /// Mutably borrows the image being edited; operations apply here.
    #[inline]
    pub fn image_mut(&mut self) -> Option<&mut Image> {
        self.image.as_mut()
    }

    /// Returns a deep copy of the image being edited.
    pub fn image_copy(&self) -> Option<Image> {
        self.image.clone()
    }

    /// Parses and assigns embedded ICC data to the image being edited.
    ///
    /// Does nothing when no image is loaded.
    ///
    /// # Errors
    ///
    /// Propagates profile parse failures.
    pub fn set_icc_profile_data(&mut self, icc: &[u8]) -> Result<()> {
        if let Some(image) = self.image.as_mut() {
            image.set_icc_profile_data(icc)?;
        }
        Ok(())
    }
}
