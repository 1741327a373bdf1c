use crate::shared::image_descriptor::ImageDescriptor;

use super::view_state::Activation;

/// One clickable gallery entry, bound to the descriptor it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct Thumbnail {
    index: usize,
    image: ImageDescriptor,
}

impl Thumbnail {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn image(&self) -> &ImageDescriptor {
        &self.image
    }
}

/// Container of thumbnails, in display order.
#[derive(Clone, Debug, Default)]
pub struct Gallery {
    thumbnails: Vec<Thumbnail>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thumbnails(&self) -> &[Thumbnail] {
        &self.thumbnails
    }

    pub fn len(&self) -> usize {
        self.thumbnails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thumbnails.is_empty()
    }

    pub fn clear(&mut self) {
        self.thumbnails.clear();
    }

    /// Resolves a click on thumbnail `index` to its own descriptor.
    ///
    /// The activation never bubbles past the thumbnail, even when the index
    /// is out of range.
    pub fn activate(&self, index: usize, activation: &mut Activation) -> Option<&ImageDescriptor> {
        activation.stop_propagation();
        self.thumbnails.get(index).map(Thumbnail::image)
    }
}

/// Appends one thumbnail per descriptor, in input order.
///
/// `None` leaves the gallery untouched. Duplicates are kept.
pub fn render_gallery(images: Option<&[ImageDescriptor]>, gallery: &mut Gallery) {
    let Some(images) = images else {
        return;
    };
    for image in images {
        let index = gallery.thumbnails.len();
        gallery.thumbnails.push(Thumbnail {
            index,
            image: image.clone(),
        });
    }
    log::debug!("Gallery holds {} thumbnails", gallery.len());
}
