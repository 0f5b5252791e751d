use serde::Serialize;

use super::ItemId;
use crate::ingest::ImageRef;
use crate::patch::{overwrite, Patchable};

pub const NEW_HIGHLIGHT_NAME: &str = "Nuevo";

/// An element of a reorderable media collection.
pub trait CollectionItem: Patchable + Clone + std::fmt::Debug {
    fn id(&self) -> &ItemId;

    fn image(&self) -> &ImageRef;

    fn image_patch(image: ImageRef) -> Self::Patch;

    /// Builds the item committed by an "add" action.
    fn fresh(id: ItemId, image: ImageRef) -> Self;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: ItemId,
    pub image: ImageRef,
}

#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub image: Option<ImageRef>,
}

impl Post {
    pub fn new(id: impl Into<ItemId>, image: ImageRef) -> Self {
        Self {
            id: id.into(),
            image,
        }
    }
}

impl Patchable for Post {
    type Patch = PostPatch;

    fn merge(&self, patch: &PostPatch) -> Self {
        Self {
            id: self.id.clone(),
            image: overwrite(&self.image, &patch.image),
        }
    }
}

impl CollectionItem for Post {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn image(&self) -> &ImageRef {
        &self.image
    }

    fn image_patch(image: ImageRef) -> PostPatch {
        PostPatch { image: Some(image) }
    }

    fn fresh(id: ItemId, image: ImageRef) -> Self {
        Self { id, image }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub id: ItemId,
    pub name: String,
    pub image: ImageRef,
}

#[derive(Debug, Clone, Default)]
pub struct HighlightPatch {
    pub name: Option<String>,
    pub image: Option<ImageRef>,
}

impl Highlight {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, image: ImageRef) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image,
        }
    }

    /// Fallback glyph shown when the image cannot be displayed.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }
}

impl Patchable for Highlight {
    type Patch = HighlightPatch;

    fn merge(&self, patch: &HighlightPatch) -> Self {
        Self {
            id: self.id.clone(),
            name: overwrite(&self.name, &patch.name),
            image: overwrite(&self.image, &patch.image),
        }
    }
}

impl CollectionItem for Highlight {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn image(&self) -> &ImageRef {
        &self.image
    }

    fn image_patch(image: ImageRef) -> HighlightPatch {
        HighlightPatch {
            name: None,
            image: Some(image),
        }
    }

    fn fresh(id: ItemId, image: ImageRef) -> Self {
        Self::new(id, NEW_HIGHLIGHT_NAME, image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_image_patch_keeps_name_and_id() {
        let highlight = Highlight::new("1", "Info", ImageRef::default());
        let patched = highlight.merge(&Highlight::image_patch(ImageRef::placeholder("img")));

        assert_eq!(patched.id, ItemId::from("1"));
        assert_eq!(patched.name, "Info");
        assert_eq!(patched.image, ImageRef::placeholder("img"));
    }

    #[test]
    fn fresh_highlight_uses_default_name() {
        let highlight = Highlight::fresh(ItemId::from("h"), ImageRef::default());
        assert_eq!(highlight.name, NEW_HIGHLIGHT_NAME);
        assert_eq!(highlight.initial(), Some('N'));
    }
}
