//! Ordered, identity-keyed item store.

mod id;
mod item;

use thiserror::Error;

pub use id::ItemId;
pub use item::{CollectionItem, Highlight, HighlightPatch, Post, PostPatch, NEW_HIGHLIGHT_NAME};

use crate::ingest::ImageRef;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("no item with id {0}")]
    NotFound(ItemId),
    #[error("item id {0} already present")]
    DuplicateIdentity(ItemId),
}

pub type CollectionResult<T> = std::result::Result<T, CollectionError>;

#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    id_prefix: String,
    next_id: u64,
}

impl<T: CollectionItem> Collection<T> {
    pub fn new(id_prefix: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            id_prefix: id_prefix.into(),
            next_id: 1,
        }
    }

    /// Builds a collection from a seed sequence, rejecting repeated ids.
    pub fn from_items(
        id_prefix: impl Into<String>,
        items: impl IntoIterator<Item = T>,
    ) -> CollectionResult<Self> {
        let mut collection = Self::new(id_prefix);
        for item in items {
            collection.insert(item)?;
        }
        Ok(collection)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id().clone()).collect()
    }

    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: &ItemId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Returns an id not currently used by any item.
    pub fn allocate_id(&mut self) -> ItemId {
        loop {
            let candidate = ItemId::new(format!("{}-{}", self.id_prefix, self.next_id));
            self.next_id = self.next_id.saturating_add(1);
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }

    pub fn insert(&mut self, item: T) -> CollectionResult<()> {
        if self.contains(item.id()) {
            tracing::warn!(id = %item.id(), "rejected insert with duplicate id");
            return Err(CollectionError::DuplicateIdentity(item.id().clone()));
        }
        tracing::debug!(id = %item.id(), "item inserted");
        self.items.push(item);
        Ok(())
    }

    pub fn update(&mut self, id: &ItemId, patch: &T::Patch) -> CollectionResult<()> {
        let index = self
            .index_of(id)
            .ok_or_else(|| CollectionError::NotFound(id.clone()))?;
        self.items[index] = self.items[index].merge(patch);
        Ok(())
    }

    pub fn update_image(&mut self, id: &ItemId, image: ImageRef) -> CollectionResult<()> {
        self.update(id, &T::image_patch(image))
    }

    pub fn remove(&mut self, id: &ItemId) -> CollectionResult<T> {
        let index = self
            .index_of(id)
            .ok_or_else(|| CollectionError::NotFound(id.clone()))?;
        tracing::debug!(%id, index, "item removed");
        Ok(self.items.remove(index))
    }

    /// Moves `from` into the slot currently held by `to`, shifting the items in between.
    ///
    /// Returns `Ok(false)` when nothing moved: `from == to`, or `to` is gone (treated as
    /// no drop rather than an error). Only a missing `from` is reported.
    pub fn reorder(&mut self, from: &ItemId, to: &ItemId) -> CollectionResult<bool> {
        let from_index = self
            .index_of(from)
            .ok_or_else(|| CollectionError::NotFound(from.clone()))?;
        if from == to {
            return Ok(false);
        }
        let Some(to_index) = self.index_of(to) else {
            tracing::debug!(%from, %to, "reorder target missing; treating as no drop");
            return Ok(false);
        };

        let item = self.items.remove(from_index);
        self.items.insert(to_index, item);
        tracing::debug!(%from, %to, from_index, to_index, "items reordered");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn post(id: &str) -> Post {
        Post::new(id, ImageRef::default())
    }

    fn abc() -> Collection<Post> {
        Collection::from_items("post", ["A", "B", "C"].map(post)).expect("seed is unique")
    }

    fn id_strings(collection: &Collection<Post>) -> Vec<String> {
        collection
            .ids()
            .into_iter()
            .map(|id| id.as_str().to_string())
            .collect()
    }

    #[test]
    fn scenario_reorder_insert_remove_update() {
        let mut posts = abc();

        assert!(posts
            .reorder(&ItemId::from("A"), &ItemId::from("C"))
            .expect("A exists"));
        assert_eq!(id_strings(&posts), ["B", "C", "A"]);

        posts.insert(post("D")).expect("D is new");
        assert_eq!(id_strings(&posts), ["B", "C", "A", "D"]);

        posts.remove(&ItemId::from("C")).expect("C exists");
        assert_eq!(id_strings(&posts), ["B", "A", "D"]);

        posts
            .update_image(&ItemId::from("A"), ImageRef::placeholder("img2"))
            .expect("A exists");
        assert_eq!(id_strings(&posts), ["B", "A", "D"]);
        assert_eq!(
            posts.get(&ItemId::from("A")).map(|item| item.image.as_str()),
            Some("img2")
        );
    }

    #[test]
    fn reorder_onto_self_is_noop() {
        let mut posts = abc();
        let moved = posts
            .reorder(&ItemId::from("B"), &ItemId::from("B"))
            .expect("B exists");
        assert!(!moved);
        assert_eq!(id_strings(&posts), ["A", "B", "C"]);
    }

    #[test]
    fn reorder_is_rotation_not_swap() {
        let mut posts =
            Collection::from_items("post", ["A", "B", "C", "D", "E"].map(post)).expect("seed");

        posts
            .reorder(&ItemId::from("E"), &ItemId::from("B"))
            .expect("E exists");
        assert_eq!(id_strings(&posts), ["A", "E", "B", "C", "D"]);

        posts
            .reorder(&ItemId::from("A"), &ItemId::from("C"))
            .expect("A exists");
        assert_eq!(id_strings(&posts), ["E", "B", "C", "A", "D"]);
    }

    #[test]
    fn reorder_missing_target_is_silent_noop() {
        let mut posts = abc();
        let moved = posts
            .reorder(&ItemId::from("A"), &ItemId::from("gone"))
            .expect("missing target is not an error");
        assert!(!moved);
        assert_eq!(id_strings(&posts), ["A", "B", "C"]);
    }

    #[test]
    fn reorder_missing_source_is_not_found() {
        let mut posts = abc();
        let err = posts
            .reorder(&ItemId::from("gone"), &ItemId::from("A"))
            .expect_err("missing source should fail");
        assert_eq!(err, CollectionError::NotFound(ItemId::from("gone")));
        assert_eq!(id_strings(&posts), ["A", "B", "C"]);
    }

    #[test]
    fn duplicate_insert_is_rejected_without_change() {
        let mut posts = abc();
        let err = posts.insert(post("B")).expect_err("duplicate should fail");
        assert_eq!(err, CollectionError::DuplicateIdentity(ItemId::from("B")));
        assert_eq!(posts.len(), 3);

        let seeded = Collection::from_items("post", ["X", "X"].map(post));
        assert!(matches!(
            seeded,
            Err(CollectionError::DuplicateIdentity(_))
        ));
    }

    #[test]
    fn remove_then_update_is_not_found() {
        let mut posts = abc();
        let before = posts.len();
        let removed = posts.remove(&ItemId::from("B")).expect("B exists");
        assert_eq!(removed.id, ItemId::from("B"));
        assert_eq!(posts.len(), before - 1);

        let err = posts
            .update_image(&ItemId::from("B"), ImageRef::placeholder("x"))
            .expect_err("B was removed");
        assert_eq!(err, CollectionError::NotFound(ItemId::from("B")));
        assert_eq!(
            posts.remove(&ItemId::from("B")),
            Err(CollectionError::NotFound(ItemId::from("B")))
        );
    }

    #[test]
    fn allocated_ids_stay_unique_across_inserts_and_removes() {
        let mut posts =
            Collection::from_items("post", ["post-1", "post-3"].map(post)).expect("seed");

        for round in 0..20 {
            let id = posts.allocate_id();
            posts
                .insert(Post::new(id.clone(), ImageRef::default()))
                .expect("allocated id must be fresh");
            if round % 3 == 0 {
                posts.remove(&id).expect("just inserted");
            }
        }

        let ids = posts.ids();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn highlight_update_patches_name_only() {
        let mut highlights =
            Collection::from_items("highlight", [Highlight::new("1", "Info", ImageRef::default())])
                .expect("seed");
        highlights
            .update(
                &ItemId::from("1"),
                &HighlightPatch {
                    name: Some("Carta".to_string()),
                    image: None,
                },
            )
            .expect("1 exists");

        let highlight = highlights.get(&ItemId::from("1")).expect("still present");
        assert_eq!(highlight.name, "Carta");
        assert_eq!(highlight.image, ImageRef::default());
    }
}
