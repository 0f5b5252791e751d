//! Gesture-driven reordering.
//!
//! Sensors turn pointer or keyboard input into [`DragEvent`]s. The engine tracks the
//! gesture, resolves the tile under the dragged centroid with closest-center collision,
//! and commits a single `Collection::reorder` when the gesture ends. Nothing in the
//! collection changes before that.

mod layout;
mod sensor;

pub use layout::{ArrangedGrid, GridLayout, LayoutModel, DEFAULT_GRID_COLUMNS};
pub use sensor::{
    resolve_drag_key, DragKey, KeyboardAction, KeyboardSensor, PointerSensor,
    DEFAULT_KEYBOARD_STEP,
};

use crate::collection::{Collection, CollectionError, CollectionItem, ItemId};
use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    Start { id: ItemId, pointer: Point },
    Over(Point),
    End(Point),
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderCommit {
    pub from: ItemId,
    pub to: ItemId,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    id: ItemId,
    pointer_start: Point,
    rect_start: Rect,
    candidate: Option<ItemId>,
}

impl ActiveDrag {
    fn centroid_at(&self, pointer: Point) -> Point {
        let (dx, dy) = pointer.delta_from(self.pointer_start);
        self.rect_start.translated(dx, dy).center()
    }
}

/// Picks the slot whose center is nearest to `centroid`.
///
/// Every id in `order` competes, the dragged tile's own resting slot included, so a
/// drop near where the tile started resolves to itself. Equal distances keep the
/// earliest slot in sequence order.
pub fn closest_center<L: LayoutModel>(
    centroid: Point,
    order: &[ItemId],
    layout: &L,
) -> Option<ItemId> {
    let mut best: Option<(&ItemId, f32)> = None;
    for id in order {
        let Some(rect) = layout.rect_of(id) else {
            continue;
        };
        let distance = rect.center().distance_to(centroid);
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((id, distance));
        }
    }
    best.map(|(id, _)| id.clone())
}

#[derive(Debug, Default)]
pub struct DragEngine {
    active: Option<ActiveDrag>,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn dragged(&self) -> Option<&ItemId> {
        self.active.as_ref().map(|active| &active.id)
    }

    /// Current drop target, if the pointer has moved since pick-up.
    pub fn candidate(&self) -> Option<&ItemId> {
        self.active
            .as_ref()
            .and_then(|active| active.candidate.as_ref())
    }

    /// Order the grid would show if the gesture ended now. Computed on a copy.
    pub fn preview_order<T: CollectionItem>(&self, collection: &Collection<T>) -> Vec<ItemId> {
        let mut ids = collection.ids();
        let Some(active) = &self.active else {
            return ids;
        };
        let Some(candidate) = &active.candidate else {
            return ids;
        };
        let from = ids.iter().position(|id| id == &active.id);
        let to = ids.iter().position(|id| id == candidate);
        if let (Some(from), Some(to)) = (from, to) {
            let id = ids.remove(from);
            ids.insert(to, id);
        }
        ids
    }

    pub fn handle<T, L>(
        &mut self,
        event: DragEvent,
        collection: &mut Collection<T>,
        layout: &L,
    ) -> Option<ReorderCommit>
    where
        T: CollectionItem,
        L: LayoutModel,
    {
        match event {
            DragEvent::Start { id, pointer } => {
                self.start(id, pointer, collection, layout);
                None
            }
            DragEvent::Over(pointer) => {
                self.over(pointer, collection, layout);
                None
            }
            DragEvent::End(pointer) => self.end(pointer, collection, layout),
            DragEvent::Cancel => {
                if let Some(active) = self.active.take() {
                    tracing::debug!(id = %active.id, "drag cancelled");
                } else {
                    tracing::warn!("drag cancel without active gesture ignored");
                }
                None
            }
        }
    }

    fn start<T: CollectionItem, L: LayoutModel>(
        &mut self,
        id: ItemId,
        pointer: Point,
        collection: &Collection<T>,
        layout: &L,
    ) {
        if let Some(active) = &self.active {
            tracing::warn!(active = %active.id, requested = %id, "drag start during active gesture ignored");
            return;
        }
        if !collection.contains(&id) {
            tracing::warn!(%id, "drag start on unknown item ignored");
            return;
        }
        let Some(rect_start) = layout.rect_of(&id) else {
            tracing::warn!(%id, "drag start on item without layout ignored");
            return;
        };
        tracing::debug!(%id, "drag started");
        self.active = Some(ActiveDrag {
            id,
            pointer_start: pointer,
            rect_start,
            candidate: None,
        });
    }

    fn over<T: CollectionItem, L: LayoutModel>(
        &mut self,
        pointer: Point,
        collection: &Collection<T>,
        layout: &L,
    ) {
        let Some(active) = self.active.as_mut() else {
            tracing::warn!("drag over without active gesture ignored");
            return;
        };
        let centroid = active.centroid_at(pointer);
        active.candidate = closest_center(centroid, &collection.ids(), layout);
    }

    fn end<T: CollectionItem, L: LayoutModel>(
        &mut self,
        pointer: Point,
        collection: &mut Collection<T>,
        layout: &L,
    ) -> Option<ReorderCommit> {
        let Some(active) = self.active.as_ref() else {
            tracing::warn!("drag end without active gesture ignored");
            return None;
        };
        let centroid = active.centroid_at(pointer);
        let candidate = closest_center(centroid, &collection.ids(), layout);
        let active = self.active.take()?;

        let to = candidate.filter(|candidate| candidate != &active.id)?;
        match collection.reorder(&active.id, &to) {
            Ok(true) => {
                tracing::debug!(from = %active.id, %to, "reorder committed");
                Some(ReorderCommit {
                    from: active.id,
                    to,
                })
            }
            Ok(false) => None,
            Err(CollectionError::NotFound(id)) => {
                tracing::warn!(%id, "dragged item vanished before drop");
                None
            }
            Err(err) => {
                tracing::warn!(?err, "reorder rejected");
                None
            }
        }
    }
}
