use crate::collection::ItemId;
use crate::geometry::{Point, Rect};

/// Source of tile geometry for collision detection.
pub trait LayoutModel {
    fn rect_of(&self, id: &ItemId) -> Option<Rect>;
}

impl<F> LayoutModel for F
where
    F: Fn(&ItemId) -> Option<Rect>,
{
    fn rect_of(&self, id: &ItemId) -> Option<Rect> {
        self(id)
    }
}

pub const DEFAULT_GRID_COLUMNS: usize = 3;
const DEFAULT_TILE_SIZE: f32 = 120.0;
const DEFAULT_TILE_GAP: f32 = 4.0;

/// Square tiles laid out row-major in a fixed number of columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub tile: f32,
    pub gap: f32,
    pub origin: Point,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_COLUMNS)
    }
}

impl GridLayout {
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
            tile: DEFAULT_TILE_SIZE,
            gap: DEFAULT_TILE_GAP,
            origin: Point::default(),
        }
    }

    /// Single-row strip, as used by the highlight bar.
    pub fn strip(tile: f32, gap: f32) -> Self {
        Self {
            columns: usize::MAX,
            tile,
            gap,
            origin: Point::default(),
        }
    }

    pub fn rect_at(&self, index: usize) -> Rect {
        let columns = self.columns.max(1);
        let column = index % columns;
        let row = index / columns;
        let pitch = self.tile + self.gap;
        Rect::new(
            self.origin.x + column as f32 * pitch,
            self.origin.y + row as f32 * pitch,
            self.tile,
            self.tile,
        )
    }

    /// Binds the layout to a concrete id order.
    pub fn arrange(&self, ids: &[ItemId]) -> ArrangedGrid {
        ArrangedGrid {
            slots: ids
                .iter()
                .enumerate()
                .map(|(index, id)| (id.clone(), self.rect_at(index)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrangedGrid {
    slots: Vec<(ItemId, Rect)>,
}

impl LayoutModel for ArrangedGrid {
    fn rect_of(&self, id: &ItemId) -> Option<Rect> {
        self.slots
            .iter()
            .find(|(slot_id, _)| slot_id == id)
            .map(|(_, rect)| *rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_wraps_after_column_count() {
        let grid = GridLayout {
            columns: 3,
            tile: 10.0,
            gap: 2.0,
            origin: Point::new(5.0, 5.0),
        };
        assert_eq!(grid.rect_at(0), Rect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(grid.rect_at(2), Rect::new(29.0, 5.0, 10.0, 10.0));
        assert_eq!(grid.rect_at(3), Rect::new(5.0, 17.0, 10.0, 10.0));
    }

    #[test]
    fn strip_never_wraps() {
        let strip = GridLayout::strip(64.0, 16.0);
        assert_eq!(strip.rect_at(4).y, 0.0);
        assert_eq!(strip.rect_at(4).x, 320.0);
    }

    #[test]
    fn arranged_grid_answers_by_id() {
        let ids = vec![ItemId::from("a"), ItemId::from("b")];
        let arranged = GridLayout::new(1).arrange(&ids);
        assert_eq!(arranged.rect_of(&ItemId::from("b")).map(|r| r.y), Some(124.0));
        assert_eq!(arranged.rect_of(&ItemId::from("z")), None);
    }

    #[test]
    fn closures_are_layout_models() {
        let layout = |id: &ItemId| (id.as_str() == "a").then(|| Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(layout.rect_of(&ItemId::from("a")).is_some());
        assert!(layout.rect_of(&ItemId::from("b")).is_none());
    }
}
