use super::{DragEvent, LayoutModel};
use crate::collection::ItemId;
use crate::geometry::Point;

pub const DEFAULT_KEYBOARD_STEP: f32 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKey {
    Space,
    Enter,
    Escape,
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyboardAction {
    PickUpOrDrop,
    Move { dx: f32, dy: f32 },
    Cancel,
}

pub fn resolve_drag_key(key: DragKey, step: f32) -> KeyboardAction {
    match key {
        DragKey::Space | DragKey::Enter => KeyboardAction::PickUpOrDrop,
        DragKey::Escape => KeyboardAction::Cancel,
        DragKey::Up => KeyboardAction::Move { dx: 0.0, dy: -step },
        DragKey::Down => KeyboardAction::Move { dx: 0.0, dy: step },
        DragKey::Left => KeyboardAction::Move { dx: -step, dy: 0.0 },
        DragKey::Right => KeyboardAction::Move { dx: step, dy: 0.0 },
    }
}

/// Discrete drag input: pick up the focused tile, nudge the drag point, drop or cancel.
#[derive(Debug, Clone)]
pub struct KeyboardSensor {
    step: f32,
    point: Option<Point>,
}

impl Default for KeyboardSensor {
    fn default() -> Self {
        Self::new(DEFAULT_KEYBOARD_STEP)
    }
}

impl KeyboardSensor {
    pub fn new(step: f32) -> Self {
        Self { step, point: None }
    }

    pub fn is_dragging(&self) -> bool {
        self.point.is_some()
    }

    pub fn key<L: LayoutModel>(
        &mut self,
        key: DragKey,
        focused: Option<&ItemId>,
        layout: &L,
    ) -> Option<DragEvent> {
        match (resolve_drag_key(key, self.step), self.point) {
            (KeyboardAction::PickUpOrDrop, None) => {
                let id = focused?;
                let pointer = layout.rect_of(id)?.center();
                self.point = Some(pointer);
                Some(DragEvent::Start {
                    id: id.clone(),
                    pointer,
                })
            }
            (KeyboardAction::PickUpOrDrop, Some(point)) => {
                self.point = None;
                Some(DragEvent::End(point))
            }
            (KeyboardAction::Move { dx, dy }, Some(point)) => {
                let moved = point.offset(dx, dy);
                self.point = Some(moved);
                Some(DragEvent::Over(moved))
            }
            (KeyboardAction::Cancel, Some(_)) => {
                self.point = None;
                Some(DragEvent::Cancel)
            }
            (KeyboardAction::Move { .. } | KeyboardAction::Cancel, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PointerPhase {
    Idle,
    Pressed { id: ItemId, origin: Point },
    Dragging,
}

/// Continuous drag input. A press only becomes a drag once the pointer travels past the
/// activation distance, so plain clicks stay clicks.
#[derive(Debug, Clone)]
pub struct PointerSensor {
    activation_distance: f32,
    phase: PointerPhase,
}

impl Default for PointerSensor {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl PointerSensor {
    pub fn new(activation_distance: f32) -> Self {
        Self {
            activation_distance: activation_distance.max(0.0),
            phase: PointerPhase::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == PointerPhase::Dragging
    }

    pub fn press(&mut self, id: ItemId, point: Point) -> Vec<DragEvent> {
        if self.phase != PointerPhase::Idle {
            return Vec::new();
        }
        if self.activation_distance <= 0.0 {
            self.phase = PointerPhase::Dragging;
            return vec![DragEvent::Start { id, pointer: point }];
        }
        self.phase = PointerPhase::Pressed { id, origin: point };
        Vec::new()
    }

    pub fn move_to(&mut self, point: Point) -> Vec<DragEvent> {
        match &self.phase {
            PointerPhase::Idle => Vec::new(),
            PointerPhase::Dragging => vec![DragEvent::Over(point)],
            PointerPhase::Pressed { id, origin } => {
                if origin.distance_to(point) < self.activation_distance {
                    return Vec::new();
                }
                let start = DragEvent::Start {
                    id: id.clone(),
                    pointer: *origin,
                };
                self.phase = PointerPhase::Dragging;
                vec![start, DragEvent::Over(point)]
            }
        }
    }

    pub fn release(&mut self, point: Point) -> Vec<DragEvent> {
        let was_dragging = self.is_dragging();
        self.phase = PointerPhase::Idle;
        if was_dragging {
            vec![DragEvent::End(point)]
        } else {
            Vec::new()
        }
    }

    pub fn abort(&mut self) -> Vec<DragEvent> {
        let was_dragging = self.is_dragging();
        self.phase = PointerPhase::Idle;
        if was_dragging {
            vec![DragEvent::Cancel]
        } else {
            Vec::new()
        }
    }
}
