use super::model::SessionState;
use crate::collection::ItemId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// "Add" action from the grid.
    OpenCompose,
    /// Existing tile selected for edit.
    OpenEdit(ItemId),
    Cancel,
    /// Insert, image update or removal went through.
    Commit,
    /// Dialog dismissed from outside; uncommitted input is dropped.
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTransition {
    pub from: SessionState,
    pub event: SessionEvent,
    pub to: SessionState,
}

impl SessionTransition {
    pub fn new(from: SessionState, event: SessionEvent, to: SessionState) -> Self {
        Self { from, event, to }
    }
}
