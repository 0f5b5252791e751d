use crate::collection::ItemId;

/// Dialog lifecycle of a collection editor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Closed,
    Composing,
    Editing(ItemId),
}

impl SessionState {
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Item targeted by the open session; `None` while closed or composing.
    pub fn target(&self) -> Option<&ItemId> {
        match self {
            Self::Editing(id) => Some(id),
            Self::Closed | Self::Composing => None,
        }
    }
}
