use crate::collection::ItemId;
use crate::ingest::ImageRef;

/// Notifications for the presentation layer, drained after each handled input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// `target` is `None` while composing a new item.
    SessionOpened {
        target: Option<ItemId>,
    },
    SessionClosed,
    ImageReady {
        target: Option<ItemId>,
        image: ImageRef,
    },
    /// The file could not be read; the dialog stays open so the user can pick again.
    IngestFailed {
        target: Option<ItemId>,
        reason: String,
    },
    ItemInserted {
        id: ItemId,
    },
    ItemUpdated {
        id: ItemId,
    },
    ItemRemoved {
        id: ItemId,
    },
    ReorderCommitted {
        from: ItemId,
        to: ItemId,
    },
}
