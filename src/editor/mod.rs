//! Collection editor: the single owner of one reorderable collection, its dialog
//! session, its drag gesture state and its pending image ingestions.
//!
//! Presentation code talks to it through methods and reads back [`EditorEvent`]s;
//! it never gets mutable access to the collection or the session.

mod events;

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub use events::EditorEvent;

use crate::collection::{Collection, CollectionError, CollectionItem, ItemId};
use crate::drag::{
    DragEngine, DragEvent, DragKey, KeyboardSensor, LayoutModel, PointerSensor, ReorderCommit,
    DEFAULT_KEYBOARD_STEP,
};
use crate::geometry::Point;
use crate::ingest::{ImageRef, IngestCompletion, IngestTicket, Ingestor};
use crate::session::{SessionError, SessionEvent, SessionMachine, SessionState};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Collection(#[from] CollectionError),
    #[error("no open session to receive a file")]
    NoOpenSession,
    #[error("delete requested while not editing an item")]
    NothingToDelete,
}

pub type EditorResult<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// Image given to items created without a file.
    pub placeholder: ImageRef,
    /// Close an edit session once its image has been applied.
    pub close_on_image_commit: bool,
    pub keyboard_step: f32,
    pub pointer_activation_distance: f32,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            placeholder: ImageRef::default(),
            close_on_image_commit: true,
            keyboard_step: DEFAULT_KEYBOARD_STEP,
            pointer_activation_distance: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
struct IngestKey {
    generation: u64,
    target: Option<ItemId>,
}

#[derive(Debug)]
pub struct CollectionEditor<T> {
    collection: Collection<T>,
    session: SessionMachine,
    drag: DragEngine,
    keyboard: KeyboardSensor,
    pointer: PointerSensor,
    ingestor: Ingestor<IngestKey>,
    last_commit: Option<(u64, ItemId)>,
    options: EditorOptions,
    events: Vec<EditorEvent>,
}

impl<T: CollectionItem> CollectionEditor<T> {
    pub fn new(collection: Collection<T>, options: EditorOptions) -> Self {
        Self {
            collection,
            session: SessionMachine::new(),
            drag: DragEngine::new(),
            keyboard: KeyboardSensor::new(options.keyboard_step),
            pointer: PointerSensor::new(options.pointer_activation_distance),
            ingestor: Ingestor::new(),
            last_commit: None,
            options,
            events: Vec::new(),
        }
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub fn items(&self) -> &[T] {
        self.collection.items()
    }

    pub fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn drag(&self) -> &DragEngine {
        &self.drag
    }

    pub fn preview_order(&self) -> Vec<ItemId> {
        self.drag.preview_order(&self.collection)
    }

    pub fn pending_ingestions(&self) -> usize {
        self.ingestor.in_flight()
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn open_compose(&mut self) -> EditorResult<()> {
        self.session.transition(SessionEvent::OpenCompose)?;
        self.events.push(EditorEvent::SessionOpened { target: None });
        Ok(())
    }

    /// Opens the edit dialog for `id`. A missing item is a silent no-op (`Ok(false)`).
    pub fn open_edit(&mut self, id: &ItemId) -> EditorResult<bool> {
        if !self.collection.contains(id) {
            tracing::warn!(%id, "edit requested for missing item; ignoring");
            return Ok(false);
        }
        self.session.transition(SessionEvent::OpenEdit(id.clone()))?;
        self.events.push(EditorEvent::SessionOpened {
            target: Some(id.clone()),
        });
        Ok(true)
    }

    pub fn cancel(&mut self) -> bool {
        if !self.session.is_open() {
            return false;
        }
        self.close_session(SessionEvent::Cancel);
        true
    }

    /// Closes whatever is open, dropping uncommitted input.
    pub fn dismiss(&mut self) {
        if self.session.is_open() {
            self.close_session(SessionEvent::Dismiss);
        }
    }

    /// Feeds a user-picked file to the open session. The result lands later through
    /// [`pump_ingestion`](Self::pump_ingestion) or [`await_ingestion`](Self::await_ingestion).
    pub fn select_file(&mut self, path: impl Into<PathBuf>) -> EditorResult<IngestTicket> {
        if !self.session.is_open() {
            tracing::warn!("file selected with no open session");
            return Err(EditorError::NoOpenSession);
        }
        let key = IngestKey {
            generation: self.session.generation(),
            target: self.session.state().target().cloned(),
        };
        Ok(self.ingestor.request(path, key))
    }

    /// Removes the item being edited and closes the session.
    pub fn delete_current(&mut self) -> EditorResult<Option<T>> {
        let SessionState::Editing(id) = self.session.state() else {
            return Err(EditorError::NothingToDelete);
        };
        let id = id.clone();
        let removed = self.remove_quietly(&id);
        self.close_session(SessionEvent::Commit);
        Ok(removed)
    }

    /// Appends a new item carrying the placeholder image, bypassing the dialog.
    pub fn add_placeholder(&mut self) -> EditorResult<ItemId> {
        let id = self.collection.allocate_id();
        let item = T::fresh(id.clone(), self.options.placeholder.clone());
        self.collection.insert(item)?;
        self.events.push(EditorEvent::ItemInserted { id: id.clone() });
        Ok(id)
    }

    pub fn update_item(&mut self, id: &ItemId, patch: &T::Patch) -> bool {
        match self.collection.update(id, patch) {
            Ok(()) => {
                self.events.push(EditorEvent::ItemUpdated { id: id.clone() });
                true
            }
            Err(err) => {
                tracing::warn!(%err, "item update ignored");
                false
            }
        }
    }

    /// Removes `id` outside the dialog flow. Closes the session if it was editing `id`.
    pub fn remove_item(&mut self, id: &ItemId) -> Option<T> {
        let removed = self.remove_quietly(id);
        if self.session.state().target() == Some(id) {
            self.close_session(SessionEvent::Commit);
        }
        removed
    }

    /// Applies every ingestion that has finished so far. Returns how many were handled.
    pub fn pump_ingestion(&mut self) -> usize {
        let completed = self.ingestor.poll();
        let count = completed.len();
        for completion in completed {
            self.apply_ingestion(completion);
        }
        count
    }

    /// Waits up to `timeout` for one ingestion and applies it.
    pub fn await_ingestion(&mut self, timeout: Duration) -> bool {
        match self.ingestor.wait_next(timeout) {
            Some(completion) => {
                self.apply_ingestion(completion);
                true
            }
            None => false,
        }
    }

    pub fn handle_drag<L: LayoutModel>(
        &mut self,
        event: DragEvent,
        layout: &L,
    ) -> Option<ReorderCommit> {
        let commit = self.drag.handle(event, &mut self.collection, layout)?;
        self.events.push(EditorEvent::ReorderCommitted {
            from: commit.from.clone(),
            to: commit.to.clone(),
        });
        Some(commit)
    }

    pub fn key_press<L: LayoutModel>(
        &mut self,
        key: DragKey,
        focused: Option<&ItemId>,
        layout: &L,
    ) -> Option<ReorderCommit> {
        if !self.keyboard.is_dragging() && self.drag.is_dragging() {
            tracing::debug!(?key, "key ignored while a pointer drag is active");
            return None;
        }
        let event = self.keyboard.key(key, focused, layout)?;
        self.handle_drag(event, layout)
    }

    pub fn pointer_down<L: LayoutModel>(
        &mut self,
        id: ItemId,
        point: Point,
        layout: &L,
    ) -> Option<ReorderCommit> {
        if self.keyboard.is_dragging() {
            tracing::debug!(%id, "pointer press ignored while a keyboard drag is active");
            return None;
        }
        let events = self.pointer.press(id, point);
        self.feed_drag(events, layout)
    }

    pub fn pointer_move<L: LayoutModel>(
        &mut self,
        point: Point,
        layout: &L,
    ) -> Option<ReorderCommit> {
        let events = self.pointer.move_to(point);
        self.feed_drag(events, layout)
    }

    pub fn pointer_up<L: LayoutModel>(&mut self, point: Point, layout: &L) -> Option<ReorderCommit> {
        let events = self.pointer.release(point);
        self.feed_drag(events, layout)
    }

    pub fn pointer_abort<L: LayoutModel>(&mut self, layout: &L) -> Option<ReorderCommit> {
        let events = self.pointer.abort();
        self.feed_drag(events, layout)
    }

    fn feed_drag<L: LayoutModel>(
        &mut self,
        events: Vec<DragEvent>,
        layout: &L,
    ) -> Option<ReorderCommit> {
        events
            .into_iter()
            .fold(None, |commit, event| self.handle_drag(event, layout).or(commit))
    }

    fn remove_quietly(&mut self, id: &ItemId) -> Option<T> {
        match self.collection.remove(id) {
            Ok(item) => {
                self.events.push(EditorEvent::ItemRemoved { id: id.clone() });
                Some(item)
            }
            Err(err) => {
                tracing::warn!(%err, "remove ignored");
                None
            }
        }
    }

    fn close_session(&mut self, event: SessionEvent) {
        match self.session.transition(event) {
            Ok(_) => self.events.push(EditorEvent::SessionClosed),
            Err(err) => tracing::warn!(%err, "session close rejected"),
        }
    }

    fn apply_ingestion(&mut self, completion: IngestCompletion<IngestKey>) {
        let IngestCompletion {
            ticket,
            key,
            result,
        } = completion;
        let current = self.session.is_open() && self.session.generation() == key.generation;

        let image = match result {
            Ok(image) => image,
            Err(err) => {
                if current {
                    tracing::warn!(ticket = ticket.value(), %err, "ingestion failed; session kept open for retry");
                    self.events.push(EditorEvent::IngestFailed {
                        target: key.target,
                        reason: err.to_string(),
                    });
                } else {
                    tracing::warn!(ticket = ticket.value(), %err, "stale ingestion failed");
                }
                return;
            }
        };

        if current {
            self.commit_image(key.generation, key.target, image);
            return;
        }

        // Another file picked in the same session may finish after the first one closed
        // it; the last one to finish wins. For a compose that means the inserted item.
        let late_target = match &self.last_commit {
            Some((generation, committed))
                if *generation == key.generation
                    && key.target.as_ref().is_none_or(|target| target == committed) =>
            {
                Some(committed.clone())
            }
            _ => None,
        };
        match late_target {
            Some(id) => {
                self.events.push(EditorEvent::ImageReady {
                    target: Some(id.clone()),
                    image: image.clone(),
                });
                if self.collection.update_image(&id, image).is_ok() {
                    tracing::debug!(%id, ticket = ticket.value(), "late ingestion applied");
                    self.events.push(EditorEvent::ItemUpdated { id });
                }
            }
            None => {
                tracing::debug!(ticket = ticket.value(), "stale ingestion result dropped");
            }
        }
    }

    fn commit_image(&mut self, generation: u64, target: Option<ItemId>, image: ImageRef) {
        self.events.push(EditorEvent::ImageReady {
            target: target.clone(),
            image: image.clone(),
        });

        let Some(id) = target else {
            let id = self.collection.allocate_id();
            match self.collection.insert(T::fresh(id.clone(), image)) {
                Ok(()) => {
                    self.events.push(EditorEvent::ItemInserted { id: id.clone() });
                    self.last_commit = Some((generation, id));
                }
                Err(err) => tracing::warn!(%err, "composed item rejected"),
            }
            self.close_session(SessionEvent::Commit);
            return;
        };

        match self.collection.update_image(&id, image) {
            Ok(()) => {
                self.events.push(EditorEvent::ItemUpdated { id: id.clone() });
                if self.options.close_on_image_commit {
                    self.close_session(SessionEvent::Commit);
                    self.last_commit = Some((generation, id));
                }
            }
            Err(err) => {
                tracing::warn!(%err, "edited item vanished; closing session");
                self.close_session(SessionEvent::Dismiss);
            }
        }
    }
}
