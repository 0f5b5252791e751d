use crate::collection::CollectionError;
use crate::editor::EditorError;
use crate::ingest::IngestError;
use crate::profile::ProfileError;
use crate::session::SessionError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Collection(#[from] CollectionError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Editor(#[from] EditorError),
}
