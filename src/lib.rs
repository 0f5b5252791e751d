pub mod collection;
mod config;
pub mod drag;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod ingest;
pub mod logging;
pub mod patch;
pub mod profile;
pub mod session;
pub use config::{load_app_config, AppConfig};
pub use error::{AppError, AppResult};

use drag::GridLayout;
use profile::ProfileEditor;

/// Entrypoint used by the CLI: logging, config, then a seeded profile editor.
pub fn run() -> AppResult<(ProfileEditor, GridLayout)> {
    logging::init();
    tracing::info!("starting profile-board");

    let config = load_app_config();
    let editor = ProfileEditor::new(config.editor_options());
    let layout = GridLayout::new(config.grid_columns());

    tracing::info!(
        posts = editor.posts().items().len(),
        highlights = editor.highlights().items().len(),
        columns = config.grid_columns(),
        "profile editor ready"
    );
    Ok((editor, layout))
}
