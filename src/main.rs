use std::time::Duration;

use anyhow::Context;
use profile_board::drag::DragKey;

const INGEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_NUDGES: usize = 16;

/// Headless walk through the editor: every path argument becomes a new post,
/// then the first post is moved one slot right with the keyboard and the page is printed.
fn main() -> anyhow::Result<()> {
    let (mut editor, grid) = profile_board::run()?;

    for path in std::env::args_os().skip(1) {
        let posts = editor.posts_mut();
        posts.open_compose()?;
        posts.select_file(&path)?;
        if !posts.await_ingestion(INGEST_TIMEOUT) {
            anyhow::bail!("timed out reading {}", path.to_string_lossy());
        }
        posts.dismiss();
    }

    let posts = editor.posts_mut();
    let layout = grid.arrange(&posts.collection().ids());
    if let Some(first) = posts.collection().ids().first().cloned() {
        posts.key_press(DragKey::Space, Some(&first), &layout);
        for _ in 0..MAX_NUDGES {
            posts.key_press(DragKey::Right, Some(&first), &layout);
            if posts.drag().candidate().is_some_and(|candidate| *candidate != first) {
                break;
            }
        }
        posts.key_press(DragKey::Space, Some(&first), &layout);
    }

    for event in editor.drain_events() {
        tracing::info!(?event, "editor event");
    }

    let json = serde_json::to_string_pretty(&editor.snapshot()).context("serialize profile")?;
    println!("{json}");
    Ok(())
}
