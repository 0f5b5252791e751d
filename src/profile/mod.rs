//! Profile page state owner.

mod fields;

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

pub use fields::{
    FieldValue, Profile, ProfileError, ProfileField, ProfilePatch, ProfileResult, ProfileStats,
    StatsPatch,
};

use crate::collection::{Collection, Highlight, HighlightPatch, ItemId, Post};
use crate::editor::{CollectionEditor, EditorEvent, EditorOptions, EditorResult};
use crate::ingest::{IngestCompletion, IngestTicket, Ingestor};
use crate::patch::Patchable;

const SEED_POST_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileEvent {
    FieldPatched(ProfileField),
    AvatarFailed { reason: String },
    Posts(EditorEvent),
    Highlights(EditorEvent),
}

/// Serializable view of the whole page.
#[derive(Debug, Serialize)]
pub struct ProfileSnapshot<'a> {
    #[serde(flatten)]
    pub profile: &'a Profile,
    pub highlights: &'a [Highlight],
    pub posts: &'a [Post],
}

#[derive(Debug)]
pub struct ProfileEditor {
    profile: Profile,
    posts: CollectionEditor<Post>,
    highlights: CollectionEditor<Highlight>,
    avatar: Ingestor<()>,
    events: Vec<ProfileEvent>,
}

impl ProfileEditor {
    /// Builds the editor around the mock page seed.
    pub fn new(options: EditorOptions) -> Self {
        let placeholder = options.placeholder.clone();
        let posts = (1..=SEED_POST_COUNT)
            .map(|index| Post::new(format!("post-{index}"), placeholder.clone()));
        let highlights = [
            Highlight::new("1", "Info", placeholder.clone()),
            Highlight::new("2", "Carta", placeholder.clone()),
        ];
        Self::from_parts(Profile::seed(&placeholder), posts, highlights, options)
    }

    pub fn from_parts(
        profile: Profile,
        posts: impl IntoIterator<Item = Post>,
        highlights: impl IntoIterator<Item = Highlight>,
        options: EditorOptions,
    ) -> Self {
        let highlight_options = EditorOptions {
            close_on_image_commit: false,
            ..options.clone()
        };
        Self {
            profile,
            posts: CollectionEditor::new(dedup_collection("post", posts), options),
            highlights: CollectionEditor::new(
                dedup_collection("highlight", highlights),
                highlight_options,
            ),
            avatar: Ingestor::new(),
            events: Vec::new(),
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn posts(&self) -> &CollectionEditor<Post> {
        &self.posts
    }

    pub fn posts_mut(&mut self) -> &mut CollectionEditor<Post> {
        &mut self.posts
    }

    pub fn highlights(&self) -> &CollectionEditor<Highlight> {
        &self.highlights
    }

    pub fn highlights_mut(&mut self) -> &mut CollectionEditor<Highlight> {
        &mut self.highlights
    }

    pub fn snapshot(&self) -> ProfileSnapshot<'_> {
        ProfileSnapshot {
            profile: &self.profile,
            highlights: self.highlights.items(),
            posts: self.posts.items(),
        }
    }

    /// Commits one profile field. A rejected value leaves the profile untouched.
    pub fn profile_field_patch(
        &mut self,
        field: ProfileField,
        value: FieldValue,
    ) -> ProfileResult<()> {
        let patch = ProfilePatch::for_field(field, value).inspect_err(|err| {
            tracing::warn!(%err, "profile field patch rejected");
        })?;
        self.profile = self.profile.merge(&patch);
        tracing::debug!(%field, "profile field patched");
        self.events.push(ProfileEvent::FieldPatched(field));
        Ok(())
    }

    /// Same as [`profile_field_patch`](Self::profile_field_patch), addressed by path
    /// such as `"stats.followers"`.
    pub fn patch_path(&mut self, path: &str, value: FieldValue) -> ProfileResult<()> {
        let field = path.parse()?;
        self.profile_field_patch(field, value)
    }

    pub fn request_avatar(&mut self, path: impl Into<PathBuf>) -> IngestTicket {
        self.avatar.request(path, ())
    }

    pub fn add_highlight(&mut self) -> EditorResult<ItemId> {
        self.highlights.add_placeholder()
    }

    pub fn rename_highlight(&mut self, id: &ItemId, name: impl Into<String>) -> bool {
        self.highlights.update_item(
            id,
            &HighlightPatch {
                name: Some(name.into()),
                image: None,
            },
        )
    }

    pub fn delete_highlight(&mut self, id: &ItemId) -> bool {
        self.highlights.remove_item(id).is_some()
    }

    /// Applies every finished ingestion across avatar, highlights and posts.
    pub fn pump_ingestion(&mut self) -> usize {
        let avatar = self.avatar.poll();
        let mut handled = avatar.len();
        for completion in avatar {
            self.apply_avatar(completion);
        }
        handled += self.highlights.pump_ingestion();
        handled += self.posts.pump_ingestion();
        handled
    }

    pub fn await_avatar(&mut self, timeout: Duration) -> bool {
        match self.avatar.wait_next(timeout) {
            Some(completion) => {
                self.apply_avatar(completion);
                true
            }
            None => false,
        }
    }

    pub fn drain_events(&mut self) -> Vec<ProfileEvent> {
        let mut events = std::mem::take(&mut self.events);
        events.extend(
            self.highlights
                .drain_events()
                .into_iter()
                .map(ProfileEvent::Highlights),
        );
        events.extend(self.posts.drain_events().into_iter().map(ProfileEvent::Posts));
        events
    }

    fn apply_avatar(&mut self, completion: IngestCompletion<()>) {
        match completion.result {
            Ok(image) => {
                let patched =
                    self.profile_field_patch(ProfileField::Avatar, FieldValue::Image(image));
                if let Err(err) = patched {
                    tracing::warn!(%err, "avatar patch rejected");
                }
            }
            Err(err) => {
                tracing::warn!(ticket = completion.ticket.value(), %err, "avatar ingestion failed");
                self.events.push(ProfileEvent::AvatarFailed {
                    reason: err.to_string(),
                });
            }
        }
    }
}

impl Default for ProfileEditor {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

fn dedup_collection<T: crate::collection::CollectionItem>(
    id_prefix: &str,
    items: impl IntoIterator<Item = T>,
) -> Collection<T> {
    let mut collection = Collection::new(id_prefix);
    for item in items {
        if let Err(err) = collection.insert(item) {
            tracing::warn!(%err, "seed item skipped");
        }
    }
    collection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::{DragEvent, GridLayout};
    use crate::geometry::Point;
    use crate::ingest::ImageRef;

    const WAIT: Duration = Duration::from_secs(5);

    fn ids<T: crate::collection::CollectionItem>(items: &[T]) -> Vec<String> {
        items.iter().map(|item| item.id().as_str().to_string()).collect()
    }

    #[test]
    fn default_editor_carries_page_seed() {
        let editor = ProfileEditor::default();
        assert_eq!(
            ids(editor.posts().items()),
            ["post-1", "post-2", "post-3", "post-4", "post-5", "post-6"]
        );
        assert_eq!(ids(editor.highlights().items()), ["1", "2"]);
        assert_eq!(editor.highlights().items()[1].name, "Carta");
        assert!(editor.profile().avatar.is_placeholder());
    }

    #[test]
    fn field_patch_updates_only_that_field() {
        let mut editor = ProfileEditor::default();
        let before = editor.profile().clone();

        editor
            .profile_field_patch(ProfileField::Name, FieldValue::Text("Casa Nueva".to_string()))
            .expect("text for name");
        editor
            .patch_path("stats.followers", FieldValue::Text("23 mil".to_string()))
            .expect("text for followers");

        let after = editor.profile();
        assert_eq!(after.name, "Casa Nueva");
        assert_eq!(after.stats.followers, "23 mil");
        assert_eq!(after.username, before.username);
        assert_eq!(after.stats.posts, before.stats.posts);
        assert_eq!(
            editor.drain_events(),
            vec![
                ProfileEvent::FieldPatched(ProfileField::Name),
                ProfileEvent::FieldPatched(ProfileField::StatsFollowers),
            ]
        );
    }

    #[test]
    fn rejected_patch_leaves_profile_unchanged() {
        let mut editor = ProfileEditor::default();
        let before = editor.profile().clone();

        assert!(editor
            .profile_field_patch(ProfileField::StatsPosts, FieldValue::Text("NaN".to_string()))
            .is_err());
        assert!(editor
            .patch_path("bio", FieldValue::Text("x".to_string()))
            .is_err());
        assert_eq!(editor.profile(), &before);
        assert!(editor.drain_events().is_empty());
    }

    #[test]
    fn highlight_add_rename_delete() {
        let mut editor = ProfileEditor::default();

        let id = editor.add_highlight().expect("fresh id");
        assert_eq!(ids(editor.highlights().items()), ["1", "2", id.as_str()]);
        assert_eq!(editor.highlights().items()[2].name, "Nuevo");

        assert!(editor.rename_highlight(&id, "Menú"));
        assert_eq!(editor.highlights().items()[2].name, "Menú");

        assert!(editor.delete_highlight(&ItemId::from("1")));
        assert!(!editor.delete_highlight(&ItemId::from("1")));
        assert_eq!(ids(editor.highlights().items()), ["2", id.as_str()]);
    }

    #[test]
    fn avatar_ingestion_patches_avatar_field() {
        let path = std::env::temp_dir().join(format!(
            "profile-board-avatar-{}.gif",
            std::process::id()
        ));
        std::fs::write(&path, b"GIF89a....").expect("write avatar");

        let mut editor = ProfileEditor::default();
        editor.request_avatar(&path);
        assert!(editor.await_avatar(WAIT));

        assert_eq!(editor.profile().avatar.mime_type(), Some("image/gif"));
        assert_eq!(
            editor.drain_events(),
            vec![ProfileEvent::FieldPatched(ProfileField::Avatar)]
        );

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn failed_avatar_ingestion_keeps_previous_avatar() {
        let mut editor = ProfileEditor::default();
        editor.request_avatar("/nonexistent/profile-board/avatar.png");
        assert!(editor.await_avatar(WAIT));

        assert_eq!(editor.profile().avatar, ImageRef::default());
        assert!(matches!(
            editor.drain_events().as_slice(),
            [ProfileEvent::AvatarFailed { .. }]
        ));
    }

    #[test]
    fn post_reorder_events_are_tagged() {
        let mut editor = ProfileEditor::default();
        let layout = GridLayout::default().arrange(&editor.posts().collection().ids());
        let first = layout_center(&layout, "post-1");
        let third = layout_center(&layout, "post-3");

        let posts = editor.posts_mut();
        posts.handle_drag(
            DragEvent::Start {
                id: ItemId::from("post-1"),
                pointer: first,
            },
            &layout,
        );
        posts.handle_drag(DragEvent::End(third), &layout);

        assert_eq!(
            ids(editor.posts().items()),
            ["post-2", "post-3", "post-1", "post-4", "post-5", "post-6"]
        );
        assert_eq!(
            editor.drain_events(),
            vec![ProfileEvent::Posts(EditorEvent::ReorderCommitted {
                from: ItemId::from("post-1"),
                to: ItemId::from("post-3"),
            })]
        );
    }

    #[test]
    fn snapshot_serializes_flat_profile_with_tiles() {
        let editor = ProfileEditor::default();
        let json = serde_json::to_value(editor.snapshot()).expect("serialize snapshot");

        assert_eq!(json["username"], "casarafuel");
        assert_eq!(json["stats"]["posts"], 47);
        assert_eq!(json["highlights"][0]["name"], "Info");
        assert_eq!(json["posts"][5]["id"], "post-6");
        assert_eq!(json["posts"][0]["image"], "/placeholder.svg");
    }

    fn layout_center(layout: &crate::drag::ArrangedGrid, id: &str) -> Point {
        use crate::drag::LayoutModel;
        layout
            .rect_of(&ItemId::from(id))
            .expect("id is laid out")
            .center()
    }
}
