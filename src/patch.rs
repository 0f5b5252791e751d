//! Partial-update merge rule shared by every editor.
//!
//! A patch carries `Option` fields: present fields overwrite, absent fields keep the
//! current value. Merging always builds a new value and leaves the source untouched.

pub trait Patchable: Sized {
    type Patch;

    fn merge(&self, patch: &Self::Patch) -> Self;
}

pub fn merge<T: Patchable>(current: &T, patch: &T::Patch) -> T {
    current.merge(patch)
}

pub(crate) fn overwrite<V: Clone>(current: &V, patch: &Option<V>) -> V {
    patch.as_ref().unwrap_or(current).clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Card {
        title: String,
        count: u32,
    }

    #[derive(Debug, Default)]
    struct CardPatch {
        title: Option<String>,
        count: Option<u32>,
    }

    impl Patchable for Card {
        type Patch = CardPatch;

        fn merge(&self, patch: &CardPatch) -> Self {
            Self {
                title: overwrite(&self.title, &patch.title),
                count: overwrite(&self.count, &patch.count),
            }
        }
    }

    #[test]
    fn present_fields_overwrite_and_absent_fields_survive() {
        let card = Card {
            title: "a".to_string(),
            count: 1,
        };
        let merged = merge(
            &card,
            &CardPatch {
                count: Some(7),
                ..CardPatch::default()
            },
        );

        assert_eq!(merged.title, "a");
        assert_eq!(merged.count, 7);
        assert_eq!(card.count, 1, "source value must not change");
    }

    #[test]
    fn empty_patch_is_identity() {
        let card = Card {
            title: "b".to_string(),
            count: 3,
        };
        assert_eq!(card.merge(&CardPatch::default()), card);
    }

    #[test]
    fn successive_patches_are_last_write_wins_per_field() {
        let card = Card {
            title: "c".to_string(),
            count: 0,
        };
        let first = CardPatch {
            title: Some("first".to_string()),
            count: Some(1),
        };
        let second = CardPatch {
            title: Some("second".to_string()),
            count: None,
        };

        let merged = card.merge(&first).merge(&second);
        assert_eq!(merged.title, "second");
        assert_eq!(merged.count, 1);
    }
}
