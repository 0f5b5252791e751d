use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::ingest::ImageRef;
use crate::patch::{overwrite, Patchable};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("unknown profile field path {0:?}")]
    UnknownField(String),
    #[error("field {field} expects {expected}")]
    FieldValueMismatch {
        field: ProfileField,
        expected: &'static str,
    },
    #[error("field {field} expects a whole number, got {input:?}")]
    InvalidCount { field: ProfileField, input: String },
}

pub type ProfileResult<T> = std::result::Result<T, ProfileError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileStats {
    pub posts: u32,
    /// Free text on purpose: the page shows abbreviations like "22 mil".
    pub followers: String,
    pub following: u32,
}

#[derive(Debug, Clone, Default)]
pub struct StatsPatch {
    pub posts: Option<u32>,
    pub followers: Option<String>,
    pub following: Option<u32>,
}

impl Patchable for ProfileStats {
    type Patch = StatsPatch;

    fn merge(&self, patch: &StatsPatch) -> Self {
        Self {
            posts: overwrite(&self.posts, &patch.posts),
            followers: overwrite(&self.followers, &patch.followers),
            following: overwrite(&self.following, &patch.following),
        }
    }
}

/// Scalar part of the profile page. Tiles live in their own collection editors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub username: String,
    pub name: String,
    pub avatar: ImageRef,
    pub description: Vec<String>,
    pub website: String,
    pub stats: ProfileStats,
}

impl Profile {
    pub fn website_url(&self) -> String {
        format!("https://{}", self.website)
    }

    pub fn seed(placeholder: &ImageRef) -> Self {
        Self {
            username: "casarafuel".to_string(),
            name: "Casa Rafuel".to_string(),
            avatar: placeholder.clone(),
            description: vec![
                "🍽️ La casa de comidas de @rafuel55".to_string(),
                "🍊 Horario semanal: en stories/destacados".to_string(),
                "SIN RESERVAS".to_string(),
                "📍 C/ Còrsega 298, Bcn".to_string(),
            ],
            website: "pistopisco.com/Casa-Rafuel.html".to_string(),
            stats: ProfileStats {
                posts: 47,
                followers: "22 mil".to_string(),
                following: 4,
            },
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::seed(&ImageRef::default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<ImageRef>,
    pub description: Option<Vec<String>>,
    pub website: Option<String>,
    pub stats: Option<StatsPatch>,
}

impl Patchable for Profile {
    type Patch = ProfilePatch;

    fn merge(&self, patch: &ProfilePatch) -> Self {
        Self {
            username: overwrite(&self.username, &patch.username),
            name: overwrite(&self.name, &patch.name),
            avatar: overwrite(&self.avatar, &patch.avatar),
            description: overwrite(&self.description, &patch.description),
            website: overwrite(&self.website, &patch.website),
            stats: match &patch.stats {
                Some(stats) => self.stats.merge(stats),
                None => self.stats.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Username,
    Name,
    Avatar,
    Description,
    Website,
    StatsPosts,
    StatsFollowers,
    StatsFollowing,
}

impl ProfileField {
    pub const ALL: [ProfileField; 8] = [
        Self::Username,
        Self::Name,
        Self::Avatar,
        Self::Description,
        Self::Website,
        Self::StatsPosts,
        Self::StatsFollowers,
        Self::StatsFollowing,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Name => "name",
            Self::Avatar => "avatar",
            Self::Description => "description",
            Self::Website => "website",
            Self::StatsPosts => "stats.posts",
            Self::StatsFollowers => "stats.followers",
            Self::StatsFollowing => "stats.following",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for ProfileField {
    type Err = ProfileError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.path() == path)
            .ok_or_else(|| ProfileError::UnknownField(path.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Lines(Vec<String>),
    Count(u32),
    Image(ImageRef),
}

impl ProfilePatch {
    /// Single-field patch. Text input is accepted for counters and for the description,
    /// which is split into lines the way the bio textarea shows it.
    pub fn for_field(field: ProfileField, value: FieldValue) -> ProfileResult<Self> {
        let mut patch = Self::default();
        match field {
            ProfileField::Username => patch.username = Some(expect_text(field, value)?),
            ProfileField::Name => patch.name = Some(expect_text(field, value)?),
            ProfileField::Website => patch.website = Some(expect_text(field, value)?),
            ProfileField::Avatar => match value {
                FieldValue::Image(image) => patch.avatar = Some(image),
                _ => {
                    return Err(ProfileError::FieldValueMismatch {
                        field,
                        expected: "an image",
                    })
                }
            },
            ProfileField::Description => {
                let lines = match value {
                    FieldValue::Lines(lines) => lines,
                    FieldValue::Text(text) => text.split('\n').map(str::to_string).collect(),
                    _ => {
                        return Err(ProfileError::FieldValueMismatch {
                            field,
                            expected: "text or lines",
                        })
                    }
                };
                patch.description = Some(lines);
            }
            ProfileField::StatsPosts => {
                patch.stats = Some(StatsPatch {
                    posts: Some(expect_count(field, value)?),
                    ..StatsPatch::default()
                });
            }
            ProfileField::StatsFollowers => {
                patch.stats = Some(StatsPatch {
                    followers: Some(expect_text(field, value)?),
                    ..StatsPatch::default()
                });
            }
            ProfileField::StatsFollowing => {
                patch.stats = Some(StatsPatch {
                    following: Some(expect_count(field, value)?),
                    ..StatsPatch::default()
                });
            }
        }
        Ok(patch)
    }
}

fn expect_text(field: ProfileField, value: FieldValue) -> ProfileResult<String> {
    match value {
        FieldValue::Text(text) => Ok(text),
        _ => Err(ProfileError::FieldValueMismatch {
            field,
            expected: "text",
        }),
    }
}

fn expect_count(field: ProfileField, value: FieldValue) -> ProfileResult<u32> {
    match value {
        FieldValue::Count(count) => Ok(count),
        FieldValue::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| ProfileError::InvalidCount { field, input: text }),
        _ => Err(ProfileError::FieldValueMismatch {
            field,
            expected: "a count",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_paths_round_trip_through_from_str() {
        for field in ProfileField::ALL {
            assert_eq!(field.path().parse::<ProfileField>(), Ok(field));
        }
        assert_eq!(
            "stats.likes".parse::<ProfileField>(),
            Err(ProfileError::UnknownField("stats.likes".to_string()))
        );
    }

    #[test]
    fn stats_patch_touches_one_counter() {
        let profile = Profile::default();
        let patch =
            ProfilePatch::for_field(ProfileField::StatsFollowing, FieldValue::Count(120))
                .expect("count is valid");
        let merged = profile.merge(&patch);

        assert_eq!(merged.stats.following, 120);
        assert_eq!(merged.stats.posts, profile.stats.posts);
        assert_eq!(merged.stats.followers, profile.stats.followers);
        assert_eq!(merged.name, profile.name);
    }

    #[test]
    fn description_text_is_split_into_lines() {
        let patch = ProfilePatch::for_field(
            ProfileField::Description,
            FieldValue::Text("uno\ndos".to_string()),
        )
        .expect("text is accepted");
        let merged = Profile::default().merge(&patch);
        assert_eq!(merged.description, ["uno", "dos"]);
    }

    #[test]
    fn counter_text_must_be_numeric() {
        assert_eq!(
            ProfilePatch::for_field(ProfileField::StatsPosts, FieldValue::Text(" 52 ".to_string()))
                .map(|patch| patch.stats.and_then(|stats| stats.posts)),
            Ok(Some(52))
        );
        assert_eq!(
            ProfilePatch::for_field(ProfileField::StatsPosts, FieldValue::Text("lots".to_string()))
                .map(|_| ()),
            Err(ProfileError::InvalidCount {
                field: ProfileField::StatsPosts,
                input: "lots".to_string(),
            })
        );
    }

    #[test]
    fn mismatched_value_kind_is_rejected() {
        let err = ProfilePatch::for_field(ProfileField::Avatar, FieldValue::Count(1))
            .map(|_| ())
            .expect_err("avatar needs an image");
        assert_eq!(
            err,
            ProfileError::FieldValueMismatch {
                field: ProfileField::Avatar,
                expected: "an image",
            }
        );
    }

    #[test]
    fn seed_matches_page_defaults() {
        let profile = Profile::default();
        assert_eq!(profile.username, "casarafuel");
        assert_eq!(profile.description.len(), 4);
        assert_eq!(
            profile.website_url(),
            "https://pistopisco.com/Casa-Rafuel.html"
        );
        assert_eq!(profile.stats.followers, "22 mil");
    }
}
