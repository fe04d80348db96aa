//! Header alias resolution.
//!
//! Each logical [`Field`] accepts a priority-ordered list of header names.
//! Matching is case-insensitive on trimmed names and the first alias present
//! wins. Resolution happens once per file; rows are then read by index.

use std::collections::HashMap;

use crate::error::MetricsError;

/// Logical columns the deriver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Likes,
    Comments,
    Views,
    Er,
    Ivr,
    Url,
    Followers,
    Territory,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Date,
        Field::Likes,
        Field::Comments,
        Field::Views,
        Field::Er,
        Field::Ivr,
        Field::Url,
        Field::Followers,
        Field::Territory,
    ];

    /// Accepted header names, highest priority first.
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Date => &["date_v4", "date_v3", "date"],
            Field::Likes => &["total_likes_v4", "total_likes_v3", "likes"],
            Field::Comments => &["total_comments_v4", "total_comments_v3", "comments"],
            Field::Views => &["total_views_v4", "total_views_v3", "views"],
            Field::Er => &["er_v4", "er_v3", "er"],
            Field::Ivr => &["ivr_v4", "ivr_v3", "ivr"],
            Field::Url => &["url", "permalink", "link"],
            Field::Followers => &["followers", "follower_count"],
            Field::Territory => &[
                "assigned_territory_v4",
                "assigned_territory_v3",
                "territory",
            ],
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Field::Date => "DATE",
            Field::Likes => "LIKES",
            Field::Comments => "COMMENTS",
            Field::Views => "VIEWS",
            Field::Er => "ER",
            Field::Ivr => "IVR",
            Field::Url => "URL",
            Field::Followers => "FOLLOWERS",
            Field::Territory => "TERRITORY",
        }
    }

    fn required(self) -> bool {
        matches!(self, Field::Date)
    }
}

/// A header that satisfied one of a field's aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    /// Header text exactly as it appears in the file.
    pub name: String,
    pub index: usize,
}

/// Fixed mapping from logical field to source column, built once per file.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    resolved: HashMap<Field, ResolvedColumn>,
}

impl ColumnMap {
    /// Resolves every field against the given header row.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::MissingRequiredColumn`] when no date alias is
    /// present. Every other field is optional.
    pub fn resolve<'a, I>(headers: I) -> Result<Self, MetricsError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        // Later headers shadow earlier ones with the same normalised name.
        let available: HashMap<String, ResolvedColumn> = headers
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                (
                    raw.trim().to_lowercase(),
                    ResolvedColumn {
                        name: raw.to_string(),
                        index,
                    },
                )
            })
            .collect();

        let mut resolved = HashMap::new();
        for field in Field::ALL {
            let hit = field
                .aliases()
                .iter()
                .find_map(|alias| available.get(*alias));
            match hit {
                Some(column) => {
                    resolved.insert(field, column.clone());
                }
                None if field.required() => {
                    return Err(MetricsError::MissingRequiredColumn {
                        field: field.label(),
                        aliases: field.aliases(),
                    });
                }
                None => {}
            }
        }

        Ok(Self { resolved })
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&ResolvedColumn> {
        self.resolved.get(&field)
    }

    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        self.resolved.contains_key(&field)
    }

    /// Source header name for `field`, if resolved.
    #[must_use]
    pub fn name(&self, field: Field) -> Option<&str> {
        self.get(field).map(|c| c.name.as_str())
    }

    #[must_use]
    pub fn index(&self, field: Field) -> Option<usize> {
        self.get(field).map(|c| c.index)
    }
}
