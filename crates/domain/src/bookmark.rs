use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Presentation tag attached to list cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookmarkTag {
    /// Recently created.
    New,
    /// Recently modified after creation.
    Updated,
    /// Frequently downloaded.
    Popular,
}

impl BookmarkTag {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Updated => "updated",
            Self::Popular => "popular",
        }
    }
}

/// Thresholds for bookmark classification. The values are product decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkThresholds {
    /// Records created within this many days are `new`.
    pub new_within_days: i64,
    /// Records updated within this many days are `updated`.
    pub updated_within_days: i64,
    /// Records with at least this many downloads are `popular`.
    pub popular_downloads: u32,
}

impl Default for BookmarkThresholds {
    fn default() -> Self {
        Self {
            new_within_days: 7,
            updated_within_days: 30,
            popular_downloads: 10,
        }
    }
}

impl BookmarkThresholds {
    /// Derives tags in `new`, `updated`, `popular` order.
    #[must_use]
    pub fn classify(
        &self,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
        downloads: Option<u32>,
        now: DateTime<Utc>,
    ) -> Vec<BookmarkTag> {
        let mut tags = Vec::new();

        let is_new = created_at.is_some_and(|created| within(now, created, self.new_within_days));
        if is_new {
            tags.push(BookmarkTag::New);
        }

        if !is_new
            && let (Some(created), Some(updated)) = (created_at, updated_at)
            && updated > created
            && within(now, updated, self.updated_within_days)
        {
            tags.push(BookmarkTag::Updated);
        }

        if downloads.is_some_and(|count| count >= self.popular_downloads) {
            tags.push(BookmarkTag::Popular);
        }

        tags
    }
}

/// A window too large to represent as a `TimeDelta` matches nothing.
fn within(now: DateTime<Utc>, at: DateTime<Utc>, days: i64) -> bool {
    TimeDelta::try_days(days).is_some_and(|window| now - at <= window)
}
