use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skmis_core::RecordId;

use crate::{BookmarkThresholds, ManagedRecord, RecordStatus};

/// Public notice posted by the municipal SK federation or a barangay council.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    /// Backend identifier.
    pub id: RecordId,
    /// Headline.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub content: String,
    /// Category such as `general`, `event` or `meeting`.
    #[serde(default)]
    pub category: Option<String>,
    /// Lifecycle status.
    pub status: RecordStatus,
    /// Pinned announcements are listed first by the portal.
    #[serde(default)]
    pub is_pinned: bool,
    /// Posting station, when posted by a barangay council.
    #[serde(default)]
    pub station: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ManagedRecord for Announcement {
    const RESOURCE: &'static str = "announcements";
    const LABEL: &'static str = "announcement";

    fn id(&self) -> RecordId {
        self.id
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn set_status(&mut self, status: RecordStatus) {
        self.status = status;
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.title.as_str()),
            Cow::Borrowed(self.content.as_str()),
        ]
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn facet(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "pinned" => Some(Cow::Borrowed(if self.is_pinned { "true" } else { "false" })),
            _ => None,
        }
    }

    fn station(&self) -> Option<&str> {
        self.station.as_deref()
    }

    fn tags(&self, now: DateTime<Utc>) -> Vec<&'static str> {
        BookmarkThresholds::default()
            .classify(self.created_at, self.updated_at, None, now)
            .iter()
            .map(|tag| tag.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;
    use skmis_core::RecordId;

    use super::Announcement;
    use crate::{ManagedRecord, RecordStatus};

    #[test]
    fn deserializes_backend_payload_with_missing_optionals() {
        let payload = json!({
            "id": 12,
            "title": "Youth Summit 2026",
            "status": "published",
            "created_at": "2026-02-01T08:00:00Z"
        });

        let parsed = serde_json::from_value::<Announcement>(payload);
        let Ok(announcement) = parsed else {
            panic!("announcement payload should deserialize");
        };
        assert_eq!(announcement.id(), RecordId::new(12));
        assert_eq!(announcement.status(), RecordStatus::Published);
        assert!(announcement.content.is_empty());
        assert_eq!(announcement.category(), None);
    }

    #[test]
    fn recently_posted_announcement_is_tagged_new() {
        let payload = json!({
            "id": 3,
            "title": "Clean-up drive",
            "status": "published",
            "created_at": "2026-03-08T08:00:00Z",
            "updated_at": "2026-03-09T08:00:00Z"
        });
        let Ok(announcement) = serde_json::from_value::<Announcement>(payload) else {
            panic!("announcement payload should deserialize");
        };
        let Some(now) = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).single() else {
            panic!("valid timestamp");
        };
        assert_eq!(announcement.tags(now), vec!["new"]);
        assert!(announcement.tags(now + Duration::days(60)).is_empty());
    }

    #[test]
    fn unknown_status_fails_deserialization() {
        let payload = json!({ "id": 1, "title": "x", "status": "hidden" });
        assert!(serde_json::from_value::<Announcement>(payload).is_err());
    }
}
