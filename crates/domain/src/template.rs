use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skmis_core::RecordId;

use crate::{BookmarkThresholds, ManagedRecord, RecordStatus};

/// Downloadable document template (forms, resolutions, reports).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTemplate {
    /// Backend identifier.
    pub id: RecordId,
    /// Template title.
    pub title: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Template category such as `resolution` or `report`.
    #[serde(default)]
    pub category: Option<String>,
    /// File type such as `docx` or `pdf`.
    #[serde(default)]
    pub file_type: Option<String>,
    /// Number of downloads so far.
    #[serde(default)]
    pub downloads: u32,
    /// Lifecycle status.
    pub status: RecordStatus,
    /// Upload timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last replacement timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ManagedRecord for DocumentTemplate {
    const RESOURCE: &'static str = "templates";
    const LABEL: &'static str = "template";

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
            Cow::Borrowed(self.description.as_str()),
        ]
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn facet(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "file_type" => self.file_type.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }

    fn tags(&self, now: DateTime<Utc>) -> Vec<&'static str> {
        BookmarkThresholds::default()
            .classify(self.created_at, self.updated_at, Some(self.downloads), now)
            .iter()
            .map(|tag| tag.as_str())
            .collect()
    }
}
