use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use skmis_core::RecordId;

use crate::{ManagedRecord, RecordStatus};

/// Recognition granted to a youth, organization or council.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    /// Backend identifier.
    pub id: RecordId,
    /// Award title.
    pub title: String,
    /// Citation text.
    #[serde(default)]
    pub description: String,
    /// Recipient name.
    #[serde(default)]
    pub recipient: String,
    /// Award category such as `leadership` or `sports`.
    #[serde(default)]
    pub category: Option<String>,
    /// Date the award was conferred.
    #[serde(default)]
    pub awarded_on: Option<NaiveDate>,
    /// Barangay station that nominated the recipient.
    #[serde(default)]
    pub station: Option<String>,
    /// Lifecycle status.
    pub status: RecordStatus,
}

impl ManagedRecord for Award {
    const RESOURCE: &'static str = "awards";
    const LABEL: &'static str = "award";

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
            Cow::Borrowed(self.recipient.as_str()),
        ]
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn facet(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "year" => self
                .awarded_on
                .map(|date| Cow::Owned(date.format("%Y").to_string())),
            _ => None,
        }
    }

    fn station(&self) -> Option<&str> {
        self.station.as_deref()
    }
}
