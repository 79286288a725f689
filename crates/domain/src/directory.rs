use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use skmis_core::RecordId;

use crate::{ManagedRecord, RecordStatus};

/// Contact listed in the public SK directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Backend identifier.
    pub id: RecordId,
    /// Contact name.
    pub name: String,
    /// Position or office held.
    #[serde(default)]
    pub role: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Directory section such as `sk_federation` or `barangay_sk`.
    #[serde(default)]
    pub category: Option<String>,
    /// Barangay station.
    #[serde(default)]
    pub station: Option<String>,
    /// Lifecycle status.
    pub status: RecordStatus,
}

impl ManagedRecord for DirectoryEntry {
    const RESOURCE: &'static str = "directory";
    const LABEL: &'static str = "directory entry";

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
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.role.as_str()),
            Cow::Borrowed(self.email.as_str()),
            Cow::Borrowed(self.phone.as_str()),
        ]
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn station(&self) -> Option<&str> {
        self.station.as_deref()
    }
}
