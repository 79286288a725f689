use std::borrow::Cow;

use chrono::{DateTime, Utc};
use skmis_core::RecordId;

use crate::RecordStatus;

/// A record kept in one of the administrative collections.
///
/// Announcements, awards, directory entries, youth profiles, SK officials and
/// document templates are interchangeable instantiations of this shape: the
/// list engine only needs an identifier, a status, searchable text and
/// categorical facets.
pub trait ManagedRecord: Clone + Send + Sync + 'static {
    /// REST collection path segment, as in `/api/<resource>`.
    const RESOURCE: &'static str;

    /// Singular human label used in confirmation and notification text.
    const LABEL: &'static str;

    /// Status a restored record returns to.
    const LIVE_STATUS: RecordStatus = RecordStatus::Published;

    /// Status an archived record moves to.
    const ARCHIVED_STATUS: RecordStatus = RecordStatus::Archived;

    /// Returns the backend-assigned identifier.
    fn id(&self) -> RecordId;

    /// Returns the current lifecycle status.
    fn status(&self) -> RecordStatus;

    /// Overwrites the lifecycle status.
    fn set_status(&mut self, status: RecordStatus);

    /// Returns the text fields matched by the search box.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Returns the primary categorical value, if the collection has one.
    fn category(&self) -> Option<&str> {
        None
    }

    /// Returns a named domain-specific facet value.
    fn facet(&self, _name: &str) -> Option<Cow<'_, str>> {
        None
    }

    /// Returns the barangay station owning the record, if scoped.
    fn station(&self) -> Option<&str> {
        None
    }

    /// Returns derived presentation tags as of `now`.
    fn tags(&self, _now: DateTime<Utc>) -> Vec<&'static str> {
        Vec::new()
    }
}
