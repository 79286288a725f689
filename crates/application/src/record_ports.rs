use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use skmis_core::{AppResult, RecordId};
use skmis_domain::{ManagedRecord, RecordAction};

use crate::FilterState;

/// Aggregate counts shown in the list sidebar, keyed by the backend's labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStatistics {
    /// Count per label, for example `total`, `published`, `archived`.
    pub counts: BTreeMap<String, u64>,
}

impl RecordStatistics {
    /// Returns the count for `label`, zero when absent.
    #[must_use]
    pub fn count(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }
}

/// Query parameters for audit trail listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTrailQuery {
    /// One-based page number.
    pub page: u32,
    /// Optional action filter, such as `archive`.
    pub action: Option<String>,
    /// Optional record filter.
    pub record_id: Option<RecordId>,
    /// Optional actor filter.
    pub performed_by: Option<String>,
}

impl Default for AuditTrailQuery {
    fn default() -> Self {
        Self {
            page: 1,
            action: None,
            record_id: None,
            performed_by: None,
        }
    }
}

/// One audit trail entry, passed through unformatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTrailEntry {
    /// Stable entry identifier.
    pub entry_id: String,
    /// Action identifier.
    pub action: String,
    /// Affected record, if any.
    pub record_id: Option<RecordId>,
    /// Actor who performed the action.
    pub performed_by: String,
    /// Optional free-form detail.
    pub details: Option<String>,
    /// Event timestamp in RFC3339.
    pub created_at: String,
}

/// Pagination metadata attached to enveloped responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationMeta {
    /// One-based page number of the returned rows.
    pub current_page: u32,
    /// Total pages available.
    pub total_pages: u32,
    /// Total rows available.
    pub total_items: u64,
}

/// One page of audit trail entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTrailPage {
    /// Entries on this page, newest first.
    pub entries: Vec<AuditTrailEntry>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Port for one REST record collection.
#[async_trait]
pub trait RecordGateway<R: ManagedRecord>: Send + Sync {
    /// Lists records, narrowed server-side by `filters` where supported.
    async fn list_records(&self, filters: &FilterState) -> AppResult<Vec<R>>;

    /// Applies a lifecycle transition to one record.
    async fn apply_action(&self, action: RecordAction, id: RecordId) -> AppResult<()>;

    /// Applies a lifecycle transition to many records in one batched call.
    async fn apply_bulk_action(&self, action: RecordAction, ids: &[RecordId]) -> AppResult<()>;

    /// Creates a record from a form payload.
    async fn create_record(&self, payload: &Value) -> AppResult<R>;

    /// Updates a record from a form payload.
    async fn update_record(&self, id: RecordId, payload: &Value) -> AppResult<R>;

    /// Returns aggregate counts for the collection.
    async fn statistics(&self) -> AppResult<RecordStatistics>;

    /// Returns one page of the collection's audit trail.
    async fn audit_trail(&self, query: &AuditTrailQuery) -> AppResult<AuditTrailPage>;
}

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Completed action.
    Success,
    /// Neutral information.
    Info,
    /// Failed action.
    Error,
}

/// Transient toast shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub message: String,
    /// How long the toast stays visible.
    pub display_for: Duration,
}

/// Port for surfacing notifications to the operator.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Shows one notification.
    async fn notify(&self, notification: Notification);
}
