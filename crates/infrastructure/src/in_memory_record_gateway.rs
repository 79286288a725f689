
use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use skmis_application::{
    AuditTrailEntry, AuditTrailPage, AuditTrailQuery, FilterState, PaginationMeta,
    RecordGateway, RecordStatistics, apply_filters, paginate,
};
use skmis_core::{AppError, AppResult, RecordId};
use skmis_domain::{ManagedRecord, RecordAction};
use tokio::sync::RwLock;

/// Audit trail rows per page.
pub const AUDIT_TRAIL_PAGE_SIZE: usize = 10;

/// In-memory record collection for tests and offline demos.
///
/// Honours the same transition rules as the REST backend and keeps its own
/// audit trail.
#[derive(Debug)]
pub struct InMemoryRecordGateway<R> {
    records: RwLock<Vec<R>>,
    audit_trail: RwLock<Vec<AuditTrailEntry>>,
    actor: String,
}

impl<R> Default for InMemoryRecordGateway<R> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            audit_trail: RwLock::new(Vec::new()),
            actor: "system".to_owned(),
        }
    }
}

impl<R> InMemoryRecordGateway<R>
where
    R: ManagedRecord + Serialize + DeserializeOwned,
{
    /// Creates a gateway seeded with `records`, in backend order.
    #[must_use]
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(records),
            ..Self::default()
        }
    }

    /// Sets the actor name written to audit entries.
    #[must_use]
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// Returns a copy of the stored records.
    pub async fn snapshot(&self) -> Vec<R> {
        self.records.read().await.clone()
    }

    async fn append_audit(&self, action: &str, record_id: RecordId, details: Option<String>) {
        let mut audit_trail = self.audit_trail.write().await;
        let entry_id = audit_trail.len().saturating_add(1).to_string();
        audit_trail.push(AuditTrailEntry {
            entry_id,
            action: action.to_owned(),
            record_id: Some(record_id),
            performed_by: self.actor.clone(),
            details,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        });
    }
}

fn transition<R: ManagedRecord>(records: &mut Vec<R>, action: RecordAction, id: RecordId) {
    match action {
        RecordAction::Archive => {
            if let Some(record) = records.iter_mut().find(|record| record.id() == id) {
                record.set_status(R::ARCHIVED_STATUS);
            }
        }
        RecordAction::Restore => {
            if let Some(record) = records.iter_mut().find(|record| record.id() == id) {
                record.set_status(R::LIVE_STATUS);
            }
        }
        RecordAction::Delete => records.retain(|record| record.id() != id),
    }
}

fn ensure_eligible<R: ManagedRecord>(
    records: &[R],
    action: RecordAction,
    id: RecordId,
) -> AppResult<()> {
    let record = records
        .iter()
        .find(|record| record.id() == id)
        .ok_or_else(|| AppError::NotFound(format!("{} {id} does not exist", R::LABEL)))?;

    if action.is_eligible(record.status()) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} {id} cannot be {} while {}",
            R::LABEL,
            action.past_tense(),
            record.status().as_str()
        )))
    }
}

fn payload_object(payload: &Value) -> AppResult<Map<String, Value>> {
    payload
        .as_object()
        .cloned()
        .ok_or_else(|| AppError::Validation("form payload must be a JSON object".to_owned()))
}

fn decode_payload<R: ManagedRecord + DeserializeOwned>(object: Map<String, Value>) -> AppResult<R> {
    serde_json::from_value(Value::Object(object))
        .map_err(|error| AppError::Validation(format!("invalid {} payload: {error}", R::LABEL)))
}

#[async_trait]
impl<R> RecordGateway<R> for InMemoryRecordGateway<R>
where
    R: ManagedRecord + Serialize + DeserializeOwned,
{
    async fn list_records(&self, filters: &FilterState) -> AppResult<Vec<R>> {
        let records = self.records.read().await;
        Ok(apply_filters(&records, filters)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn apply_action(&self, action: RecordAction, id: RecordId) -> AppResult<()> {
        {
            let mut records = self.records.write().await;
            ensure_eligible(&records, action, id)?;
            transition(&mut records, action, id);
        }
        self.append_audit(action.as_str(), id, None).await;
        Ok(())
    }

    async fn apply_bulk_action(&self, action: RecordAction, ids: &[RecordId]) -> AppResult<()> {
        let ids: BTreeSet<RecordId> = ids.iter().copied().collect();
        if ids.is_empty() {
            return Err(AppError::Validation(format!(
                "bulk {} requires at least one id",
                action.as_str()
            )));
        }

        {
            let mut records = self.records.write().await;
            for id in &ids {
                ensure_eligible(&records, action, *id)?;
            }
            for id in &ids {
                transition(&mut records, action, *id);
            }
        }

        for id in ids {
            self.append_audit(action.as_str(), id, Some(action.bulk_path().to_owned()))
                .await;
        }
        Ok(())
    }

    async fn create_record(&self, payload: &Value) -> AppResult<R> {
        let mut object = payload_object(payload)?;
        let record = {
            let mut records = self.records.write().await;
            let next_id = records
                .iter()
                .map(|record| record.id().value())
                .max()
                .unwrap_or(0)
                .saturating_add(1);
            object.insert("id".to_owned(), Value::from(next_id));
            object
                .entry("status")
                .or_insert_with(|| Value::from(R::LIVE_STATUS.as_str()));

            let record: R = decode_payload(object)?;
            records.push(record.clone());
            record
        };

        self.append_audit("create", record.id(), None).await;
        Ok(record)
    }

    async fn update_record(&self, id: RecordId, payload: &Value) -> AppResult<R> {
        let changes = payload_object(payload)?;
        let record = {
            let mut records = self.records.write().await;
            let stored = records
                .iter_mut()
                .find(|record| record.id() == id)
                .ok_or_else(|| AppError::NotFound(format!("{} {id} does not exist", R::LABEL)))?;

            let mut object = match serde_json::to_value(&*stored) {
                Ok(Value::Object(object)) => object,
                Ok(_) => {
                    return Err(AppError::Internal(format!(
                        "{} {id} does not serialize to an object",
                        R::LABEL
                    )));
                }
                Err(error) => {
                    return Err(AppError::Internal(format!(
                        "failed to serialize {} {id}: {error}",
                        R::LABEL
                    )));
                }
            };
            for (field, value) in changes {
                if field != "id" {
                    object.insert(field, value);
                }
            }

            let updated: R = decode_payload(object)?;
            *stored = updated.clone();
            updated
        };

        self.append_audit("update", id, None).await;
        Ok(record)
    }

    async fn statistics(&self) -> AppResult<RecordStatistics> {
        let records = self.records.read().await;
        let mut statistics = RecordStatistics::default();
        statistics
            .counts
            .insert("total".to_owned(), u64::try_from(records.len()).unwrap_or(u64::MAX));
        for record in records.iter() {
            *statistics
                .counts
                .entry(record.status().as_str().to_owned())
                .or_insert(0) += 1;
        }
        Ok(statistics)
    }

    async fn audit_trail(&self, query: &AuditTrailQuery) -> AppResult<AuditTrailPage> {
        let audit_trail = self.audit_trail.read().await;
        let matching: Vec<&AuditTrailEntry> = audit_trail
            .iter()
            .rev()
            .filter(|entry| {
                query
                    .action
                    .as_deref()
                    .is_none_or(|action| entry.action == action)
                    && query
                        .record_id
                        .is_none_or(|record_id| entry.record_id == Some(record_id))
                    && query
                        .performed_by
                        .as_deref()
                        .is_none_or(|actor| entry.performed_by.eq_ignore_ascii_case(actor))
            })
            .collect();

        let requested_page = usize::try_from(query.page).unwrap_or(usize::MAX);
        let slice = paginate(&matching, requested_page, AUDIT_TRAIL_PAGE_SIZE);

        Ok(AuditTrailPage {
            entries: slice.items.iter().map(|entry| (*entry).clone()).collect(),
            pagination: PaginationMeta {
                current_page: u32::try_from(slice.page).unwrap_or(u32::MAX),
                total_pages: u32::try_from(slice.total_pages).unwrap_or(u32::MAX),
                total_items: u64::try_from(matching.len()).unwrap_or(u64::MAX),
            },
        })
    }
}
