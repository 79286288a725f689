use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use skmis_application::{AuditTrailEntry, AuditTrailPage, PaginationMeta, RecordStatistics};
use skmis_core::{AppError, AppResult, RecordId};

/// List responses arrive either bare or wrapped in a `{data, pagination}` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Envelope {
        data: Vec<T>,
        #[serde(default)]
        pagination: Option<PaginationBody>,
    },
    Flat(Vec<T>),
}

/// One decoded list response; `pagination` is present only for enveloped bodies.
#[derive(Debug)]
pub(super) struct ListPage<T> {
    pub(super) records: Vec<T>,
    pub(super) pagination: Option<PaginationMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordBody<T> {
    Envelope { data: T },
    Bare(T),
}

#[derive(Debug, Deserialize)]
struct PaginationBody {
    #[serde(default = "first_page")]
    current_page: u32,
    #[serde(default, alias = "last_page")]
    total_pages: u32,
    #[serde(default, alias = "total")]
    total_items: u64,
}

fn first_page() -> u32 {
    1
}

impl From<PaginationBody> for PaginationMeta {
    fn from(body: PaginationBody) -> Self {
        Self {
            current_page: body.current_page.max(1),
            total_pages: body.total_pages.max(1),
            total_items: body.total_items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuditTrailEntryBody {
    id: Value,
    action: String,
    #[serde(default)]
    record_id: Option<RecordId>,
    #[serde(default, alias = "user_name", alias = "performed_by_name")]
    performed_by: Option<String>,
    #[serde(default)]
    details: Option<Value>,
    #[serde(default)]
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct AuditTrailBody {
    data: Vec<AuditTrailEntryBody>,
    #[serde(default)]
    pagination: Option<PaginationBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: BTreeMap<String, Value>,
}

pub(super) fn decode_list<T: DeserializeOwned>(body: &str) -> AppResult<ListPage<T>> {
    match serde_json::from_str::<ListBody<T>>(body) {
        Ok(ListBody::Envelope { data, pagination }) => Ok(ListPage {
            records: data,
            pagination: pagination.map(PaginationMeta::from),
        }),
        Ok(ListBody::Flat(data)) => Ok(ListPage {
            records: data,
            pagination: None,
        }),
        Err(error) => Err(AppError::Internal(format!(
            "failed to parse list response body: {error}"
        ))),
    }
}

pub(super) fn decode_record<T: DeserializeOwned>(body: &str) -> AppResult<T> {
    match serde_json::from_str::<RecordBody<T>>(body) {
        Ok(RecordBody::Envelope { data }) | Ok(RecordBody::Bare(data)) => Ok(data),
        Err(error) => Err(AppError::Internal(format!(
            "failed to parse record response body: {error}"
        ))),
    }
}

/// Collects numeric counters, unwrapping a `data` envelope when present.
pub(super) fn decode_statistics(body: &str) -> AppResult<RecordStatistics> {
    let value: Value = serde_json::from_str(body).map_err(|error| {
        AppError::Internal(format!("failed to parse statistics response body: {error}"))
    })?;
    let object = value
        .get("data")
        .filter(|data| data.is_object())
        .unwrap_or(&value)
        .as_object()
        .ok_or_else(|| {
            AppError::Internal("statistics response body must be a JSON object".to_owned())
        })?;

    Ok(RecordStatistics {
        counts: object
            .iter()
            .filter_map(|(label, count)| count.as_u64().map(|count| (label.clone(), count)))
            .collect(),
    })
}

pub(super) fn decode_audit_trail(body: &str) -> AppResult<AuditTrailPage> {
    let parsed: AuditTrailBody = serde_json::from_str(body).map_err(|error| {
        AppError::Internal(format!("failed to parse audit trail response body: {error}"))
    })?;

    let entry_count = u64::try_from(parsed.data.len()).unwrap_or(u64::MAX);
    let pagination = match parsed.pagination {
        Some(body) => PaginationMeta::from(body),
        None => PaginationMeta {
            current_page: 1,
            total_pages: 1,
            total_items: entry_count,
        },
    };

    Ok(AuditTrailPage {
        entries: parsed
            .data
            .into_iter()
            .map(|entry| AuditTrailEntry {
                entry_id: value_to_text(entry.id),
                action: entry.action,
                record_id: entry.record_id,
                performed_by: entry.performed_by.unwrap_or_default(),
                details: entry.details.filter(|value| !value.is_null()).map(value_to_text),
                created_at: entry.created_at,
            })
            .collect(),
        pagination,
    })
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Maps a non-success response onto the shared error categories.
///
/// Field errors of rejected submissions are flattened into one message in
/// field-name order.
pub(super) fn error_for_status(status: u16, body: &str) -> AppError {
    let parsed = serde_json::from_str::<ErrorBody>(body).unwrap_or_default();
    let server_message = parsed
        .message
        .as_deref()
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_owned);

    match status {
        400 | 422 => {
            let field_messages = flatten_field_errors(&parsed.errors);
            let message = if field_messages.is_empty() {
                server_message.unwrap_or_else(|| "the submitted data was rejected".to_owned())
            } else {
                field_messages.join(" ")
            };
            AppError::Validation(message)
        }
        401 => AppError::Unauthorized(
            server_message.unwrap_or_else(|| "authentication is required".to_owned()),
        ),
        403 => AppError::Forbidden(
            server_message.unwrap_or_else(|| "this action is not permitted".to_owned()),
        ),
        404 => AppError::NotFound(
            server_message.unwrap_or_else(|| "the requested record was not found".to_owned()),
        ),
        409 => AppError::Conflict(
            server_message.unwrap_or_else(|| "the record was changed by someone else".to_owned()),
        ),
        _ => AppError::Internal(format!(
            "backend returned status {status}: {}",
            server_message.unwrap_or_else(|| body.to_owned())
        )),
    }
}

fn flatten_field_errors(errors: &BTreeMap<String, Value>) -> Vec<String> {
    errors
        .values()
        .flat_map(|value| match value {
            Value::String(message) => vec![message.clone()],
            Value::Array(messages) => messages
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            _ => Vec::new(),
        })
        .collect()
}
