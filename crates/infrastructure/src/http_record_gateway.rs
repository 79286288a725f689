mod codec;


use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use skmis_application::{
    AuditTrailPage, AuditTrailQuery, FilterState, RecordGateway, RecordStatistics,
};
use skmis_core::{AppError, AppResult, RecordId};
use skmis_domain::{ManagedRecord, RecordAction};
use tracing::{debug, warn};
use url::Url;

use codec::{decode_audit_trail, decode_list, decode_record, decode_statistics, error_for_status};

/// Connection settings for a REST record backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpGatewayConfig {
    /// Backend origin, for example `https://sk.example.gov.ph`.
    pub base_url: String,
    /// Optional bearer token sent on every request.
    pub bearer_token: Option<String>,
    /// Attempts for idempotent reads.
    pub max_attempts: u8,
    /// Linear backoff step between read attempts.
    pub retry_backoff_ms: u64,
}

impl HttpGatewayConfig {
    /// Creates settings with three read attempts and a 250ms backoff step.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            max_attempts: 3,
            retry_backoff_ms: 250,
        }
    }
}

/// REST implementation of [`RecordGateway`] over `/api/<resource>`.
///
/// Reads are retried on transport errors, 5xx and 429. Mutations are sent
/// exactly once. Paginated list responses are followed to the last page so
/// callers always receive the whole collection.
pub struct HttpRecordGateway<R> {
    http_client: reqwest::Client,
    base_url: Url,
    bearer_token: Option<String>,
    max_attempts: u8,
    retry_backoff_ms: u64,
    record: PhantomData<fn() -> R>,
}

impl<R> HttpRecordGateway<R>
where
    R: ManagedRecord + DeserializeOwned,
{
    /// Creates a gateway for the record type's collection.
    pub fn new(http_client: reqwest::Client, config: HttpGatewayConfig) -> AppResult<Self> {
        let base_url = Url::parse(config.base_url.trim()).map_err(|error| {
            AppError::Validation(format!(
                "invalid backend base url '{}': {error}",
                config.base_url
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "backend base url '{}' cannot carry a path",
                config.base_url
            )));
        }

        Ok(Self {
            http_client,
            base_url,
            bearer_token: config
                .bearer_token
                .map(|token| token.trim().to_owned())
                .filter(|token| !token.is_empty()),
            max_attempts: config.max_attempts.max(1),
            retry_backoff_ms: config.retry_backoff_ms.max(50),
            record: PhantomData,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AppError::Internal("backend base url cannot carry a path".to_owned()))?
            .pop_if_empty()
            .push("api")
            .push(R::RESOURCE)
            .extend(segments);
        Ok(url)
    }

    fn list_url(&self, filters: &FilterState, page: u32) -> AppResult<Url> {
        let mut url = self.endpoint(&[])?;
        {
            let mut pairs = url.query_pairs_mut();
            if page > 1 {
                pairs.append_pair("page", &page.to_string());
            }
            let search = filters.search_query.as_str();
            if !search.trim().is_empty() {
                pairs.append_pair("search", search);
            }
            if let Some(category) = filters.category.as_exact() {
                pairs.append_pair("category", category);
            }
            if let Some(status) = filters.status.as_exact() {
                pairs.append_pair("status", status);
            }
            for (facet, value) in filters.active_facets() {
                pairs.append_pair(facet, value);
            }
        }
        drop_empty_query(&mut url);
        Ok(url)
    }

    fn audit_trail_url(&self, query: &AuditTrailQuery) -> AppResult<Url> {
        let mut url = self.endpoint(&["audit-trail"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.max(1).to_string());
            if let Some(action) = query.action.as_deref().filter(|value| !value.is_empty()) {
                pairs.append_pair("action", action);
            }
            if let Some(record_id) = query.record_id {
                pairs.append_pair("record_id", &record_id.to_string());
            }
            if let Some(actor) = query
                .performed_by
                .as_deref()
                .filter(|value| !value.is_empty())
            {
                pairs.append_pair("performed_by", actor);
            }
        }
        Ok(url)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header(reqwest::header::ACCEPT, "application/json");
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch(&self, operation: &str, url: Url) -> AppResult<String> {
        self.send(operation, self.max_attempts, |client| {
            self.authorize(client.get(url.clone()))
        })
        .await
    }

    async fn mutate<F>(&self, operation: &str, build: F) -> AppResult<String>
    where
        F: FnMut(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        self.send(operation, 1, build).await
    }

    async fn send<F>(&self, operation: &str, max_attempts: u8, mut build: F) -> AppResult<String>
    where
        F: FnMut(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let mut attempt = 0_u8;
        let mut last_error: Option<String> = None;

        while attempt < max_attempts {
            attempt = attempt.saturating_add(1);
            let response = build(&self.http_client).send().await;

            match response {
                Ok(response) if response.status().is_success() => {
                    debug!(resource = R::RESOURCE, operation, attempt, "backend request succeeded");
                    return response.text().await.map_err(|error| {
                        AppError::Internal(format!(
                            "failed to read {operation} response body: {error}"
                        ))
                    });
                }
                Ok(response)
                    if attempt < max_attempts
                        && (response.status().is_server_error()
                            || response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS) =>
                {
                    last_error = Some(format!(
                        "transient HTTP status {} for {operation}",
                        response.status()
                    ));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
                    return Err(error_for_status(status.as_u16(), &body));
                }
                Err(error) => {
                    last_error = Some(format!("{operation} transport error: {error}"));
                }
            }

            if attempt < max_attempts {
                warn!(
                    resource = R::RESOURCE,
                    operation,
                    attempt,
                    error = last_error.as_deref().unwrap_or_default(),
                    "retrying backend request"
                );
                let delay = self.retry_backoff_ms.saturating_mul(u64::from(attempt));
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        Err(AppError::Internal(last_error.unwrap_or_else(|| {
            format!("{operation} exhausted retries")
        })))
    }
}

fn drop_empty_query(url: &mut Url) {
    if url.query().is_some_and(str::is_empty) {
        url.set_query(None);
    }
}

#[async_trait]
impl<R> RecordGateway<R> for HttpRecordGateway<R>
where
    R: ManagedRecord + DeserializeOwned,
{
    async fn list_records(&self, filters: &FilterState) -> AppResult<Vec<R>> {
        let body = self.fetch("list records", self.list_url(filters, 1)?).await?;
        let first = decode_list::<R>(&body)?;
        let mut records = first.records;
        let Some(pagination) = first.pagination else {
            return Ok(records);
        };

        let mut page = pagination.current_page;
        while page < pagination.total_pages {
            page += 1;
            let body = self
                .fetch("list records", self.list_url(filters, page)?)
                .await?;
            let next = decode_list::<R>(&body)?;
            if next.records.is_empty() {
                break;
            }
            records.extend(next.records);
        }

        let collected = u64::try_from(records.len()).unwrap_or(u64::MAX);
        if pagination.total_items > 0 && collected != pagination.total_items {
            warn!(
                resource = R::RESOURCE,
                collected,
                expected = pagination.total_items,
                "list pages changed while they were being fetched"
            );
        }
        Ok(records)
    }

    async fn apply_action(&self, action: RecordAction, id: RecordId) -> AppResult<()> {
        let id_segment = id.to_string();
        let operation = format!("{} {} {id}", action.as_str(), R::LABEL);
        match action {
            RecordAction::Archive | RecordAction::Restore => {
                let url = self.endpoint(&[id_segment.as_str(), action.as_str()])?;
                self.mutate(&operation, |client| self.authorize(client.put(url.clone())))
                    .await?;
            }
            RecordAction::Delete => {
                let url = self.endpoint(&[id_segment.as_str()])?;
                self.mutate(&operation, |client| self.authorize(client.delete(url.clone())))
                    .await?;
            }
        }
        Ok(())
    }

    async fn apply_bulk_action(&self, action: RecordAction, ids: &[RecordId]) -> AppResult<()> {
        if ids.is_empty() {
            return Err(AppError::Validation(format!(
                "bulk {} requires at least one id",
                action.as_str()
            )));
        }

        let url = self.endpoint(&[action.bulk_path()])?;
        let payload = serde_json::json!({ "ids": ids });
        let operation = format!("{} {} {} records", action.bulk_path(), ids.len(), R::LABEL);
        self.mutate(&operation, |client| {
            self.authorize(client.post(url.clone())).json(&payload)
        })
        .await?;
        Ok(())
    }

    async fn create_record(&self, payload: &Value) -> AppResult<R> {
        let url = self.endpoint(&[])?;
        let operation = format!("create {}", R::LABEL);
        let body = self
            .mutate(&operation, |client| {
                self.authorize(client.post(url.clone())).json(payload)
            })
            .await?;
        decode_record(&body)
    }

    async fn update_record(&self, id: RecordId, payload: &Value) -> AppResult<R> {
        let id_segment = id.to_string();
        let url = self.endpoint(&[id_segment.as_str()])?;
        let operation = format!("update {} {id}", R::LABEL);
        let body = self
            .mutate(&operation, |client| {
                self.authorize(client.put(url.clone())).json(payload)
            })
            .await?;
        decode_record(&body)
    }

    async fn statistics(&self) -> AppResult<RecordStatistics> {
        let body = self
            .fetch("load statistics", self.endpoint(&["statistics"])?)
            .await?;
        decode_statistics(&body)
    }

    async fn audit_trail(&self, query: &AuditTrailQuery) -> AppResult<AuditTrailPage> {
        let body = self
            .fetch("load audit trail", self.audit_trail_url(query)?)
            .await?;
        decode_audit_trail(&body)
    }
}
