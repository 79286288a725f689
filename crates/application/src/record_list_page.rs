mod actions;


use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use skmis_core::{AppError, AppResult, CurrentUser, RecordId};
use skmis_domain::ManagedRecord;
use tracing::{debug, warn};

use crate::{
    ActionDispatcher, BulkEligibility, CollectionStore, FilterState, FilterValue, Notification,
    NotificationLevel, Notifier, PageButton, PaginationState, RecordGateway, RecordStatistics,
    SelectAllState, SelectionScope, SelectionSet, apply_filters, page_buttons, paginate,
};

/// Default toast duration.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

/// Behaviour knobs of one list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPageConfig {
    /// Rows per page.
    pub items_per_page: usize,
    /// Selection policy.
    pub selection_scope: SelectionScope,
    /// Toast duration.
    pub notification_duration: Duration,
    /// Forward the active filters to the list endpoint on refresh.
    ///
    /// When false the full collection is fetched and filtering is purely
    /// client-side, so filter changes never need a re-fetch. When true a
    /// filter change marks the page as needing a refresh.
    pub server_filtering: bool,
}

impl Default for ListPageConfig {
    fn default() -> Self {
        Self {
            items_per_page: 10,
            selection_scope: SelectionScope::Page,
            notification_duration: DEFAULT_NOTIFICATION_DURATION,
            server_filtering: false,
        }
    }
}

/// Rendered state of the current page.
#[derive(Debug)]
pub struct PageView<'a, R> {
    /// Records on the current page.
    pub records: Vec<&'a R>,
    /// One-based current page.
    pub current_page: usize,
    /// Total pages for the filtered view.
    pub total_pages: usize,
    /// Records matching the active filters.
    pub total_items: usize,
    /// Windowed pagination buttons.
    pub buttons: Vec<PageButton>,
    /// Select-all checkbox state.
    pub select_all: SelectAllState,
    /// Filters changed since the last server-filtered fetch, so the rows
    /// may not reflect them until [`RecordListPage::refresh_if_stale`] runs.
    pub stale: bool,
}

/// Create or update form payload.
#[derive(Debug, Clone, PartialEq)]
pub enum FormSubmission {
    /// Create a new record.
    Create(Value),
    /// Update an existing record.
    Update {
        /// Record to update.
        id: RecordId,
        /// Changed fields.
        payload: Value,
    },
}

/// One administrative list screen: fetch, filter, paginate, select and act.
pub struct RecordListPage<R: ManagedRecord> {
    gateway: Arc<dyn RecordGateway<R>>,
    notifier: Arc<dyn Notifier>,
    current_user: CurrentUser,
    config: ListPageConfig,
    store: CollectionStore<R>,
    statistics: Option<RecordStatistics>,
    is_loading: bool,
    needs_refresh: bool,
    filters: FilterState,
    pagination: PaginationState,
    selection: SelectionSet,
    dispatcher: ActionDispatcher<R>,
}

impl<R: ManagedRecord> RecordListPage<R> {
    /// Creates an empty page; call [`Self::refresh`] to load records.
    pub fn new(
        gateway: Arc<dyn RecordGateway<R>>,
        notifier: Arc<dyn Notifier>,
        current_user: CurrentUser,
        config: ListPageConfig,
    ) -> AppResult<Self> {
        let pagination = PaginationState::new(config.items_per_page)?;
        let dispatcher = ActionDispatcher::new(
            Arc::clone(&gateway),
            Arc::clone(&notifier),
            config.notification_duration,
        );

        Ok(Self {
            gateway,
            notifier,
            current_user,
            config,
            store: CollectionStore::new(),
            statistics: None,
            is_loading: false,
            needs_refresh: false,
            filters: FilterState::default(),
            pagination,
            selection: SelectionSet::new(),
            dispatcher,
        })
    }

    /// Returns the operator capability.
    #[must_use]
    pub fn current_user(&self) -> &CurrentUser {
        &self.current_user
    }

    /// Returns the unfiltered collection.
    #[must_use]
    pub fn records(&self) -> &[R] {
        self.store.records()
    }

    /// Returns the active filters.
    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Returns the pagination state.
    #[must_use]
    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    /// Returns the last loaded statistics.
    #[must_use]
    pub fn statistics(&self) -> Option<&RecordStatistics> {
        self.statistics.as_ref()
    }

    /// Returns whether a list fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Returns whether the store predates the active filters.
    ///
    /// Only server-filtered pages go stale; client-side filtering always
    /// works on the full collection.
    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    /// Returns the current selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Re-fetches the collection and its statistics.
    ///
    /// A successful fetch replaces the store, clears the selection and
    /// re-clamps the current page. On failure the previous records stay and
    /// an error notification is shown.
    pub async fn refresh(&mut self) -> AppResult<()> {
        let query = if self.config.server_filtering {
            self.filters.clone()
        } else {
            FilterState::default()
        };

        self.is_loading = true;
        let result = self.gateway.list_records(&query).await;
        self.is_loading = false;

        match result {
            Ok(records) => {
                debug!(
                    resource = R::RESOURCE,
                    record_count = records.len(),
                    "records loaded"
                );
                self.store.replace(records);
                self.needs_refresh = false;
                self.selection.select_none();
                self.clamp_page();
            }
            Err(error) => {
                warn!(resource = R::RESOURCE, error = %error, "failed to load records");
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to load {} records.", R::LABEL),
                )
                .await;
                return Err(error);
            }
        }

        match self.gateway.statistics().await {
            Ok(statistics) => self.statistics = Some(statistics),
            Err(error) => {
                warn!(resource = R::RESOURCE, error = %error, "failed to load statistics");
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to load {} statistics.", R::LABEL),
                )
                .await;
            }
        }

        Ok(())
    }

    /// Re-fetches only when filter changes have outdated a server-filtered
    /// store; returns whether a fetch happened.
    pub async fn refresh_if_stale(&mut self) -> AppResult<bool> {
        if !self.needs_refresh {
            return Ok(false);
        }

        self.refresh().await?;
        Ok(true)
    }

    /// Returns records passing the active filters, in backend order.
    #[must_use]
    pub fn filtered_records(&self) -> Vec<&R> {
        apply_filters(self.store.records(), &self.filters)
    }

    /// Returns the current page of the filtered view.
    #[must_use]
    pub fn visible_page(&self) -> PageView<'_, R> {
        let filtered = self.filtered_records();
        let total_items = filtered.len();
        let slice = paginate(
            &filtered,
            self.pagination.current_page(),
            self.pagination.items_per_page(),
        );
        let records = slice.items.to_vec();
        let page_ids: Vec<RecordId> = records.iter().map(|record| record.id()).collect();
        let visible = match self.config.selection_scope {
            SelectionScope::Page => page_ids,
            SelectionScope::Filtered => filtered.iter().map(|record| record.id()).collect(),
        };

        PageView {
            current_page: slice.page,
            total_pages: slice.total_pages,
            total_items,
            buttons: page_buttons(slice.page, slice.total_pages),
            select_all: self.selection.state(&visible),
            stale: self.needs_refresh,
            records,
        }
    }

    /// Returns the ids select-all operates on under the configured scope.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<RecordId> {
        let filtered = self.filtered_records();
        match self.config.selection_scope {
            SelectionScope::Filtered => filtered.iter().map(|record| record.id()).collect(),
            SelectionScope::Page => paginate(
                &filtered,
                self.pagination.current_page(),
                self.pagination.items_per_page(),
            )
            .items
            .iter()
            .map(|record| record.id())
            .collect(),
        }
    }

    /// Sets the search text.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filters.search_query = query.into();
        self.on_filters_changed();
    }

    /// Sets the category filter.
    pub fn set_category_filter(&mut self, value: FilterValue) {
        self.filters.category = value;
        self.on_filters_changed();
    }

    /// Sets the status filter.
    pub fn set_status_filter(&mut self, value: FilterValue) {
        self.filters.status = value;
        self.on_filters_changed();
    }

    /// Sets a domain-specific facet filter.
    pub fn set_facet_filter(&mut self, name: impl Into<String>, value: FilterValue) {
        self.filters.facets.insert(name.into(), value);
        self.on_filters_changed();
    }

    /// Resets filters, pagination and selection, as on a tab switch.
    pub fn reset_view(&mut self) {
        self.filters = FilterState::default();
        self.on_filters_changed();
    }

    /// Changes the page size, clamping the current page.
    pub fn set_items_per_page(&mut self, items_per_page: usize) -> AppResult<()> {
        let total_items = self.filtered_records().len();
        self.pagination
            .set_items_per_page(items_per_page, total_items)?;
        self.evict_hidden_selection();
        Ok(())
    }

    /// Navigates to `page`, clamped into range; returns the resulting page.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        let total_items = self.filtered_records().len();
        let page = self.pagination.go_to(page, total_items);
        self.evict_hidden_selection();
        page
    }

    /// Toggles one visible record; returns the new select-all state.
    pub fn toggle_selection(&mut self, id: RecordId) -> AppResult<SelectAllState> {
        let visible = self.visible_ids();
        if !visible.contains(&id) {
            return Err(AppError::Validation(format!(
                "{} {id} is not in the current view",
                R::LABEL
            )));
        }

        self.selection.toggle(id);
        Ok(self.selection.state(&visible))
    }

    /// Select-all checkbox handler; returns the new select-all state.
    pub fn toggle_select_all(&mut self) -> SelectAllState {
        let visible = self.visible_ids();
        self.selection.toggle_all(&visible);
        self.selection.state(&visible)
    }

    /// Clears the selection.
    pub fn select_none(&mut self) {
        self.selection.select_none();
    }

    /// Returns the select-all checkbox state.
    #[must_use]
    pub fn select_all_state(&self) -> SelectAllState {
        self.selection.state(&self.visible_ids())
    }

    /// Partitions the selection by live status for the bulk action bar.
    #[must_use]
    pub fn bulk_eligibility(&self) -> BulkEligibility {
        BulkEligibility::partition(&self.selection, self.store.records())
    }

    fn on_filters_changed(&mut self) {
        self.pagination.reset();
        self.selection.select_none();
        if self.config.server_filtering {
            self.needs_refresh = true;
        }
    }

    fn clamp_page(&mut self) {
        let total_items = self.filtered_records().len();
        self.pagination.clamp(total_items);
    }

    fn evict_hidden_selection(&mut self) {
        let visible = self.visible_ids();
        let evicted = self.selection.retain_visible(&visible);
        if evicted > 0 {
            debug!(resource = R::RESOURCE, evicted, "evicted hidden selections");
        }
    }

    async fn notify(&self, level: NotificationLevel, message: String) {
        self.notifier
            .notify(Notification {
                level,
                message,
                display_for: self.config.notification_duration,
            })
            .await;
    }
}
