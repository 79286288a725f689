//! List-management services and ports shared by every administrative screen.

#![forbid(unsafe_code)]

mod action_dispatcher;
mod collection_store;
mod filter_pipeline;
mod paginator;
mod record_list_page;
mod record_ports;
mod selection_tracker;

pub use action_dispatcher::{
    ActionDispatcher, ActionTarget, ConfirmAction, ConfirmTone, DispatchOutcome, DispatcherState,
};
pub use collection_store::CollectionStore;
pub use filter_pipeline::{ALL_SENTINEL, FilterState, FilterValue, apply_filters, matches_filters};
pub use paginator::{
    PAGE_BUTTON_WINDOW, PageButton, PageSlice, PaginationState, page_buttons, paginate,
    total_pages,
};
pub use record_list_page::{
    DEFAULT_NOTIFICATION_DURATION, FormSubmission, ListPageConfig, PageView, RecordListPage,
};
pub use record_ports::{
    AuditTrailEntry, AuditTrailPage, AuditTrailQuery, Notification, NotificationLevel, Notifier,
    PaginationMeta, RecordGateway, RecordStatistics,
};
pub use selection_tracker::{BulkEligibility, SelectAllState, SelectionScope, SelectionSet};
