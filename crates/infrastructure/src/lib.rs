//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_record_gateway;
mod in_memory_record_gateway;
mod tracing_notifier;

pub use http_record_gateway::{HttpGatewayConfig, HttpRecordGateway};
pub use in_memory_record_gateway::{AUDIT_TRAIL_PAGE_SIZE, InMemoryRecordGateway};
pub use tracing_notifier::TracingNotifier;
