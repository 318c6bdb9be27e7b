pub mod tracing_middleware;

pub use tracing_middleware::{TracingMiddleware, REQUEST_ID_HEADER};
