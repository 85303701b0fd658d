//! Tower middleware applied to every request.
//!
//! - `RequestIdLayer`: generates or propagates X-Request-Id
//! - `LoggingLayer`: structured request logging

mod logging;
mod request_id;

pub use logging::{LoggingLayer, LoggingMiddleware};
pub use request_id::{REQUEST_ID_HEADER, RequestIdLayer, RequestIdMiddleware};
