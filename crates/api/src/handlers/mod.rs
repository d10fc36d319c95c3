//! HTTP handlers: thin adapters mapping requests to engine calls and
//! engine errors to status codes.

pub mod holds;
pub mod orders;
pub mod payments;
pub mod products;

use surgecart_core::types::Timestamp;

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS` in UTC (wire compatibility).
pub(crate) fn format_timestamp(ts: Timestamp) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
