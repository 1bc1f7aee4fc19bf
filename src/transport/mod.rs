//! HTTP transport for the knowledge-graph backend.
//!
//! Every call resolves with the unwrapped envelope payload or fails with a
//! [`TransportError`](crate::error::TransportError). Failures are shown to the
//! user through a [`Notifier`] before they propagate, except envelope errors
//! whose code is in [`SILENT_ERROR_CODES`].

mod client;
mod envelope;
mod notify;

pub use client::HttpTransport;
pub use envelope::{
    http_error_message, unwrap_envelope, ApiFailure, Envelope, ErrorBody, SILENT_ERROR_CODES,
};
pub use notify::{Notification, NotificationQueue, Notifier, TracingNotifier};
