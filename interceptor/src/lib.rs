//! # interceptor
//!
//! Wraps the outbound network call so every request passes through one
//! decision point: calls to known AI-provider endpoints consume the pending
//! attachment flag and get the stored document spliced into their payload in
//! the provider's wire format, exactly once; everything else (and every
//! failure) delegates to the underlying transport unchanged. Attachment is
//! best-effort; message delivery is never sacrificed for it.

mod http_transport;
mod interceptor;
mod providers;

pub use http_transport::HttpTransport;
pub use interceptor::RequestInterceptor;
pub use providers::Provider;
