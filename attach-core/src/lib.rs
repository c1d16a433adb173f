//! # attach-core
//!
//! Core types and traits for the PDF attachment pipeline: [`Transport`], [`ContextProvider`],
//! [`UiNotifier`], request/response types, the error taxonomy, and tracing initialization.
//! Storage-agnostic; used by storage, interceptor, and pipeline.

pub mod error;
pub mod logger;
pub mod types;

pub use error::{AttachError, CaptureError, Result};
pub use logger::init_tracing;
pub use types::{
    ChatContext, ContextProvider, OutboundRequest, Transport, TransportResponse, UiNotifier,
};
