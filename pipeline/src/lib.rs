//! # pipeline
//!
//! The attachment lifecycle: capture a user-selected file, validate it is a
//! PDF, persist it, flag it for the next outbound provider call, and notify
//! the UI collaborator. Also exposes removal of a pending attachment
//! (soft-cancel: the document goes away, the flag stays, the interceptor
//! degrades to an unmodified forward).

mod capture;
mod controller;
mod notifier;

#[cfg(test)]
mod test;

pub use capture::{encode_content, validate_pdf};
pub use controller::AttachmentController;
pub use notifier::LoggingNotifier;
