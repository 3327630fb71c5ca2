//! Reference document management.

pub mod service;

pub use service::{DocumentOutcome, DocumentReport, DocumentService, UploadFile};
