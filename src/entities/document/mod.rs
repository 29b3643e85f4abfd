//! Document entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::DocumentDescriptor;
pub use model::{Document, DocumentKind, DocumentStatus, UploadDocumentRequest};
