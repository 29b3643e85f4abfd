//! Quotation entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::QuotationDescriptor;
pub use model::{CreateQuotationRequest, Quotation, QuotationStatus};
