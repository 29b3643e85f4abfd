//! Purchase order entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::PurchaseOrderDescriptor;
pub use model::{CreatePurchaseOrderRequest, PurchaseOrder, PurchaseOrderStatus};
