//! Sales order entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::SalesOrderDescriptor;
pub use model::{SalesOrder, SalesOrderStatus};
