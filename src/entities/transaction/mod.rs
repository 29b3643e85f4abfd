//! Financial transaction entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::TransactionDescriptor;
pub use model::{
    FinancialTransaction, RecordTransactionRequest, TransactionDirection, TransactionStatus,
};
