//! Money movements: customer payments and vendor payouts

use crate::entities::CURRENCY_RE;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Which way the money moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDirection {
    /// Customer pays against a sales order
    Incoming,
    /// Vendor is paid against a purchase order
    Outgoing,
}

crate::lifecycle!(
    /// Settlement status of a transaction
    TransactionStatus, "transaction" {
        Pending => "pending": [Completed, Failed],
        Completed => "completed": [Refunded],
        Failed => "failed": [],
        Refunded => "refunded": [],
    }
);

crate::impl_entity!(
    /// A recorded payment
    FinancialTransaction,
    "transaction",
    "transactions",
    TransactionStatus,
    {
        reference: String,
        booking_id: Uuid,
        direction: TransactionDirection,
        /// Customer for incoming, vendor for outgoing
        counterparty_id: Uuid,
        #[serde(default)]
        sales_order_id: Option<Uuid>,
        #[serde(default)]
        purchase_order_id: Option<Uuid>,
        amount: f64,
        currency: String,
        /// bank_transfer, upi, cash, ...
        method: String,
        #[serde(default)]
        note: Option<String>,
    }
);

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordTransactionRequest {
    pub direction: TransactionDirection,
    /// Required for incoming payments
    pub sales_order_id: Option<Uuid>,
    /// Required for outgoing payments
    pub purchase_order_id: Option<Uuid>,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(regex(path = *CURRENCY_RE, message = "must be a 3-letter ISO code"))]
    pub currency: Option<String>,
    #[validate(length(min = 2, max = 40))]
    pub method: String,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}
