//! Purchase orders issued to vendors

use crate::entities::CURRENCY_RE;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

crate::lifecycle!(
    /// Status of a purchase order
    PurchaseOrderStatus, "purchase_order" {
        Issued => "issued": [Accepted, Rejected, Cancelled],
        Accepted => "accepted": [Completed, Cancelled],
        Rejected => "rejected": [],
        Completed => "completed": [],
        Cancelled => "cancelled": [],
    }
);

impl PurchaseOrderStatus {
    /// Still binding on the vendor
    pub fn is_live(&self) -> bool {
        matches!(self, PurchaseOrderStatus::Issued | PurchaseOrderStatus::Accepted)
    }
}

crate::impl_entity!(
    /// What the company pays a vendor to carry a booking
    PurchaseOrder,
    "purchase_order",
    "purchase_orders",
    PurchaseOrderStatus,
    {
        reference: String,
        sales_order_id: Uuid,
        booking_id: Uuid,
        vendor_id: Uuid,
        amount: f64,
        currency: String,
    }
);

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePurchaseOrderRequest {
    pub vendor_id: Uuid,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(regex(path = *CURRENCY_RE, message = "must be a 3-letter ISO code"))]
    pub currency: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Lifecycle;

    #[test]
    fn test_lifecycle() {
        use PurchaseOrderStatus::*;
        assert!(Issued.can_transition_to(Accepted));
        assert!(Issued.can_transition_to(Rejected));
        assert!(!Issued.can_transition_to(Completed));
        assert!(Accepted.can_transition_to(Completed));
        assert!(Rejected.is_terminal());
    }

    #[test]
    fn test_live_statuses() {
        assert!(PurchaseOrderStatus::Issued.is_live());
        assert!(PurchaseOrderStatus::Accepted.is_live());
        assert!(!PurchaseOrderStatus::Completed.is_live());
        assert!(!PurchaseOrderStatus::Rejected.is_live());
    }
}
