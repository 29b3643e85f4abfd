//! Sales orders raised from accepted quotations

use uuid::Uuid;

crate::lifecycle!(
    /// Billing status of a sales order
    SalesOrderStatus, "sales_order" {
        Open => "open": [Invoiced, Cancelled],
        Invoiced => "invoiced": [Paid, Cancelled],
        Paid => "paid": [],
        Cancelled => "cancelled": [],
    }
);

crate::impl_entity!(
    /// What the customer owes for a booking
    SalesOrder,
    "sales_order",
    "sales_orders",
    SalesOrderStatus,
    {
        reference: String,
        booking_id: Uuid,
        quotation_id: Uuid,
        customer_id: Uuid,
        amount: f64,
        currency: String,
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Lifecycle;

    #[test]
    fn test_lifecycle() {
        use SalesOrderStatus::*;
        assert!(Open.can_transition_to(Invoiced));
        assert!(!Open.can_transition_to(Paid));
        assert!(Invoiced.can_transition_to(Paid));
        assert!(Paid.is_terminal());
        assert_eq!(SalesOrderStatus::ENTITY, "sales_order");
    }
}
