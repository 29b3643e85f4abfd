//! The transport module: every entity of the booking platform

use crate::core::module::Module;
use crate::entities::{
    booking::BookingDescriptor, document::DocumentDescriptor,
    purchase_order::PurchaseOrderDescriptor, quotation::QuotationDescriptor,
    sales_order::SalesOrderDescriptor, transaction::TransactionDescriptor, user::UserDescriptor,
    vehicle::VehicleDescriptor,
};
use crate::server::entity_registry::EntityRegistry;

/// Bookings, fleet and the order workflow
pub struct TransportModule;

impl Module for TransportModule {
    fn name(&self) -> &str {
        "lezit-transports"
    }

    fn entity_types(&self) -> Vec<&str> {
        vec![
            "user",
            "vehicle",
            "booking",
            "quotation",
            "sales_order",
            "purchase_order",
            "transaction",
            "document",
        ]
    }

    fn register_entities(&self, registry: &mut EntityRegistry) {
        registry.register(Box::new(UserDescriptor));
        registry.register(Box::new(VehicleDescriptor));
        registry.register(Box::new(BookingDescriptor));
        registry.register(Box::new(QuotationDescriptor));
        registry.register(Box::new(SalesOrderDescriptor));
        registry.register(Box::new(PurchaseOrderDescriptor));
        registry.register(Box::new(TransactionDescriptor));
        registry.register(Box::new(DocumentDescriptor));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_every_declared_entity() {
        let module = TransportModule;
        let mut registry = EntityRegistry::new();
        module.register_entities(&mut registry);

        let mut declared = module.entity_types();
        declared.sort_unstable();
        assert_eq!(registry.entity_types(), declared);
    }
}
