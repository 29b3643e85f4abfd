//! Shared test harness for storage backend testing
//!
//! Provides `Shipment`, a small record whose fields cover strings, numbers,
//! booleans, optional UUIDs and a typed status, plus helpers to build it.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod data_service_tests;

use uuid::Uuid;

lezit::lifecycle!(
    ShipmentStatus, "shipment" {
        Booked => "booked": [Moving, Lost],
        Moving => "moving": [Arrived],
        Arrived => "arrived": [],
        Lost => "lost": [],
    }
);

lezit::impl_entity!(
    /// Test record used by the storage contract suite
    Shipment,
    "shipment",
    "shipments",
    ShipmentStatus,
    {
        label: String,
        email: String,
        pieces: i64,
        weight: f64,
        fragile: bool,
        #[serde(default)]
        owner_id: Option<Uuid>,
    }
);

pub fn shipment(label: &str, email: &str, pieces: i64, weight: f64, fragile: bool) -> Shipment {
    Shipment::new(
        ShipmentStatus::Booked,
        label.to_string(),
        email.to_string(),
        pieces,
        weight,
        fragile,
        None,
    )
}

pub fn owned_shipment(label: &str, owner_id: Uuid) -> Shipment {
    let mut record = shipment(label, &format!("{label}@cargo.test"), 1, 1.0, false);
    record.owner_id = Some(owner_id);
    record
}
