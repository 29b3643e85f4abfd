//! Macro-generated test suite for `DataService<Shipment>` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use lezit::storage::InMemoryDataService;
//!
//! data_service_tests!(InMemoryDataService::<Shipment>::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_get`, `test_get_nonexistent`
//! - `test_list_empty`, `test_list_newest_first`
//! - `test_update_existing`, `test_update_nonexistent`
//! - `test_delete_existing`, `test_delete_nonexistent`
//!
//! ## Search
//! - string, integer, float, boolean, uuid and status fields
//! - `test_search_by_id`, `test_search_no_results`, `test_search_unknown_field`
//!
//! ## Helpers and edge cases
//! - `fetch`, `find_one`, `save`
//! - `test_concurrent_access`

/// Generate a full `DataService<Shipment>` conformance test suite.
///
/// `$factory` is re-evaluated for each test to ensure isolation. For the
/// concurrent access test, the returned service must also implement
/// `Clone + 'static`.
#[macro_export]
macro_rules! data_service_tests {
    ($factory:expr) => {
        mod data_service_contract_tests {
            use super::*;
            use lezit::core::entity::Entity;
            use lezit::core::service::DataService;
            use uuid::Uuid;

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let service = $factory;
                let record = shipment("pallets", "ops@cargo.test", 12, 4.5, true);
                let id = record.id;

                let created = service.create(record).await.unwrap();
                assert_eq!(created.id(), id);

                let stored = service.get(&id).await.unwrap().expect("record exists");
                assert_eq!(stored.label, "pallets");
                assert_eq!(stored.email, "ops@cargo.test");
                assert_eq!(stored.pieces, 12);
                assert!((stored.weight - 4.5).abs() < f64::EPSILON);
                assert!(stored.fragile);
                assert_eq!(stored.status, ShipmentStatus::Booked);
                assert_eq!(stored.owner_id, None);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let service = $factory;
                assert!(service.get(&Uuid::new_v4()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_list_empty() {
                let service = $factory;
                assert!(service.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_newest_first() {
                let service = $factory;
                let mut ids = Vec::new();
                for i in 0..5 {
                    let mut record = shipment(&format!("crate-{i}"), "a@cargo.test", i, 1.0, false);
                    record.created_at = chrono::Utc::now() + chrono::Duration::seconds(i);
                    ids.push(service.create(record).await.unwrap().id);
                }

                let listed: Vec<Uuid> = service.list().await.unwrap().iter().map(|r| r.id).collect();
                ids.reverse();
                assert_eq!(listed, ids);
            }

            #[tokio::test]
            async fn test_update_existing() {
                let service = $factory;
                let mut record = service
                    .create(shipment("drums", "a@cargo.test", 3, 2.0, false))
                    .await
                    .unwrap();

                record.label = "steel drums".to_string();
                record.transition_to(ShipmentStatus::Moving).unwrap();
                service.update(&record.id, record.clone()).await.unwrap();

                let stored = service.get(&record.id).await.unwrap().unwrap();
                assert_eq!(stored.label, "steel drums");
                assert_eq!(stored.status, ShipmentStatus::Moving);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let service = $factory;
                let record = shipment("ghost", "a@cargo.test", 1, 1.0, false);
                assert!(service.update(&record.id, record.clone()).await.is_err());
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let service = $factory;
                let record = service
                    .create(shipment("bags", "a@cargo.test", 1, 1.0, false))
                    .await
                    .unwrap();
                service.delete(&record.id).await.unwrap();
                assert!(service.get(&record.id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let service = $factory;
                assert!(service.delete(&Uuid::new_v4()).await.is_ok());
            }

            // ==================================================================
            // Search
            // ==================================================================

            #[tokio::test]
            async fn test_search_string_field() {
                let service = $factory;
                service.create(shipment("a", "north@cargo.test", 1, 1.0, false)).await.unwrap();
                service.create(shipment("b", "north@cargo.test", 2, 1.0, false)).await.unwrap();
                service.create(shipment("c", "south@cargo.test", 3, 1.0, false)).await.unwrap();

                let found = service.search("email", "north@cargo.test").await.unwrap();
                assert_eq!(found.len(), 2);
            }

            #[tokio::test]
            async fn test_search_integer_field() {
                let service = $factory;
                service.create(shipment("a", "x@cargo.test", 7, 1.0, false)).await.unwrap();
                service.create(shipment("b", "x@cargo.test", 8, 1.0, false)).await.unwrap();

                let found = service.search("pieces", "7").await.unwrap();
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].label, "a");
            }

            #[tokio::test]
            async fn test_search_float_field() {
                let service = $factory;
                service.create(shipment("a", "x@cargo.test", 1, 2.5, false)).await.unwrap();
                service.create(shipment("b", "x@cargo.test", 1, 3.5, false)).await.unwrap();

                let found = service.search("weight", "2.5").await.unwrap();
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].label, "a");
            }

            #[tokio::test]
            async fn test_search_boolean_field() {
                let service = $factory;
                service.create(shipment("a", "x@cargo.test", 1, 1.0, true)).await.unwrap();
                service.create(shipment("b", "x@cargo.test", 1, 1.0, false)).await.unwrap();

                let found = service.search("fragile", "true").await.unwrap();
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].label, "a");
            }

            #[tokio::test]
            async fn test_search_uuid_field() {
                let service = $factory;
                let owner = Uuid::new_v4();
                service.create(owned_shipment("mine", owner)).await.unwrap();
                service.create(owned_shipment("mine-too", owner)).await.unwrap();
                service.create(owned_shipment("theirs", Uuid::new_v4())).await.unwrap();

                let found = service.search("owner_id", &owner.to_string()).await.unwrap();
                assert_eq!(found.len(), 2);
            }

            #[tokio::test]
            async fn test_search_status_field() {
                let service = $factory;
                let mut moving = shipment("a", "x@cargo.test", 1, 1.0, false);
                moving.transition_to(ShipmentStatus::Moving).unwrap();
                service.create(moving).await.unwrap();
                service.create(shipment("b", "x@cargo.test", 1, 1.0, false)).await.unwrap();

                let found = service.search("status", "moving").await.unwrap();
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].label, "a");
            }

            #[tokio::test]
            async fn test_search_by_id() {
                let service = $factory;
                let record = service
                    .create(shipment("a", "x@cargo.test", 1, 1.0, false))
                    .await
                    .unwrap();

                let found = service.search("id", &record.id.to_string()).await.unwrap();
                assert_eq!(found.len(), 1);
            }

            #[tokio::test]
            async fn test_search_no_results() {
                let service = $factory;
                service.create(shipment("a", "x@cargo.test", 1, 1.0, false)).await.unwrap();
                assert!(service.search("email", "nobody@cargo.test").await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_search_unknown_field() {
                let service = $factory;
                service.create(shipment("a", "x@cargo.test", 1, 1.0, false)).await.unwrap();
                assert!(service.search("no_such_field", "a").await.unwrap().is_empty());
            }

            // ==================================================================
            // Provided helpers
            // ==================================================================

            #[tokio::test]
            async fn test_fetch_reports_not_found() {
                let service = $factory;
                let err = service.fetch(&Uuid::new_v4()).await.unwrap_err();
                assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
                assert!(err.to_string().contains("shipment"));
            }

            #[tokio::test]
            async fn test_find_one_and_save() {
                let service = $factory;
                service
                    .create(shipment("a", "unique@cargo.test", 1, 1.0, false))
                    .await
                    .unwrap();

                let mut found = service
                    .find_one("email", "unique@cargo.test")
                    .await
                    .unwrap()
                    .expect("one match");
                found.pieces = 42;
                service.save(found.clone()).await.unwrap();

                assert_eq!(service.fetch(&found.id).await.unwrap().pieces, 42);
                assert!(service.find_one("email", "other@cargo.test").await.unwrap().is_none());
            }

            // ==================================================================
            // Edge cases
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_access() {
                let service = $factory;
                let mut handles = Vec::new();
                for i in 0..10 {
                    let service = service.clone();
                    handles.push(tokio::spawn(async move {
                        service
                            .create(shipment(&format!("c{i}"), "x@cargo.test", i, 1.0, false))
                            .await
                            .unwrap()
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }
                assert_eq!(service.list().await.unwrap().len(), 10);
            }
        }
    };
}
