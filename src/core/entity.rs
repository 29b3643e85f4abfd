//! Entity trait defining the core abstraction for all stored records

use crate::core::error::LezitResult;
use crate::core::workflow::{Lifecycle, ensure_transition};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Base trait for all stored records.
///
/// Every record has:
/// - id: Unique identifier
/// - created_at / updated_at: timestamps managed on write
/// - status: a [`Lifecycle`] value whose transitions are checked
///
/// Records are stored one collection per type, named by
/// [`Entity::resource_name`].
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Status lifecycle of this record
    type Status: Lifecycle;

    /// The plural resource name used for collections (e.g., "bookings")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "booking")
    fn resource_name_singular() -> &'static str;

    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;

    fn status(&self) -> Self::Status;

    /// Overwrite the status without checking the lifecycle
    fn set_status(&mut self, status: Self::Status);

    /// Move to `next` if the lifecycle allows it
    fn transition_to(&mut self, next: Self::Status) -> LezitResult<()> {
        ensure_transition(self.status(), next)?;
        self.set_status(next);
        Ok(())
    }
}
