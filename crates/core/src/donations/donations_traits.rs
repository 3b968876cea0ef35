use serde_json::Value;

use crate::donations::donations_model::{DonationFeed, DonationRecord};
use crate::errors::Result;

/// Storage for retained donations.
///
/// Implementations must treat each call as one atomic unit: `append` covers
/// push and eviction, `read_since` covers the cursor scan and the slice.
pub trait DonationStoreTrait: Send + Sync {
    /// Appends a record, evicting the oldest ones past capacity.
    /// Returns the number of evicted records.
    fn append(&self, record: DonationRecord) -> Result<usize>;
    fn read_since(&self, after_id: Option<&str>) -> Result<DonationFeed>;
    fn count(&self) -> Result<usize>;
}

/// Trait for donation service operations
pub trait DonationServiceTrait: Send + Sync {
    fn ingest(&self, payload: &Value) -> Result<DonationRecord>;
    fn get_donations_after(&self, after_id: Option<&str>) -> Result<DonationFeed>;
    fn buffered_count(&self) -> Result<usize>;
}
