use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use super::donations_model::{DonationFeed, DonationRecord, NewDonation};
use super::donations_traits::{DonationServiceTrait, DonationStoreTrait};
use crate::errors::Result;

/// Service relaying provider notifications to polling clients.
pub struct DonationService {
    store: Arc<dyn DonationStoreTrait>,
}

impl DonationService {
    pub fn new(store: Arc<dyn DonationStoreTrait>) -> Self {
        DonationService { store }
    }
}

impl DonationServiceTrait for DonationService {
    /// Validates the payload and appends it to the store.
    ///
    /// Redelivered notifications are appended again; deduplication is left to
    /// the polling client.
    fn ingest(&self, payload: &Value) -> Result<DonationRecord> {
        let new_donation = NewDonation::from_payload(payload)?;
        let record = new_donation.into_record(Utc::now());

        let evicted = self.store.append(record.clone())?;
        log::info!(
            "Buffered donation {} from {} ({})",
            record.id,
            record.donator_name,
            record.amount_raw
        );
        if evicted > 0 {
            log::debug!("Evicted {} old donation(s)", evicted);
        }
        Ok(record)
    }

    fn get_donations_after(&self, after_id: Option<&str>) -> Result<DonationFeed> {
        self.store.read_since(after_id)
    }

    fn buffered_count(&self) -> Result<usize> {
        self.store.count()
    }
}
