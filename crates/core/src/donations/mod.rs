//! Donations module - records, bounded buffer and polling service.

mod donations_buffer;
mod donations_model;
mod donations_service;
mod donations_traits;

pub use donations_buffer::DonationBuffer;
pub use donations_model::{DonationFeed, DonationId, DonationRecord, NewDonation, WebhookPayload};
pub use donations_service::DonationService;
pub use donations_traits::{DonationServiceTrait, DonationStoreTrait};
