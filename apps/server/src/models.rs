use donation_relay_core::donations as core_donations;
use donation_relay_core::donations::DonationId;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use utoipa::ToSchema;

/// A donation as delivered to polling clients.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct Donation {
    /// Provider id, echoed as a string or number in the shape it was received.
    #[schema(value_type = String)]
    pub id: DonationId,
    pub donator_name: String,
    #[schema(value_type = f64)]
    pub amount_raw: Number,
    pub message: String,
    /// Ingestion time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl From<core_donations::DonationRecord> for Donation {
    fn from(r: core_donations::DonationRecord) -> Self {
        Self {
            id: r.id,
            donator_name: r.donator_name,
            amount_raw: r.amount_raw,
            message: r.message,
            timestamp: r.timestamp,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct DonationFeed {
    pub success: bool,
    pub donations: Vec<Donation>,
    /// Cursor to send back as `after_id` on the next poll; null only while
    /// the buffer is empty.
    #[schema(value_type = Option<String>)]
    pub latest_id: Option<DonationId>,
}

impl From<core_donations::DonationFeed> for DonationFeed {
    fn from(feed: core_donations::DonationFeed) -> Self {
        Self {
            success: feed.success,
            donations: feed.donations.into_iter().map(Donation::from).collect(),
            latest_id: feed.latest_id,
        }
    }
}

/// Webhook body as sent by the payment provider. Extra fields are ignored.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct WebhookNotification {
    #[schema(value_type = Option<String>)]
    pub id: Option<DonationId>,
    pub donator_name: Option<String>,
    #[schema(value_type = f64)]
    pub amount_raw: Number,
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct ErrorResponse {
    pub error: String,
}
