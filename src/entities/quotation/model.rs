//! Price quotations offered to customers

use crate::entities::CURRENCY_RE;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

crate::lifecycle!(
    /// Status of a quotation
    QuotationStatus, "quotation" {
        Draft => "draft": [Sent, Expired],
        Sent => "sent": [Accepted, Rejected, Expired],
        Accepted => "accepted": [],
        Rejected => "rejected": [],
        Expired => "expired": [],
    }
);

crate::impl_entity!(
    /// A price offered for a booking
    Quotation,
    "quotation",
    "quotations",
    QuotationStatus,
    {
        reference: String,
        booking_id: Uuid,
        customer_id: Uuid,
        amount: f64,
        currency: String,
        #[serde(default)]
        valid_until: Option<DateTime<Utc>>,
        #[serde(default)]
        notes: Option<String>,
    }
);

impl Quotation {
    /// Past its validity window at `now`
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.valid_until.is_some_and(|until| until < now)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuotationRequest {
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(regex(path = *CURRENCY_RE, message = "must be a 3-letter ISO code"))]
    pub currency: Option<String>,
    pub valid_until: Option<DateTime<Utc>>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}
