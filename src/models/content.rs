use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};

/// The status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// A booking, as stored in `bookings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub customer_name: String,
    pub email: String,
    pub service: String,
    pub starts_at: DateTime<Utc>,
    pub party_size: u32,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Site-wide settings, as stored in `settings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    #[garde(length(max = 200))]
    pub business_name: String,
    #[garde(length(max = 254))]
    pub contact_email: String,
    #[garde(length(min = 1, max = 64))]
    pub timezone: String,
    /// Minimum notice, in hours, for a new booking.
    #[garde(range(max = 720))]
    pub booking_lead_hours: u32,
    #[garde(skip)]
    pub deposit_required: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            business_name: String::new(),
            contact_email: String::new(),
            timezone: "UTC".to_string(),
            booking_lead_hours: 24,
            deposit_required: false,
        }
    }
}
