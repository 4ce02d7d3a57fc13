use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};

/// Sole gate for tenant-facing visibility: only "available" properties show
/// up in public listing and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Rented,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentPeriod {
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Property {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub bedroom: u32,
    pub living_room: u32,
    pub kitchen: u32,
    pub toilet: u32,
    pub price: f64,
    pub payment_period: PaymentPeriod,
    /// Hosted image URLs, upload order preserved.
    pub images: Json<Vec<String>>,
    pub availability: Availability,
    /// Owning user id. Immutable after creation; ownership never transfers.
    pub landlord_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
