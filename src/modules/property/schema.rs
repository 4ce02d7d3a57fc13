use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::{Availability, PaymentPeriod, Property};

// =============================================================================
// CREATE
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePropertyRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub bedroom: u32,
    pub living_room: u32,
    pub kitchen: u32,
    pub toilet: u32,
    pub payment_period: PaymentPeriod,
    #[validate(range(min = 0.0, message = "Price must be non-negative"))]
    pub price: f64,
    /// Raw image payloads (data URIs); uploaded in order on create.
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatePropertyResponse {
    pub success: bool,
    pub message: &'static str,
    pub property: Property,
}

// =============================================================================
// AVAILABILITY / DELETE
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct UpdateAvailabilityRequest {
    // Option so an omitted field reports 400 rather than a decode rejection.
    pub availability: Option<Availability>,
}

#[derive(Debug, Serialize)]
pub struct UpdateAvailabilityResponse {
    pub success: bool,
    pub message: &'static str,
    pub property: Property,
}

#[derive(Debug, Serialize)]
pub struct DeletePropertyResponse {
    pub success: bool,
    pub message: &'static str,
}

// =============================================================================
// LISTING
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PublicListQuery {
    pub page: Option<i64>,
    pub location: Option<String>,
    pub budget: Option<f64>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LandlordListResponse {
    pub total: i64,
    pub available_properties: i64,
    pub rented_properties: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub properties: Vec<Property>,
}

#[derive(Debug, Serialize)]
pub struct PublicListResponse {
    /// Number of items on this page.
    pub num: usize,
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub properties: Vec<Property>,
}

// =============================================================================
// DETAIL
// =============================================================================

/// Owner projection embedded in a property detail view.
#[derive(Debug, Serialize)]
pub struct LandlordProfile {
    pub full_name: String,
    pub profile_picture: String,
    pub email: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub property: Property,
    pub landlord: LandlordProfile,
}

#[derive(Debug, Serialize)]
pub struct PropertyDetailResponse {
    pub property: PropertyDetail,
    /// Up to 3 other available properties from the same landlord.
    pub more_from_landlord: Vec<Property>,
    /// Up to 3 other available properties within ±20% of this price at the
    /// same location.
    pub similar_price_properties: Vec<Property>,
}
