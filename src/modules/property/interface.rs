use async_trait::async_trait;
use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};

use super::model::{Availability, Property};
use crate::modules::auth::schema::ErrorResponse;

pub type Result<T> = std::result::Result<T, PropertyError>;

/// Per-landlord availability tallies shown on the landlord dashboard.
#[derive(Debug, Clone, Copy)]
pub struct LandlordStats {
    pub total: i64,
    pub available: i64,
    pub rented: i64,
}

/// Public listing filter. All criteria are conjunctive; availability is
/// always restricted to "available" regardless of the rest.
#[derive(Debug, Default, Clone)]
pub struct PublicFilter {
    /// Case-insensitive substring match on location.
    pub location: Option<String>,
    /// Inclusive upper bound on price.
    pub max_budget: Option<f64>,
    /// Case-insensitive substring match on title.
    pub title_keyword: Option<String>,
}

/// Property persistence seam. Production is backed by MySQL; tests inject an
/// in-memory double.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn insert(&self, property: &Property) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Property>>;

    /// Deletes only when both id and owner match, so the ownership check
    /// holds at the query itself. Returns whether a row was deleted.
    async fn delete_owned(&self, id: &str, landlord_id: &str) -> Result<bool>;

    /// Owner-scoped availability update; returns the updated property, or
    /// None when id and owner do not match.
    async fn set_availability(
        &self,
        id: &str,
        landlord_id: &str,
        availability: Availability,
    ) -> Result<Option<Property>>;

    /// One landlord's properties, newest first.
    async fn list_for_landlord(
        &self,
        landlord_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Property>>;

    async fn landlord_stats(&self, landlord_id: &str) -> Result<LandlordStats>;

    /// Available properties matching the filter, newest first.
    async fn list_public(
        &self,
        filter: &PublicFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Property>>;

    async fn count_public(&self, filter: &PublicFilter) -> Result<i64>;

    /// Other available properties from the same landlord, newest first.
    async fn more_from_landlord(
        &self,
        landlord_id: &str,
        exclude_id: &str,
        limit: i64,
    ) -> Result<Vec<Property>>;

    /// Other available properties in [min_price, max_price] at the exact
    /// same location, newest first.
    async fn similar_in_price(
        &self,
        exclude_id: &str,
        location: &str,
        min_price: f64,
        max_price: f64,
        limit: i64,
    ) -> Result<Vec<Property>>;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("Property not found")]
    NotFound,

    #[error("You do not own this property")]
    NotOwner,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Image upload failed: {0}")]
    Upload(String),
}

impl PropertyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NotOwner => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PropertyError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("property workflow failed: {self}");
            "Something went wrong".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
