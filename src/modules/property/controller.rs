use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sqlx::types::Json as SqlJson;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::modules::property::{
    interface::{PropertyError, PublicFilter},
    model::{Availability, Property},
    schema::{
        CreatePropertyRequest, CreatePropertyResponse, DeletePropertyResponse,
        LandlordListResponse, LandlordProfile, PageQuery, PropertyDetail,
        PropertyDetailResponse, PublicListQuery, PublicListResponse, UpdateAvailabilityRequest,
        UpdateAvailabilityResponse,
    },
};
use crate::AppState;

const LANDLORD_PAGE_SIZE: i64 = 5;
const PUBLIC_PAGE_SIZE: i64 = 12;
const ENRICHMENT_LIMIT: i64 = 3;

fn page_number(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

// The page is caller-supplied and unbounded; saturate rather than overflow.
fn page_offset(page: i64, page_size: i64) -> i64 {
    (page - 1).saturating_mul(page_size)
}

fn total_pages(total: i64, page_size: i64) -> i64 {
    (total + page_size - 1) / page_size
}

pub async fn create_property(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(req): AppJson<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<CreatePropertyResponse>), PropertyError> {
    req.validate()
        .map_err(|e| PropertyError::Validation(e.to_string()))?;

    // Uploads preserve order; any failure aborts the whole create.
    let mut images = Vec::with_capacity(req.images.len());
    for image in &req.images {
        let url = state
            .uploader
            .upload(image)
            .await
            .map_err(|e| PropertyError::Upload(e.to_string()))?;
        images.push(url);
    }

    let now = Utc::now();
    let property = Property {
        id: Uuid::new_v4().to_string(),
        title: req.title.trim().to_string(),
        description: req.description.trim().to_string(),
        location: req.location.trim().to_string(),
        bedroom: req.bedroom,
        living_room: req.living_room,
        kitchen: req.kitchen,
        toilet: req.toilet,
        price: req.price,
        payment_period: req.payment_period,
        images: SqlJson(images),
        availability: Availability::Available,
        landlord_id: user.user_id,
        created_at: now,
        updated_at: now,
    };

    state.properties.insert(&property).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePropertyResponse {
            success: true,
            message: "Property created successfully",
            property,
        }),
    ))
}

pub async fn landlord_properties(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<(StatusCode, Json<LandlordListResponse>), PropertyError> {
    let page = page_number(query.page);
    let offset = page_offset(page, LANDLORD_PAGE_SIZE);

    let properties = state
        .properties
        .list_for_landlord(&user.user_id, offset, LANDLORD_PAGE_SIZE)
        .await?;
    let stats = state.properties.landlord_stats(&user.user_id).await?;

    Ok((
        StatusCode::OK,
        Json(LandlordListResponse {
            total: stats.total,
            available_properties: stats.available,
            rented_properties: stats.rented,
            current_page: page,
            total_pages: total_pages(stats.total, LANDLORD_PAGE_SIZE),
            properties,
        }),
    ))
}

pub async fn update_availability(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(property_id): Path<String>,
    AppJson(req): AppJson<UpdateAvailabilityRequest>,
) -> Result<(StatusCode, Json<UpdateAvailabilityResponse>), PropertyError> {
    let availability = req
        .availability
        .ok_or_else(|| PropertyError::Validation("Provide availability".to_string()))?;

    // Existence first, so an unknown id reads as 404 and someone else's
    // property as 403.
    let existing = state
        .properties
        .find_by_id(&property_id)
        .await?
        .ok_or(PropertyError::NotFound)?;
    if existing.landlord_id != user.user_id {
        return Err(PropertyError::NotOwner);
    }

    let property = state
        .properties
        .set_availability(&property_id, &user.user_id, availability)
        .await?
        .ok_or(PropertyError::NotFound)?;

    Ok((
        StatusCode::OK,
        Json(UpdateAvailabilityResponse {
            success: true,
            message: "Status updated successfully",
            property,
        }),
    ))
}

pub async fn delete_property(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(property_id): Path<String>,
) -> Result<(StatusCode, Json<DeletePropertyResponse>), PropertyError> {
    let existing = state
        .properties
        .find_by_id(&property_id)
        .await?
        .ok_or(PropertyError::NotFound)?;
    if existing.landlord_id != user.user_id {
        return Err(PropertyError::NotOwner);
    }

    // The delete itself is owner-scoped as well; a lost race reads as gone.
    let deleted = state
        .properties
        .delete_owned(&property_id, &user.user_id)
        .await?;
    if !deleted {
        return Err(PropertyError::NotFound);
    }

    Ok((
        StatusCode::OK,
        Json(DeletePropertyResponse {
            success: true,
            message: "Property deleted successfully",
        }),
    ))
}

pub async fn all_properties(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PublicListQuery>,
) -> Result<(StatusCode, Json<PublicListResponse>), PropertyError> {
    let page = page_number(query.page);
    let offset = page_offset(page, PUBLIC_PAGE_SIZE);

    let filter = PublicFilter {
        location: query.location.filter(|l| !l.is_empty()),
        max_budget: query.budget,
        title_keyword: query.property_type.filter(|t| !t.is_empty()),
    };

    let properties = state
        .properties
        .list_public(&filter, offset, PUBLIC_PAGE_SIZE)
        .await?;
    let total = state.properties.count_public(&filter).await?;

    Ok((
        StatusCode::OK,
        Json(PublicListResponse {
            num: properties.len(),
            total,
            total_pages: total_pages(total, PUBLIC_PAGE_SIZE),
            current_page: page,
            properties,
        }),
    ))
}

pub async fn get_property(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<String>,
) -> Result<(StatusCode, Json<PropertyDetailResponse>), PropertyError> {
    let property = state
        .properties
        .find_by_id(&property_id)
        .await?
        .ok_or(PropertyError::NotFound)?;

    let landlord = state
        .users
        .find_by_id(&property.landlord_id)
        .await
        .map_err(|e| PropertyError::Database(e.to_string()))?
        .ok_or_else(|| {
            PropertyError::Database(format!(
                "landlord {} missing for property {}",
                property.landlord_id, property.id
            ))
        })?;

    // Best-effort enrichments; empty lists are fine.
    let more_from_landlord = state
        .properties
        .more_from_landlord(&property.landlord_id, &property.id, ENRICHMENT_LIMIT)
        .await?;

    let price_margin = property.price * 0.2;
    let similar_price_properties = state
        .properties
        .similar_in_price(
            &property.id,
            &property.location,
            property.price - price_margin,
            property.price + price_margin,
            ENRICHMENT_LIMIT,
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(PropertyDetailResponse {
            property: PropertyDetail {
                property,
                landlord: LandlordProfile {
                    full_name: landlord.full_name,
                    profile_picture: landlord.profile_picture,
                    email: landlord.email,
                    phone_number: landlord.phone_number,
                },
            },
            more_from_landlord,
            similar_price_properties,
        }),
    ))
}
