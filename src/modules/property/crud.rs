use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySql, Pool, QueryBuilder};

use super::interface::{LandlordStats, PropertyError, PropertyStore, PublicFilter, Result};
use super::model::{Availability, Property};

pub struct MySqlPropertyStore {
    pool: Pool<MySql>,
}

impl MySqlPropertyStore {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

fn map_db_error(e: sqlx::Error) -> PropertyError {
    PropertyError::Database(e.to_string())
}

/// Appends the public-visibility filter clauses. Availability is pinned to
/// "available" before any caller-supplied criteria apply.
fn push_public_filter<'a>(qb: &mut QueryBuilder<'a, MySql>, filter: &'a PublicFilter) {
    qb.push(" WHERE availability = 'available'");

    if let Some(location) = &filter.location {
        qb.push(" AND location LIKE ")
            .push_bind(format!("%{location}%"));
    }
    if let Some(max_budget) = filter.max_budget {
        qb.push(" AND price <= ").push_bind(max_budget);
    }
    if let Some(keyword) = &filter.title_keyword {
        qb.push(" AND title LIKE ")
            .push_bind(format!("%{keyword}%"));
    }
}

#[async_trait]
impl PropertyStore for MySqlPropertyStore {
    async fn insert(&self, property: &Property) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO properties (
                id, title, description, location, bedroom, living_room,
                kitchen, toilet, price, payment_period, images, availability,
                landlord_id, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&property.id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(&property.location)
        .bind(property.bedroom)
        .bind(property.living_room)
        .bind(property.kitchen)
        .bind(property.toilet)
        .bind(property.price)
        .bind(property.payment_period)
        .bind(&property.images)
        .bind(property.availability)
        .bind(&property.landlord_id)
        .bind(property.created_at)
        .bind(property.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Property>> {
        sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn delete_owned(&self, id: &str, landlord_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM properties WHERE id = ? AND landlord_id = ?")
            .bind(id)
            .bind(landlord_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_availability(
        &self,
        id: &str,
        landlord_id: &str,
        availability: Availability,
    ) -> Result<Option<Property>> {
        sqlx::query(
            "UPDATE properties SET availability = ?, updated_at = ? WHERE id = ? AND landlord_id = ?",
        )
        .bind(availability)
        .bind(Utc::now())
        .bind(id)
        .bind(landlord_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        // rows_affected is 0 for a no-change update on MySQL, so re-read the
        // owner-scoped row instead of trusting it.
        sqlx::query_as::<_, Property>(
            "SELECT * FROM properties WHERE id = ? AND landlord_id = ?",
        )
        .bind(id)
        .bind(landlord_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn list_for_landlord(
        &self,
        landlord_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Property>> {
        sqlx::query_as::<_, Property>(
            r#"
            SELECT * FROM properties
            WHERE landlord_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(landlord_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn landlord_stats(&self, landlord_id: &str) -> Result<LandlordStats> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM properties WHERE landlord_id = ?")
                .bind(landlord_id)
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;

        let (available,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM properties WHERE landlord_id = ? AND availability = 'available'",
        )
        .bind(landlord_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let (rented,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM properties WHERE landlord_id = ? AND availability = 'rented'",
        )
        .bind(landlord_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(LandlordStats {
            total,
            available,
            rented,
        })
    }

    async fn list_public(
        &self,
        filter: &PublicFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Property>> {
        let mut qb = QueryBuilder::<MySql>::new("SELECT * FROM properties");
        push_public_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        qb.build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn count_public(&self, filter: &PublicFilter) -> Result<i64> {
        let mut qb = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM properties");
        push_public_filter(&mut qb, filter);

        let (count,): (i64,) = qb
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(count)
    }

    async fn more_from_landlord(
        &self,
        landlord_id: &str,
        exclude_id: &str,
        limit: i64,
    ) -> Result<Vec<Property>> {
        sqlx::query_as::<_, Property>(
            r#"
            SELECT * FROM properties
            WHERE landlord_id = ? AND id <> ? AND availability = 'available'
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(landlord_id)
        .bind(exclude_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn similar_in_price(
        &self,
        exclude_id: &str,
        location: &str,
        min_price: f64,
        max_price: f64,
        limit: i64,
    ) -> Result<Vec<Property>> {
        sqlx::query_as::<_, Property>(
            r#"
            SELECT * FROM properties
            WHERE id <> ?
              AND availability = 'available'
              AND location = ?
              AND price BETWEEN ? AND ?
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(exclude_id)
        .bind(location)
        .bind(min_price)
        .bind(max_price)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
