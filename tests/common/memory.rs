//! In-memory store doubles, made possible by the injected-store seams.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use torii_gate::modules::auth::interface::{AuthError, UserStore};
use torii_gate::modules::auth::model::User;
use torii_gate::modules::property::interface::{
    LandlordStats, PropertyError, PropertyStore, PublicFilter,
};
use torii_gate::modules::property::model::{Availability, Property};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

#[allow(dead_code)]
impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_by_email(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Backdates an outstanding verification token so expiry paths can be
    /// exercised without waiting.
    pub fn expire_verification_token(&self, email: &str) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.email == email) {
            user.verification_token_expires = Some(Utc::now() - Duration::hours(1));
        }
    }

    pub fn expire_reset_token(&self, email: &str) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.email == email) {
            user.reset_password_expires = Some(Utc::now() - Duration::hours(1));
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &User) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();

        let duplicate = users.iter().any(|existing| {
            existing.email == user.email
                || matches!(
                    (&existing.phone_number, &user.phone_number),
                    (Some(a), Some(b)) if a == b
                )
        });
        if duplicate {
            return Err(AuthError::DuplicateUser);
        }

        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self.get_by_email(email))
    }

    async fn email_or_phone_exists(
        &self,
        email: &str,
        phone_number: Option<&str>,
    ) -> Result<bool, AuthError> {
        Ok(self.users.lock().unwrap().iter().any(|u| {
            u.email == email
                || matches!((&u.phone_number, phone_number), (Some(a), Some(b)) if a == b)
        }))
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.reset_password_token.as_deref() == Some(token))
            .cloned())
    }

    async fn mark_verified(&self, user_id: &str) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.is_verified = true;
            user.verification_token = None;
            user.verification_token_expires = None;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_verification_token(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.verification_token = Some(token.to_string());
            user.verification_token_expires = Some(expires_at);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_reset_token(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.reset_password_token = Some(token.to_string());
            user.reset_password_expires = Some(expires_at);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_password(&self, user_id: &str, password_hash: &str) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.password_hash = password_hash.to_string();
            user.reset_password_token = None;
            user.reset_password_expires = None;
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

// =============================================================================
// PROPERTY STORE
// =============================================================================

#[derive(Default)]
pub struct MemoryPropertyStore {
    properties: Mutex<Vec<Property>>,
}

#[allow(dead_code)]
impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Property> {
        self.properties
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }
}

fn matches_public_filter(property: &Property, filter: &PublicFilter) -> bool {
    if property.availability != Availability::Available {
        return false;
    }
    if let Some(location) = &filter.location {
        if !property
            .location
            .to_lowercase()
            .contains(&location.to_lowercase())
        {
            return false;
        }
    }
    if let Some(max_budget) = filter.max_budget {
        if property.price > max_budget {
            return false;
        }
    }
    if let Some(keyword) = &filter.title_keyword {
        if !property
            .title
            .to_lowercase()
            .contains(&keyword.to_lowercase())
        {
            return false;
        }
    }
    true
}

fn newest_first(mut properties: Vec<Property>) -> Vec<Property> {
    properties.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    properties
}

#[async_trait]
impl PropertyStore for MemoryPropertyStore {
    async fn insert(&self, property: &Property) -> Result<(), PropertyError> {
        self.properties.lock().unwrap().push(property.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Property>, PropertyError> {
        Ok(self.get(id))
    }

    async fn delete_owned(&self, id: &str, landlord_id: &str) -> Result<bool, PropertyError> {
        let mut properties = self.properties.lock().unwrap();
        let before = properties.len();
        properties.retain(|p| !(p.id == id && p.landlord_id == landlord_id));
        Ok(properties.len() < before)
    }

    async fn set_availability(
        &self,
        id: &str,
        landlord_id: &str,
        availability: Availability,
    ) -> Result<Option<Property>, PropertyError> {
        let mut properties = self.properties.lock().unwrap();
        let Some(property) = properties
            .iter_mut()
            .find(|p| p.id == id && p.landlord_id == landlord_id)
        else {
            return Ok(None);
        };

        property.availability = availability;
        property.updated_at = Utc::now();
        Ok(Some(property.clone()))
    }

    async fn list_for_landlord(
        &self,
        landlord_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Property>, PropertyError> {
        let owned: Vec<Property> = self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.landlord_id == landlord_id)
            .cloned()
            .collect();

        Ok(newest_first(owned)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn landlord_stats(&self, landlord_id: &str) -> Result<LandlordStats, PropertyError> {
        let properties = self.properties.lock().unwrap();
        let owned = properties.iter().filter(|p| p.landlord_id == landlord_id);

        let mut stats = LandlordStats {
            total: 0,
            available: 0,
            rented: 0,
        };
        for property in owned {
            stats.total += 1;
            match property.availability {
                Availability::Available => stats.available += 1,
                Availability::Rented => stats.rented += 1,
            }
        }
        Ok(stats)
    }

    async fn list_public(
        &self,
        filter: &PublicFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Property>, PropertyError> {
        let matching: Vec<Property> = self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| matches_public_filter(p, filter))
            .cloned()
            .collect();

        Ok(newest_first(matching)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_public(&self, filter: &PublicFilter) -> Result<i64, PropertyError> {
        Ok(self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| matches_public_filter(p, filter))
            .count() as i64)
    }

    async fn more_from_landlord(
        &self,
        landlord_id: &str,
        exclude_id: &str,
        limit: i64,
    ) -> Result<Vec<Property>, PropertyError> {
        let matching: Vec<Property> = self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| {
                p.landlord_id == landlord_id
                    && p.id != exclude_id
                    && p.availability == Availability::Available
            })
            .cloned()
            .collect();

        Ok(newest_first(matching)
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn similar_in_price(
        &self,
        exclude_id: &str,
        location: &str,
        min_price: f64,
        max_price: f64,
        limit: i64,
    ) -> Result<Vec<Property>, PropertyError> {
        let matching: Vec<Property> = self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| {
                p.id != exclude_id
                    && p.availability == Availability::Available
                    && p.location == location
                    && p.price >= min_price
                    && p.price <= max_price
            })
            .cloned()
            .collect();

        Ok(newest_first(matching)
            .into_iter()
            .take(limit as usize)
            .collect())
    }
}
