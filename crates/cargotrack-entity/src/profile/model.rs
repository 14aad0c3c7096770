//! User profile entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Local mirror of an identity-provider user, used for username lookup.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    /// Unique profile identifier.
    pub id: Uuid,
    /// Identity provider user id (unique).
    pub user_id: String,
    /// Email address (unique).
    pub email: String,
    pub username: String,
    pub role: String,
    pub telephone: String,
    pub country: String,
    pub city: String,
    pub address: String,
    pub postcode: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Whether the mutable fields differ from `data`.
    pub fn differs_from(&self, data: &ProfileData) -> bool {
        self.email != data.email
            || self.username != data.username
            || self.role != data.role
            || self.telephone != data.telephone
            || self.country != data.country
            || self.city != data.city
            || self.address != data.address
            || self.postcode != data.postcode
    }

    /// Overwrite every mutable field with `data`.
    pub fn apply(&mut self, data: ProfileData, now: DateTime<Utc>) {
        self.email = data.email;
        self.username = data.username;
        self.role = data.role;
        self.telephone = data.telephone;
        self.country = data.country;
        self.city = data.city;
        self.address = data.address;
        self.postcode = data.postcode;
        self.updated_at = now;
    }
}

/// The mutable profile fields, as derived from provider metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileData {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub telephone: String,
    pub country: String,
    pub city: String,
    pub address: String,
    pub postcode: String,
}

impl ProfileData {
    pub fn into_profile(self, now: DateTime<Utc>) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            email: self.email,
            username: self.username,
            role: self.role,
            telephone: self.telephone,
            country: self.country,
            city: self.city,
            address: self.address,
            postcode: self.postcode,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_replaces_fields_and_keeps_identity() {
        let created = Utc::now();
        let mut profile = ProfileData {
            user_id: "u-1".into(),
            email: "abby@x.test".into(),
            username: "abby".into(),
            city: "Oslo".into(),
            ..Default::default()
        }
        .into_profile(created);
        let id = profile.id;

        let update = ProfileData {
            user_id: "u-1".into(),
            email: "abby@x.test".into(),
            username: "abby".into(),
            ..Default::default()
        };
        assert!(profile.differs_from(&update));

        profile.apply(update.clone(), Utc::now());
        assert_eq!(profile.id, id);
        assert_eq!(profile.created_at, created);
        assert!(profile.city.is_empty());
        assert!(!profile.differs_from(&update));
    }
}
