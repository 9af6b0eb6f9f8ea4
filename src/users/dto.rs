use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo::User;

/// The allowlisted subset of a user record safe to return to any caller.
/// The password hash is structurally absent, not merely skipped.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub location: String,
    pub food_interests: Vec<String>,
    pub dietary_restrictions: String,
    pub profile_picture: String,
    pub bio: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_login: OffsetDateTime,
}

impl PublicUser {
    /// Same projection minus the email, for anonymous public lookups.
    pub fn without_email(mut self) -> Self {
        self.email = None;
        self
    }
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            username: u.username,
            email: Some(u.email),
            location: u.location,
            food_interests: u.food_interests,
            dietary_restrictions: u.dietary_restrictions,
            profile_picture: u.profile_picture,
            bio: u.bio,
            created_at: u.created_at,
            last_login: u.last_login,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub food_interests: Option<Vec<String>>,
    pub dietary_restrictions: Option<String>,
    pub newsletter: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteProfileRequest {
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Trimmed listing for search results.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_picture: String,
    pub location: String,
    pub food_interests: Vec<String>,
}

impl From<User> for SearchResult {
    fn from(u: User) -> Self {
        Self {
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            profile_picture: u.profile_picture,
            location: u.location,
            food_interests: u.food_interests,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub users: Vec<SearchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo::UserStatus;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email: "asha@example.com".into(),
            username: "asha_r".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            location: "Pune".into(),
            bio: "".into(),
            food_interests: vec!["italian".into()],
            dietary_restrictions: "vegetarian".into(),
            newsletter: true,
            profile_picture: "".into(),
            status: UserStatus::Active,
            last_login: OffsetDateTime::now_utc(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn public_profile_never_contains_the_hash() {
        let json = serde_json::to_string(&PublicUser::from(sample_user())).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
        assert!(json.contains("\"firstName\":\"Asha\""));
        assert!(json.contains("\"username\":\"asha_r\""));
    }

    #[test]
    fn without_email_drops_the_field() {
        let public = PublicUser::from(sample_user()).without_email();
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("\"email\""));
        assert!(json.contains("\"username\":\"asha_r\""));
    }

    #[test]
    fn search_result_excludes_email() {
        let json = serde_json::to_string(&SearchResult::from(sample_user())).unwrap();
        assert!(!json.contains("example.com"));
        assert!(json.contains("\"profilePicture\""));
    }
}
