use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Identity lifecycle. Self-deletion flips the record to `Deactivated`
/// instead of removing it; lookups that resolve identities filter on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Deactivated,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub location: String,
    pub bio: String,
    pub food_interests: Vec<String>,
    pub dietary_restrictions: String,
    pub newsletter: bool,
    pub profile_picture: String,
    pub status: UserStatus,
    pub last_login: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub location: String,
    pub food_interests: Vec<String>,
    pub dietary_restrictions: String,
    pub newsletter: bool,
}

/// Allowlisted profile fields; `None` leaves the stored value untouched.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub food_interests: Option<Vec<String>>,
    pub dietary_restrictions: Option<String>,
    pub newsletter: Option<bool>,
}

const COLUMNS: &str = "id, first_name, last_name, email, username, password_hash, location, bio, \
                       food_interests, dietary_restrictions, newsletter, profile_picture, status, \
                       last_login, created_at, updated_at";

impl User {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Login lookup: the identifier may be an email (matched lowercased) or
    /// a username (matched as given).
    pub async fn find_by_email_or_username(
        db: &PgPool,
        identifier: &str,
    ) -> sqlx::Result<Option<User>> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE email = $1 OR username = $2");
        sqlx::query_as::<_, User>(&sql)
            .bind(identifier.to_lowercase())
            .bind(identifier)
            .fetch_optional(db)
            .await
    }

    /// Combined uniqueness probe for registration. Returns the colliding
    /// record so the caller can name the field; when both collide, comparing
    /// the email keeps the email message deterministic.
    pub async fn find_conflict(
        db: &PgPool,
        email: &str,
        username: &str,
    ) -> sqlx::Result<Option<User>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM users WHERE email = $1 OR username = $2 \
             ORDER BY (email = $1) DESC LIMIT 1"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(username)
            .fetch_optional(db)
            .await
    }

    pub async fn create(db: &PgPool, new: NewUser) -> sqlx::Result<User> {
        let sql = format!(
            "INSERT INTO users (first_name, last_name, email, username, password_hash, location, \
             food_interests, dietary_restrictions, newsletter) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(new.first_name)
            .bind(new.last_name)
            .bind(new.email)
            .bind(new.username)
            .bind(new.password_hash)
            .bind(new.location)
            .bind(new.food_interests)
            .bind(new.dietary_restrictions)
            .bind(new.newsletter)
            .fetch_one(db)
            .await
    }

    /// Record a successful authentication. Last-write-wins under concurrent
    /// logins; `last_login` is not security-critical.
    pub async fn touch_last_login(db: &PgPool, id: Uuid) -> sqlx::Result<User> {
        let sql = format!(
            "UPDATE users SET last_login = now(), updated_at = now() WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql).bind(id).fetch_one(db).await
    }

    pub async fn update_profile(db: &PgPool, id: Uuid, upd: ProfileUpdate) -> sqlx::Result<User> {
        let sql = format!(
            "UPDATE users SET \
             first_name = COALESCE($2, first_name), \
             last_name = COALESCE($3, last_name), \
             location = COALESCE($4, location), \
             bio = COALESCE($5, bio), \
             food_interests = COALESCE($6, food_interests), \
             dietary_restrictions = COALESCE($7, dietary_restrictions), \
             newsletter = COALESCE($8, newsletter), \
             updated_at = now() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(upd.first_name)
            .bind(upd.last_name)
            .bind(upd.location)
            .bind(upd.bio)
            .bind(upd.food_interests)
            .bind(upd.dietary_restrictions)
            .bind(upd.newsletter)
            .fetch_one(db)
            .await
    }

    pub async fn set_password_hash(db: &PgPool, id: Uuid, hash: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Soft delete: the record stays, identity lookups stop resolving it.
    pub async fn deactivate(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET status = 'deactivated', updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Substring search over username and names; active users only, caller
    /// excluded.
    pub async fn search(db: &PgPool, query: &str, exclude: Uuid) -> sqlx::Result<Vec<User>> {
        let pattern = format!("%{}%", query);
        let sql = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE status = 'active' AND id <> $2 \
               AND (username ILIKE $1 OR first_name ILIKE $1 OR last_name ILIKE $1) \
             LIMIT 10"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(pattern)
            .bind(exclude)
            .fetch_all(db)
            .await
    }

    pub async fn find_active_by_username(
        db: &PgPool,
        username: &str,
    ) -> sqlx::Result<Option<User>> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE username = $1 AND status = 'active'");
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(db)
            .await
    }
}
