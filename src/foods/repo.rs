use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::foods::services::ValidatedFood;

/// Five independent dietary flags on a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dietary {
    pub vegetarian: bool,
    pub vegan: bool,
    pub glutenfree: bool,
    pub halal: bool,
    pub kosher: bool,
}

/// Optional per-serving numbers; absent fields stay absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
}

/// Food listing record. Immutable once created; only its owner may delete it.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub cuisine_type: String,
    pub vendor_name: String,
    pub address: String,
    pub city: String,
    pub price: f64,
    pub price_range: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub dietary: Json<Dietary>,
    pub nutrition: Json<Nutrition>,
    pub created_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = "id, title, description, cuisine_type, vendor_name, address, city, price, \
                       price_range, tags, images, dietary, nutrition, created_by, created_at, \
                       updated_at";

impl Food {
    pub async fn create(
        db: &PgPool,
        owner: Uuid,
        food: ValidatedFood,
        images: Vec<String>,
    ) -> sqlx::Result<Food> {
        let sql = format!(
            "INSERT INTO foods (title, description, cuisine_type, vendor_name, address, city, \
             price, price_range, tags, images, dietary, nutrition, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Food>(&sql)
            .bind(food.title)
            .bind(food.description)
            .bind(food.cuisine_type)
            .bind(food.vendor_name)
            .bind(food.address)
            .bind(food.city)
            .bind(food.price)
            .bind(food.price_range)
            .bind(food.tags)
            .bind(images)
            .bind(Json(food.dietary))
            .bind(Json(food.nutrition))
            .bind(owner)
            .fetch_one(db)
            .await
    }

    pub async fn list_latest(db: &PgPool, limit: i64) -> sqlx::Result<Vec<Food>> {
        let sql = format!("SELECT {COLUMNS} FROM foods ORDER BY created_at DESC LIMIT $1");
        sqlx::query_as::<_, Food>(&sql)
            .bind(limit)
            .fetch_all(db)
            .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Food>> {
        let sql = format!("SELECT {COLUMNS} FROM foods WHERE id = $1");
        sqlx::query_as::<_, Food>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM foods WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
