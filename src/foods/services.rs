//! The listing-creation pipeline: ordered required-field validation followed
//! by normalization of tags, dietary flags, nutrition numbers and the price
//! tier. All inputs arrive as multipart text fields.

use std::collections::HashMap;

use crate::error::ApiError;
use crate::foods::repo::{Dietary, Nutrition};

pub const PRICE_TIERS: [&str; 4] = ["₹", "₹₹", "₹₹₹", "₹₹₹₹"];
pub const DEFAULT_PRICE_TIER: &str = "₹₹";
pub const MAX_TAGS: usize = 10;

/// Fields that survived validation, ready to persist.
#[derive(Debug, PartialEq)]
pub struct ValidatedFood {
    pub title: String,
    pub description: String,
    pub cuisine_type: String,
    pub vendor_name: String,
    pub address: String,
    pub city: String,
    pub price: f64,
    pub price_range: String,
    pub tags: Vec<String>,
    pub dietary: Dietary,
    pub nutrition: Nutrition,
}

type Fields = HashMap<String, Vec<String>>;

fn first_text<'a>(fields: &'a Fields, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(|v| v.first())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

fn require(fields: &Fields, key: &str, message: &str) -> Result<String, ApiError> {
    first_text(fields, key)
        .map(str::to_string)
        .ok_or_else(|| ApiError::Validation(message.into()))
}

/// Validate and normalize a create submission. Required fields are checked
/// in a fixed order and the first failure wins: title, description,
/// cuisineType, vendorName, address, city, price, images.
pub fn validate_submission(fields: &Fields, image_count: usize) -> Result<ValidatedFood, ApiError> {
    let title = require(fields, "title", "Title is required")?;
    let description = require(fields, "description", "Description is required")?;
    let cuisine_type = require(fields, "cuisineType", "Cuisine type is required")?;
    let vendor_name = require(fields, "vendorName", "Vendor name is required")?;
    let address = require(fields, "address", "Address is required")?;
    let city = require(fields, "city", "City is required")?;

    let price = first_text(fields, "price")
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| ApiError::Validation("Valid price is required".into()))?;

    if image_count == 0 {
        return Err(ApiError::Validation("At least one image is required".into()));
    }

    Ok(ValidatedFood {
        title,
        description,
        cuisine_type,
        vendor_name,
        address,
        city,
        price,
        price_range: coerce_price_range(first_text(fields, "priceRange")).to_string(),
        tags: normalize_tags(fields.get("tags").map(Vec::as_slice).unwrap_or_default()),
        dietary: parse_dietary(fields),
        nutrition: parse_nutrition(fields),
    })
}

/// Unknown tiers fall back to the mid tier rather than failing the request.
pub fn coerce_price_range(value: Option<&str>) -> &'static str {
    match value {
        Some(v) => PRICE_TIERS
            .iter()
            .find(|tier| **tier == v)
            .copied()
            .unwrap_or(DEFAULT_PRICE_TIER),
        None => DEFAULT_PRICE_TIER,
    }
}

/// Tags come either as repeated fields (a list) or as one comma-separated
/// string. Trimmed, empties dropped, capped at ten.
pub fn normalize_tags(values: &[String]) -> Vec<String> {
    let raw: Vec<&str> = if values.len() > 1 {
        values.iter().map(String::as_str).collect()
    } else {
        values
            .first()
            .map(|s| s.split(',').collect())
            .unwrap_or_default()
    };
    raw.into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .take(MAX_TAGS)
        .collect()
}

/// A flag is set only by the literal string "true".
fn flag(fields: &Fields, key: &str) -> bool {
    first_text(fields, key) == Some("true")
}

fn parse_dietary(fields: &Fields) -> Dietary {
    Dietary {
        vegetarian: flag(fields, "vegetarian"),
        vegan: flag(fields, "vegan"),
        glutenfree: flag(fields, "glutenfree"),
        halal: flag(fields, "halal"),
        kosher: flag(fields, "kosher"),
    }
}

/// Optional non-negative numbers; anything unparseable or negative is
/// treated as not provided.
fn nutrient(fields: &Fields, key: &str) -> Option<f64> {
    first_text(fields, key)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n >= 0.0)
}

fn parse_nutrition(fields: &Fields) -> Nutrition {
    Nutrition {
        calories: nutrient(fields, "calories"),
        protein: nutrient(fields, "protein"),
        carbs: nutrient(fields, "carbs"),
        fat: nutrient(fields, "fat"),
        fiber: nutrient(fields, "fiber"),
    }
}
