use serde::Serialize;

use crate::foods::repo::Food;

#[derive(Debug, Serialize)]
pub struct CreateFoodResponse {
    pub success: bool,
    pub message: String,
    pub food: Food,
}

#[derive(Debug, Serialize)]
pub struct FoodListResponse {
    pub success: bool,
    pub foods: Vec<Food>,
}
