use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::parser::ParsedFoodItem;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub meal_type: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub confidence_score: f64,
    pub recommendations: Json<Vec<String>>,
    pub parsed_foods: Json<Vec<ParsedFoodItem>>,
    pub logged_at: OffsetDateTime,
}

/// Values for a meal insert. The estimate is complete before this is built.
#[derive(Debug)]
pub struct NewMeal<'a> {
    pub user_id: Uuid,
    pub description: &'a str,
    pub meal_type: &'a str,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub confidence_score: f64,
    pub recommendations: &'a [String],
    pub parsed_foods: &'a [ParsedFoodItem],
    pub raw_analysis: serde_json::Value,
}
