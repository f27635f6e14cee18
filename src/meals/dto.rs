use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::meals::repo_types::Meal;
use crate::nutrition::{estimator::MealAnalysis, parser::ParsedFoodItem};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeMealRequest {
    pub description: String,
    #[serde(default)]
    pub meal_type: MealType,
}

/// Today's running totals after a meal was logged.
#[derive(Debug, Serialize)]
pub struct DayProgressBrief {
    pub date: Date,
    pub total_calories: f64,
    pub calorie_goal: Option<i32>,
    pub adherence_score: f64,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeMealResponse {
    pub meal_id: Uuid,
    pub analysis: MealAnalysis,
    pub recommendations: Vec<String>,
    pub confidence_score: f64,
    pub parsed_foods: Vec<ParsedFoodItem>,
    pub daily_progress: DayProgressBrief,
}

#[derive(Debug, Serialize)]
pub struct MealListItem {
    pub id: Uuid,
    pub description: String,
    pub meal_type: String,
    pub calories: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
}

impl From<Meal> for MealListItem {
    fn from(m: Meal) -> Self {
        Self {
            id: m.id,
            description: m.description,
            meal_type: m.meal_type,
            calories: m.calories,
            logged_at: m.logged_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealDetails {
    pub id: Uuid,
    pub description: String,
    pub meal_type: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub confidence_score: f64,
    pub recommendations: Vec<String>,
    pub parsed_foods: Vec<ParsedFoodItem>,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
}

impl From<Meal> for MealDetails {
    fn from(m: Meal) -> Self {
        Self {
            id: m.id,
            description: m.description,
            meal_type: m.meal_type,
            calories: m.calories,
            protein_g: m.protein_g,
            carbs_g: m.carbs_g,
            fat_g: m.fat_g,
            fiber_g: m.fiber_g,
            confidence_score: m.confidence_score,
            recommendations: m.recommendations.0,
            parsed_foods: m.parsed_foods.0,
            logged_at: m.logged_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SummaryTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Serialize)]
pub struct DailySummary {
    pub date: Date,
    pub meals_count: usize,
    pub totals: SummaryTotals,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 20 }

pub const MAX_PAGE_SIZE: i64 = 100;

impl Pagination {
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, MAX_PAGE_SIZE), self.offset.max(0))
    }
}
