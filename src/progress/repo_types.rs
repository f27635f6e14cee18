use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

use crate::nutrition::adherence::DailyTotals;

/// Sums over one day's meals.
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct MealTotalsRow {
    pub meals_count: i32,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
}

impl MealTotalsRow {
    pub fn totals(&self) -> DailyTotals {
        DailyTotals {
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
            fiber_g: self.fiber_g,
        }
    }
}

/// One row per (user, date). Goal columns are a copy taken at aggregation
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DailyProgress {
    pub user_id: Uuid,
    pub date: Date,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub total_fiber: f64,
    pub calorie_goal: Option<i32>,
    pub protein_goal: Option<f64>,
    pub carbs_goal: Option<f64>,
    pub fat_goal: Option<f64>,
    pub meals_count: i32,
    pub adherence_score: f64,
}
