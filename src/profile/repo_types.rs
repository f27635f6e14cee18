use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::{
    adherence::GoalSnapshot,
    goals::{ActivityLevel, Gender, NutritionGoals, PhysicalProfile, PrimaryGoal},
};

/// One row of `user_profiles`. Enum columns are stored as their snake_case
/// names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub gender: Option<String>,
    pub activity_level: String,
    pub primary_goal: String,
    pub dietary_restrictions: Json<Vec<String>>,
    pub allergies: Json<Vec<String>>,
    pub calorie_goal: Option<i32>,
    pub protein_goal: Option<f64>,
    pub carbs_goal: Option<f64>,
    pub fat_goal: Option<f64>,
    pub is_profile_complete: bool,
    pub updated_at: OffsetDateTime,
}

impl UserProfile {
    pub fn physical(&self) -> PhysicalProfile {
        PhysicalProfile {
            age: self.age,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            gender: self.gender.as_deref().and_then(Gender::parse),
            activity_level: ActivityLevel::parse(&self.activity_level),
            primary_goal: PrimaryGoal::parse(&self.primary_goal),
        }
    }

    pub fn set_goals(&mut self, goals: NutritionGoals) {
        self.calorie_goal = Some(goals.calorie_goal);
        self.protein_goal = Some(goals.protein_goal);
        self.carbs_goal = Some(goals.carbs_goal);
        self.fat_goal = Some(goals.fat_goal);
    }

    /// Copy of the current goal cache, for stamping onto a tracked day.
    pub fn goal_snapshot(&self) -> GoalSnapshot {
        GoalSnapshot {
            calories: self.calorie_goal,
            protein_g: self.protein_goal,
            carbs_g: self.carbs_goal,
            fat_g: self.fat_goal,
        }
    }
}
