use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::goals::{ActivityLevel, Gender, PrimaryGoal};
use crate::profile::repo_types::UserProfile;

/// Partial profile update; absent fields keep their stored value.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub primary_goal: Option<PrimaryGoal>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub gender: Option<String>,
    pub activity_level: String,
    pub primary_goal: String,
    pub dietary_restrictions: Vec<String>,
    pub allergies: Vec<String>,
    pub calorie_goal: Option<i32>,
    pub protein_goal: Option<f64>,
    pub carbs_goal: Option<f64>,
    pub fat_goal: Option<f64>,
    pub is_profile_complete: bool,
    /// Inputs still needed before goals can be computed.
    pub missing_fields: Vec<&'static str>,
    pub bmr: Option<f64>,
    pub recommended_calories: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<UserProfile> for ProfileResponse {
    fn from(p: UserProfile) -> Self {
        let physical = p.physical();
        Self {
            user_id: p.user_id,
            age: p.age,
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            gender: p.gender,
            activity_level: p.activity_level,
            primary_goal: p.primary_goal,
            dietary_restrictions: p.dietary_restrictions.0,
            allergies: p.allergies.0,
            calorie_goal: p.calorie_goal,
            protein_goal: p.protein_goal,
            carbs_goal: p.carbs_goal,
            fat_goal: p.fat_goal,
            is_profile_complete: p.is_profile_complete,
            missing_fields: physical.missing_fields(),
            bmr: physical.bmr(),
            recommended_calories: physical.daily_calories(),
            updated_at: p.updated_at,
        }
    }
}
