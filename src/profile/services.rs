use anyhow::Context;
use sqlx::{types::Json, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::nutrition::{error::ValidationError, goals::compute_goals};
use crate::profile::{dto::ProfileUpdate, repo, repo_types::UserProfile};

pub const MIN_AGE: i32 = 13;
pub const MAX_AGE: i32 = 120;

pub fn validate(update: &ProfileUpdate) -> Result<(), ValidationError> {
    if let Some(age) = update.age {
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(ValidationError::OutOfRange {
                field: "age",
                min: MIN_AGE.into(),
                max: MAX_AGE.into(),
            });
        }
    }
    for (field, value) in [("weight_kg", update.weight_kg), ("height_cm", update.height_cm)] {
        if let Some(v) = value {
            if !v.is_finite() || v <= 0.0 {
                return Err(ValidationError::NotPositive { field });
            }
        }
    }
    Ok(())
}

/// Merges `update` into `profile`, then refreshes the completeness flag and
/// the goal cache.
pub fn apply_update(profile: &mut UserProfile, update: ProfileUpdate) {
    if let Some(age) = update.age {
        profile.age = Some(age);
    }
    if let Some(weight) = update.weight_kg {
        profile.weight_kg = Some(weight);
    }
    if let Some(height) = update.height_cm {
        profile.height_cm = Some(height);
    }
    if let Some(gender) = update.gender {
        profile.gender = Some(gender.as_str().to_string());
    }
    if let Some(level) = update.activity_level {
        profile.activity_level = level.as_str().to_string();
    }
    if let Some(goal) = update.primary_goal {
        profile.primary_goal = goal.as_str().to_string();
    }
    if let Some(restrictions) = update.dietary_restrictions {
        profile.dietary_restrictions = Json(restrictions);
    }
    if let Some(allergies) = update.allergies {
        profile.allergies = Json(allergies);
    }

    let physical = profile.physical();
    profile.is_profile_complete = physical.is_complete();
    if let Some(goals) = compute_goals(&physical) {
        debug!(user_id = %profile.user_id, calorie_goal = goals.calorie_goal, "goals recomputed");
        profile.set_goals(goals);
    }
}

/// Validates, merges and saves under a row lock. `Ok(None)` when the user has
/// no profile.
pub async fn update_profile(
    db: &PgPool,
    user_id: Uuid,
    update: ProfileUpdate,
) -> anyhow::Result<Option<UserProfile>> {
    let mut tx = db.begin().await.context("begin tx")?;
    let Some(mut profile) = repo::lock_tx(&mut tx, user_id).await? else {
        return Ok(None);
    };

    apply_update(&mut profile, update);
    let saved = repo::save_tx(&mut tx, &profile).await?;
    tx.commit().await.context("commit tx")?;

    info!(user_id = %user_id, complete = saved.is_profile_complete, "profile updated");
    Ok(Some(saved))
}
