use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::profile::repo_types::UserProfile;

const PROFILE_COLUMNS: &str = r#"
    user_id, age, weight_kg, height_cm, gender, activity_level, primary_goal,
    dietary_restrictions, allergies, calorie_goal, protein_goal, carbs_goal,
    fat_goal, is_profile_complete, updated_at
"#;

/// Empty profile for a freshly created account. Runs inside the account
/// creation transaction.
pub async fn create_empty_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> anyhow::Result<()> {
    sqlx::query(r#"INSERT INTO user_profiles (user_id) VALUES ($1)"#)
        .bind(user_id)
        .execute(&mut **tx)
        .await
        .context("insert empty profile")?;
    Ok(())
}

pub async fn get(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = $1");
    let profile = sqlx::query_as::<_, UserProfile>(&sql)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(profile)
}

/// Plain read inside a caller's transaction.
pub async fn find_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<Option<UserProfile>, sqlx::Error> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = $1");
    sqlx::query_as::<_, UserProfile>(&sql)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await
}

/// Row-locks the profile until the transaction ends.
pub async fn lock_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> anyhow::Result<Option<UserProfile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = $1 FOR UPDATE");
    let profile = sqlx::query_as::<_, UserProfile>(&sql)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await
        .context("lock profile")?;
    Ok(profile)
}

/// Writes every mutable column, goals included, in one statement.
pub async fn save_tx(
    tx: &mut Transaction<'_, Postgres>,
    profile: &UserProfile,
) -> anyhow::Result<UserProfile> {
    let sql = format!(
        r#"
        UPDATE user_profiles
        SET age = $2, weight_kg = $3, height_cm = $4, gender = $5,
            activity_level = $6, primary_goal = $7,
            dietary_restrictions = $8, allergies = $9,
            calorie_goal = $10, protein_goal = $11, carbs_goal = $12, fat_goal = $13,
            is_profile_complete = $14, updated_at = now()
        WHERE user_id = $1
        RETURNING {PROFILE_COLUMNS}
        "#
    );
    let saved = sqlx::query_as::<_, UserProfile>(&sql)
        .bind(profile.user_id)
        .bind(profile.age)
        .bind(profile.weight_kg)
        .bind(profile.height_cm)
        .bind(profile.gender.as_deref())
        .bind(&profile.activity_level)
        .bind(&profile.primary_goal)
        .bind(&profile.dietary_restrictions)
        .bind(&profile.allergies)
        .bind(profile.calorie_goal)
        .bind(profile.protein_goal)
        .bind(profile.carbs_goal)
        .bind(profile.fat_goal)
        .bind(profile.is_profile_complete)
        .fetch_one(&mut **tx)
        .await
        .context("update profile")?;
    Ok(saved)
}
