use anyhow::Context;
use sqlx::{types::Json, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::meals::repo_types::{Meal, NewMeal};

const MEAL_COLUMNS: &str = r#"
    id, user_id, description, meal_type, calories, protein_g, carbs_g, fat_g,
    fiber_g, confidence_score, recommendations, parsed_foods, logged_at
"#;

pub async fn insert_meal(db: &PgPool, meal: NewMeal<'_>) -> anyhow::Result<Meal> {
    let sql = format!(
        r#"
        INSERT INTO meals (user_id, description, meal_type, calories, protein_g, carbs_g,
                           fat_g, fiber_g, confidence_score, recommendations, parsed_foods,
                           raw_analysis)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {MEAL_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, Meal>(&sql)
        .bind(meal.user_id)
        .bind(meal.description)
        .bind(meal.meal_type)
        .bind(meal.calories)
        .bind(meal.protein_g)
        .bind(meal.carbs_g)
        .bind(meal.fat_g)
        .bind(meal.fiber_g)
        .bind(meal.confidence_score)
        .bind(Json(meal.recommendations))
        .bind(Json(meal.parsed_foods))
        .bind(Json(meal.raw_analysis))
        .fetch_one(db)
        .await
        .context("insert meal")?;
    Ok(row)
}

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Meal>> {
    let sql = format!(
        r#"
        SELECT {MEAL_COLUMNS}
        FROM meals
        WHERE user_id = $1
        ORDER BY logged_at DESC
        LIMIT $2 OFFSET $3
        "#
    );
    let rows = sqlx::query_as::<_, Meal>(&sql)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

/// Scoped to the owner: another user's meal reads as absent.
pub async fn get(db: &PgPool, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
    let sql = format!("SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1 AND user_id = $2");
    let row = sqlx::query_as::<_, Meal>(&sql)
        .bind(meal_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Meals logged in `[from, to)`, oldest first.
pub async fn list_between(
    db: &PgPool,
    user_id: Uuid,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> anyhow::Result<Vec<Meal>> {
    let sql = format!(
        r#"
        SELECT {MEAL_COLUMNS}
        FROM meals
        WHERE user_id = $1 AND logged_at >= $2 AND logged_at < $3
        ORDER BY logged_at ASC
        "#
    );
    let rows = sqlx::query_as::<_, Meal>(&sql)
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(db)
        .await?;
    Ok(rows)
}
