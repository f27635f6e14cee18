use sqlx::{PgPool, Postgres, Transaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::progress::repo_types::{DailyProgress, MealTotalsRow};

const PROGRESS_COLUMNS: &str = r#"
    user_id, date, total_calories, total_protein, total_carbs, total_fat,
    total_fiber, calorie_goal, protein_goal, carbs_goal, fat_goal,
    meals_count, adherence_score
"#;

/// Serializes recomputes of one (user, date) until the transaction ends.
pub async fn lock_day_tx(
    tx: &mut Transaction<'_, Postgres>,
    keys: (i32, i32),
) -> Result<(), sqlx::Error> {
    sqlx::query(r#"SELECT pg_advisory_xact_lock($1, $2)"#)
        .bind(keys.0)
        .bind(keys.1)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Meal sums over `[from, to)`. Nulls count as zero.
pub async fn sum_meals_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> Result<MealTotalsRow, sqlx::Error> {
    sqlx::query_as::<_, MealTotalsRow>(
        r#"
        SELECT COUNT(*)::int4                            AS meals_count,
               COALESCE(SUM(calories), 0)::float8        AS calories,
               COALESCE(SUM(protein_g), 0)::float8       AS protein_g,
               COALESCE(SUM(carbs_g), 0)::float8         AS carbs_g,
               COALESCE(SUM(fat_g), 0)::float8           AS fat_g,
               COALESCE(SUM(fiber_g), 0)::float8         AS fiber_g
        FROM meals
        WHERE user_id = $1 AND logged_at >= $2 AND logged_at < $3
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_one(&mut **tx)
    .await
}

/// Insert or overwrite the (user, date) row in one statement.
pub async fn upsert_tx(
    tx: &mut Transaction<'_, Postgres>,
    p: &DailyProgress,
) -> Result<DailyProgress, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO daily_progress (user_id, date, total_calories, total_protein, total_carbs,
                                    total_fat, total_fiber, calorie_goal, protein_goal,
                                    carbs_goal, fat_goal, meals_count, adherence_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        ON CONFLICT (user_id, date) DO UPDATE
        SET total_calories = EXCLUDED.total_calories,
            total_protein = EXCLUDED.total_protein,
            total_carbs = EXCLUDED.total_carbs,
            total_fat = EXCLUDED.total_fat,
            total_fiber = EXCLUDED.total_fiber,
            calorie_goal = EXCLUDED.calorie_goal,
            protein_goal = EXCLUDED.protein_goal,
            carbs_goal = EXCLUDED.carbs_goal,
            fat_goal = EXCLUDED.fat_goal,
            meals_count = EXCLUDED.meals_count,
            adherence_score = EXCLUDED.adherence_score,
            updated_at = now()
        RETURNING {PROGRESS_COLUMNS}
        "#
    );
    sqlx::query_as::<_, DailyProgress>(&sql)
        .bind(p.user_id)
        .bind(p.date)
        .bind(p.total_calories)
        .bind(p.total_protein)
        .bind(p.total_carbs)
        .bind(p.total_fat)
        .bind(p.total_fiber)
        .bind(p.calorie_goal)
        .bind(p.protein_goal)
        .bind(p.carbs_goal)
        .bind(p.fat_goal)
        .bind(p.meals_count)
        .bind(p.adherence_score)
        .fetch_one(&mut **tx)
        .await
}

/// Records with `from <= date <= to`, oldest first.
pub async fn list_range(
    db: &PgPool,
    user_id: Uuid,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<DailyProgress>> {
    let sql = format!(
        r#"
        SELECT {PROGRESS_COLUMNS}
        FROM daily_progress
        WHERE user_id = $1 AND date >= $2 AND date <= $3
        ORDER BY date ASC
        "#
    );
    let rows = sqlx::query_as::<_, DailyProgress>(&sql)
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(db)
        .await?;
    Ok(rows)
}
