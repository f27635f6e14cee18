//! Daily progress aggregation: per-day totals from meal records, the goal
//! snapshot and adherence score, plus weekly/monthly windows.

use anyhow::Context;
use sqlx::PgPool;
use time::{Date, Duration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::nutrition::{
    adherence::{adherence_score, DailyTotals, GoalSnapshot},
    round_to,
};
use crate::profile::repo as profile_repo;
use crate::progress::{
    dto::{ProgressResponse, ProgressSummary},
    repo,
    repo_types::DailyProgress,
};

pub const WEEK_DAYS: u32 = 7;
pub const MONTH_DAYS: u32 = 30;

const RECOMPUTE_ATTEMPTS: u32 = 3;

/// serialization_failure, unique_violation, deadlock_detected
const RETRYABLE_CODES: [&str; 3] = ["40001", "23505", "40P01"];

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// UTC `[start, end)` of a calendar day.
pub fn day_bounds(date: Date) -> (OffsetDateTime, OffsetDateTime) {
    let start = date.midnight().assume_utc();
    (start, start + Duration::days(1))
}

/// `[today - days, today]`, both ends inclusive.
pub fn window(today: Date, days: u32) -> (Date, Date) {
    (today - Duration::days(i64::from(days)), today)
}

pub fn build_daily_progress(
    user_id: Uuid,
    date: Date,
    totals: DailyTotals,
    meals_count: i32,
    goals: GoalSnapshot,
) -> DailyProgress {
    DailyProgress {
        user_id,
        date,
        total_calories: totals.calories,
        total_protein: totals.protein_g,
        total_carbs: totals.carbs_g,
        total_fat: totals.fat_g,
        total_fiber: totals.fiber_g,
        calorie_goal: goals.calories,
        protein_goal: goals.protein_g,
        carbs_goal: goals.carbs_g,
        fat_goal: goals.fat_g,
        meals_count,
        adherence_score: adherence_score(&totals, &goals),
    }
}

fn is_retryable(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|code| RETRYABLE_CODES.iter().any(|c| *c == code))
            .unwrap_or(false),
        _ => false,
    }
}

/// Advisory lock keys for one (user, date): folded user id and Julian day.
pub(crate) fn day_lock_keys(user_id: Uuid, date: Date) -> (i32, i32) {
    let (hi, lo) = user_id.as_u64_pair();
    let folded = hi ^ lo;
    let user_key = ((folded >> 32) as u32 ^ folded as u32) as i32;
    (user_key, date.to_julian_day())
}

async fn recompute_once(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
) -> Result<DailyProgress, sqlx::Error> {
    let (from, to) = day_bounds(date);
    let mut tx = db.begin().await?;

    // held until commit; a concurrent recompute of the same day sums after us
    repo::lock_day_tx(&mut tx, day_lock_keys(user_id, date)).await?;

    let sums = repo::sum_meals_tx(&mut tx, user_id, from, to).await?;
    let goals = profile_repo::find_tx(&mut tx, user_id)
        .await?
        .map(|p| p.goal_snapshot())
        .unwrap_or_default();

    let record = build_daily_progress(user_id, date, sums.totals(), sums.meals_count, goals);
    let saved = repo::upsert_tx(&mut tx, &record).await?;
    tx.commit().await?;
    Ok(saved)
}

/// Re-derives the day from its meal records and overwrites the stored row.
/// Running it again without new meals yields the same record, and
/// concurrent runs for one day are serialized.
pub async fn recompute(db: &PgPool, user_id: Uuid, date: Date) -> anyhow::Result<DailyProgress> {
    let mut attempt = 1;
    loop {
        match recompute_once(db, user_id, date).await {
            Ok(saved) => {
                debug!(user_id = %user_id, %date, adherence = saved.adherence_score, "daily progress saved");
                return Ok(saved);
            }
            Err(e) if attempt < RECOMPUTE_ATTEMPTS && is_retryable(&e) => {
                warn!(error = %e, user_id = %user_id, %date, attempt, "daily progress recompute conflict, retrying");
                attempt += 1;
            }
            Err(e) => return Err(e).context("recompute daily progress"),
        }
    }
}

/// `None` when the window holds no records.
pub fn summarize(records: &[DailyProgress], days: u32) -> Option<ProgressSummary> {
    if records.is_empty() || days == 0 {
        return None;
    }
    let denom = f64::from(days);
    let calories: f64 = records.iter().map(|r| r.total_calories).sum();
    let protein: f64 = records.iter().map(|r| r.total_protein).sum();
    let adherence: f64 = records.iter().map(|r| r.adherence_score).sum();

    Some(ProgressSummary {
        days,
        days_tracked: records.len(),
        avg_calories: round_to(calories / denom, 1),
        avg_protein: round_to(protein / denom, 1),
        avg_adherence: round_to(adherence / denom, 1),
    })
}

pub async fn progress_window(
    db: &PgPool,
    user_id: Uuid,
    days: u32,
) -> anyhow::Result<ProgressResponse> {
    let (from, to) = window(today(), days);
    let records = repo::list_range(db, user_id, from, to).await?;
    let summary = summarize(&records, days);
    Ok(ProgressResponse {
        from,
        to,
        records,
        summary,
    })
}
