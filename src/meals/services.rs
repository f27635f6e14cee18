use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::meals::{
    dto::{AnalyzeMealRequest, AnalyzeMealResponse, DailySummary, DayProgressBrief, SummaryTotals},
    repo,
    repo_types::{Meal, NewMeal},
};
use crate::nutrition::{
    error::ValidationError,
    estimator::{Estimator, MealAnalysis},
    parser::{parse_meal, ParsedFoodItem},
    round_to,
};
use crate::progress::services as progress;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum LogMealError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Trimmed description, or an error when nothing is left.
pub fn validate_description(description: &str) -> Result<&str, ValidationError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(trimmed)
}

/// Parse then estimate. Never fails: the estimator falls back internally.
pub async fn analyze(
    estimator: &dyn Estimator,
    description: &str,
) -> (Vec<ParsedFoodItem>, MealAnalysis) {
    let foods = parse_meal(description);
    debug!(items = foods.len(), "meal parsed");
    let analysis = estimator.estimate(description, &foods).await;
    (foods, analysis)
}

/// Analyze, persist the meal, then recompute today's progress.
pub async fn log_meal(
    state: &AppState,
    user_id: Uuid,
    req: AnalyzeMealRequest,
) -> Result<AnalyzeMealResponse, LogMealError> {
    let description = validate_description(&req.description)?;

    let (foods, analysis) = analyze(state.estimator.as_ref(), description).await;
    let raw_analysis = serde_json::to_value(&analysis).context("serialize analysis")?;

    let meal = repo::insert_meal(
        &state.db,
        NewMeal {
            user_id,
            description,
            meal_type: req.meal_type.as_str(),
            calories: analysis.calories,
            protein_g: analysis.protein_g,
            carbs_g: analysis.carbs_g,
            fat_g: analysis.fat_g,
            fiber_g: analysis.fiber_g,
            confidence_score: analysis.confidence_score,
            recommendations: &analysis.recommendations,
            parsed_foods: &foods,
            raw_analysis,
        },
    )
    .await?;

    let day = meal.logged_at.date();
    let record = progress::recompute(&state.db, user_id, day).await?;

    info!(
        user_id = %user_id,
        meal_id = %meal.id,
        estimator = state.estimator.name(),
        calories = analysis.calories,
        "meal logged"
    );

    Ok(AnalyzeMealResponse {
        meal_id: meal.id,
        recommendations: analysis.recommendations.clone(),
        confidence_score: analysis.confidence_score,
        analysis,
        parsed_foods: foods,
        daily_progress: DayProgressBrief {
            date: record.date,
            total_calories: record.total_calories,
            calorie_goal: record.calorie_goal,
            adherence_score: record.adherence_score,
        },
    })
}

/// Totals over `meals`, each rounded to 1 decimal.
pub fn summarize(meals: &[Meal]) -> SummaryTotals {
    let (calories, protein, carbs, fat) = meals.iter().fold((0.0, 0.0, 0.0, 0.0), |acc, m| {
        (
            acc.0 + m.calories,
            acc.1 + m.protein_g,
            acc.2 + m.carbs_g,
            acc.3 + m.fat_g,
        )
    });
    SummaryTotals {
        calories: round_to(calories, 1),
        protein: round_to(protein, 1),
        carbs: round_to(carbs, 1),
        fat: round_to(fat, 1),
    }
}

pub async fn daily_summary(state: &AppState, user_id: Uuid) -> anyhow::Result<DailySummary> {
    let date = progress::today();
    let (from, to) = progress::day_bounds(date);
    let meals = repo::list_between(&state.db, user_id, from, to).await?;
    Ok(DailySummary {
        date,
        meals_count: meals.len(),
        totals: summarize(&meals),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::estimator::MockEstimator;
    use sqlx::types::Json;
    use time::OffsetDateTime;

    fn meal(calories: f64, protein_g: f64) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            description: "test".into(),
            meal_type: "snack".into(),
            calories,
            protein_g,
            carbs_g: 10.05,
            fat_g: 1.0,
            fiber_g: 0.0,
            confidence_score: 0.75,
            recommendations: Json(vec![]),
            parsed_foods: Json(vec![]),
            logged_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn blank_description_is_rejected() {
        assert_eq!(
            validate_description("   \n"),
            Err(ValidationError::EmptyDescription)
        );
        assert_eq!(validate_description("  oats "), Ok("oats"));
    }

    #[tokio::test]
    async fn analyze_parses_then_estimates() {
        let (foods, analysis) = analyze(
            &MockEstimator,
            "2 cups rice and grilled chicken, with a side of broccoli",
        )
        .await;
        assert_eq!(foods.len(), 3);
        assert_eq!(foods[0].food_name, "rice");
        assert_eq!(analysis.calories, 550.0);
        assert_eq!(analysis.confidence_score, 0.75);
    }

    #[test]
    fn summarize_sums_and_rounds() {
        let totals = summarize(&[meal(550.0, 35.0), meal(300.25, 20.0)]);
        assert_eq!(totals.calories, 850.2);
        assert_eq!(totals.protein, 55.0);
        assert_eq!(totals.carbs, 20.1);
        assert_eq!(totals.fat, 2.0);
    }

    #[test]
    fn summarize_empty_day_is_zero() {
        let totals = summarize(&[]);
        assert_eq!(totals.calories, 0.0);
        assert_eq!(totals.fat, 0.0);
    }
}
