//! Daily adherence scoring: how closely a day's intake met its goals.

use serde::{Deserialize, Serialize};

use super::round_to;

/// Calories above this share of the goal trigger the overshoot penalty.
const OVERSHOOT_RATIO: f64 = 1.2;
const OVERSHOOT_PENALTY: f64 = 0.8;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
}

/// Goals copied onto a tracked day. A copy, so later goal edits leave past
/// days untouched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct GoalSnapshot {
    pub calories: Option<i32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

/// Score in `[0, 100]`, rounded to 1 decimal. Each component is capped at
/// 100; only calorie overshoot is penalised.
pub fn adherence_score(totals: &DailyTotals, goals: &GoalSnapshot) -> f64 {
    let goal_calories = match goals.calories {
        Some(c) if c > 0 => f64::from(c),
        _ => return 0.0,
    };

    let calorie_adherence = (totals.calories / goal_calories * 100.0).min(100.0);
    let protein_adherence = match goals.protein_g {
        Some(p) if p > 0.0 => (totals.protein_g / p * 100.0).min(100.0),
        _ => 100.0,
    };

    let mut score = (calorie_adherence + protein_adherence) / 2.0;
    if totals.calories > goal_calories * OVERSHOOT_RATIO {
        score *= OVERSHOOT_PENALTY;
    }
    round_to(score, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goals(calories: i32, protein: Option<f64>) -> GoalSnapshot {
        GoalSnapshot {
            calories: Some(calories),
            protein_g: protein,
            ..GoalSnapshot::default()
        }
    }

    fn totals(calories: f64, protein_g: f64) -> DailyTotals {
        DailyTotals {
            calories,
            protein_g,
            ..DailyTotals::default()
        }
    }

    #[test]
    fn no_calorie_goal_scores_zero() {
        let t = totals(1800.0, 90.0);
        assert_eq!(adherence_score(&t, &GoalSnapshot::default()), 0.0);
        assert_eq!(adherence_score(&t, &goals(0, Some(100.0))), 0.0);
    }

    #[test]
    fn overshoot_is_penalised() {
        let t = totals(2600.0, 150.0);
        assert_eq!(adherence_score(&t, &goals(2000, Some(150.0))), 80.0);
    }

    #[test]
    fn moderate_overshoot_is_capped_not_penalised() {
        let t = totals(2390.0, 150.0);
        assert_eq!(adherence_score(&t, &goals(2000, Some(150.0))), 100.0);
    }

    #[test]
    fn undershoot_scores_by_ratio() {
        let t = totals(1000.0, 50.0);
        assert_eq!(adherence_score(&t, &goals(2000, Some(150.0))), 41.7);
    }

    #[test]
    fn missing_protein_goal_counts_as_met() {
        let t = totals(1500.0, 0.0);
        assert_eq!(adherence_score(&t, &goals(2000, None)), 87.5);
        assert_eq!(adherence_score(&t, &goals(2000, Some(0.0))), 87.5);
    }

    #[test]
    fn tied_score_rounds_to_even_tenth() {
        // 75.0 calorie and 87.5 protein adherence average to exactly 81.25
        let t = totals(1536.0, 112.0);
        assert_eq!(adherence_score(&t, &goals(2048, Some(128.0))), 81.2);
    }
}
