use async_trait::async_trait;

use super::{Estimator, MealAnalysis};
use crate::nutrition::parser::ParsedFoodItem;

const PROTEIN_WORDS: [&str; 4] = ["chicken", "beef", "fish", "turkey"];
const CARB_WORDS: [&str; 4] = ["rice", "pasta", "bread", "potato"];
const FIBER_WORDS: [&str; 4] = ["salad", "vegetables", "broccoli", "spinach"];

const CONFIDENCE: f64 = 0.75;

/// Deterministic keyword heuristic. Also the fallback for the external
/// strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockEstimator;

impl MockEstimator {
    pub fn analyze(&self, description: &str) -> MealAnalysis {
        let text = description.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| text.contains(w));

        let mut calories = 300.0;
        let mut protein_g = 20.0;
        let mut carbs_g = 35.0;
        let fat_g = 10.0;
        let mut fiber_g = 4.0;

        if mentions(&PROTEIN_WORDS) {
            protein_g += 15.0;
            calories += 100.0;
        }
        if mentions(&CARB_WORDS) {
            carbs_g += 30.0;
            calories += 120.0;
        }
        if mentions(&FIBER_WORDS) {
            fiber_g += 3.0;
            calories += 30.0;
        }

        let mut recommendations = Vec::new();
        if protein_g < 25.0 {
            recommendations.push("Consider adding more protein for muscle maintenance".to_string());
        }
        if fiber_g < 5.0 {
            recommendations.push("Add more vegetables or whole grains for fiber".to_string());
        }
        if carbs_g > 60.0 {
            recommendations.push(
                "High carb content - consider reducing portion sizes if weight loss is a goal"
                    .to_string(),
            );
        }
        if recommendations.is_empty() {
            recommendations.push("Well-balanced meal with good macro distribution".to_string());
        }

        MealAnalysis {
            calories,
            protein_g,
            carbs_g,
            fat_g,
            fiber_g,
            recommendations,
            confidence_score: CONFIDENCE,
        }
    }
}

#[async_trait]
impl Estimator for MockEstimator {
    async fn estimate(&self, description: &str, _foods: &[ParsedFoodItem]) -> MealAnalysis {
        self.analyze(description)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::parser::parse_meal;

    #[tokio::test]
    async fn keyword_groups_adjust_baseline() {
        let description = "grilled chicken with rice and broccoli";
        let a = MockEstimator
            .estimate(description, &parse_meal(description))
            .await;
        assert_eq!(a.calories, 550.0);
        assert_eq!(a.protein_g, 35.0);
        assert_eq!(a.carbs_g, 65.0);
        assert_eq!(a.fat_g, 10.0);
        assert_eq!(a.fiber_g, 7.0);
        assert_eq!(a.confidence_score, 0.75);
        assert_eq!(a.recommendations.len(), 1);
        assert!(a.recommendations[0].starts_with("High carb content"));
    }

    #[test]
    fn each_group_counts_once() {
        let a = MockEstimator.analyze("Chicken, beef, fish and turkey");
        assert_eq!(a.protein_g, 35.0);
        assert_eq!(a.calories, 400.0);
    }

    #[test]
    fn plain_meal_gets_protein_and_fiber_advice() {
        let a = MockEstimator.analyze("oatmeal");
        assert_eq!(a.calories, 300.0);
        assert_eq!(
            a.recommendations,
            vec![
                "Consider adding more protein for muscle maintenance".to_string(),
                "Add more vegetables or whole grains for fiber".to_string(),
            ]
        );
    }

    #[test]
    fn balanced_meal_gets_positive_message() {
        let a = MockEstimator.analyze("turkey and spinach salad");
        assert_eq!(a.calories, 430.0);
        assert_eq!(
            a.recommendations,
            vec!["Well-balanced meal with good macro distribution".to_string()]
        );
    }
}
