//! Daily calorie and macro targets from a user's physical profile.
//!
//! BMR uses the Mifflin-St Jeor equation; the activity multiplier turns it
//! into a daily need, which the primary goal then shifts by ±500 kcal and
//! splits into protein/carbs/fat at 4/4/9 kcal per gram.

use serde::{Deserialize, Serialize};

use super::round_to;

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

const GOAL_ADJUSTMENT_KCAL: f64 = 500.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Very,
    Extra,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryGoal {
    LoseWeight,
    MaintainWeight,
    GainWeight,
    BuildMuscle,
    ImproveHealth,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

impl ActivityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Very => "very",
            ActivityLevel::Extra => "extra",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "very" => Some(ActivityLevel::Very),
            "extra" => Some(ActivityLevel::Extra),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Very => 1.725,
            ActivityLevel::Extra => 1.9,
        }
    }
}

impl PrimaryGoal {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimaryGoal::LoseWeight => "lose_weight",
            PrimaryGoal::MaintainWeight => "maintain_weight",
            PrimaryGoal::GainWeight => "gain_weight",
            PrimaryGoal::BuildMuscle => "build_muscle",
            PrimaryGoal::ImproveHealth => "improve_health",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lose_weight" => Some(PrimaryGoal::LoseWeight),
            "maintain_weight" => Some(PrimaryGoal::MaintainWeight),
            "gain_weight" => Some(PrimaryGoal::GainWeight),
            "build_muscle" => Some(PrimaryGoal::BuildMuscle),
            "improve_health" => Some(PrimaryGoal::ImproveHealth),
            _ => None,
        }
    }

    fn calorie_adjustment(self) -> f64 {
        match self {
            PrimaryGoal::LoseWeight => -GOAL_ADJUSTMENT_KCAL,
            PrimaryGoal::GainWeight | PrimaryGoal::BuildMuscle => GOAL_ADJUSTMENT_KCAL,
            PrimaryGoal::MaintainWeight | PrimaryGoal::ImproveHealth => 0.0,
        }
    }

    /// (protein, carbs, fat) shares of total calories.
    fn macro_ratios(self) -> (f64, f64, f64) {
        match self {
            PrimaryGoal::BuildMuscle => (0.35, 0.40, 0.25),
            PrimaryGoal::LoseWeight => (0.30, 0.35, 0.35),
            _ => (0.25, 0.45, 0.30),
        }
    }
}

/// Physical inputs to goal calculation. Every field may still be unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhysicalProfile {
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub primary_goal: Option<PrimaryGoal>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NutritionGoals {
    pub calorie_goal: i32,
    pub protein_goal: f64,
    pub carbs_goal: f64,
    pub fat_goal: f64,
}

impl PhysicalProfile {
    /// Weight, height, age and gender are all present.
    pub fn is_complete(&self) -> bool {
        self.weight_kg.is_some()
            && self.height_cm.is_some()
            && self.age.is_some()
            && self.gender.is_some()
    }

    /// Names of the inputs goal calculation still needs, in a fixed order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("age", self.age.is_none()),
            ("weight_kg", self.weight_kg.is_none()),
            ("height_cm", self.height_cm.is_none()),
            ("gender", self.gender.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, missing)| missing.then_some(field))
        .collect()
    }

    /// Basal metabolic rate in kcal/day, rounded to 2 decimals.
    pub fn bmr(&self) -> Option<f64> {
        let weight = self.weight_kg?;
        let height = self.height_cm?;
        let age = f64::from(self.age?);
        let offset = match self.gender? {
            Gender::Male => 5.0,
            Gender::Female | Gender::Other => -161.0,
        };
        Some(round_to(10.0 * weight + 6.25 * height - 5.0 * age + offset, 2))
    }

    /// BMR scaled by activity, rounded to 2 decimals. Unset activity counts
    /// as moderate.
    pub fn daily_calories(&self) -> Option<f64> {
        let multiplier = self
            .activity_level
            .map(ActivityLevel::multiplier)
            .unwrap_or(ActivityLevel::Moderate.multiplier());
        self.bmr().map(|bmr| round_to(bmr * multiplier, 2))
    }

    /// Goal-adjusted calorie and macro targets. `None` until the profile is
    /// complete.
    pub fn goals(&self) -> Option<NutritionGoals> {
        let daily = self.daily_calories()?;
        let goal = self.primary_goal.unwrap_or(PrimaryGoal::ImproveHealth);
        let calories = daily + goal.calorie_adjustment();
        let (protein, carbs, fat) = goal.macro_ratios();

        Some(NutritionGoals {
            calorie_goal: calories.round_ties_even() as i32,
            protein_goal: (calories * protein / KCAL_PER_G_PROTEIN).round_ties_even(),
            carbs_goal: (calories * carbs / KCAL_PER_G_CARBS).round_ties_even(),
            fat_goal: (calories * fat / KCAL_PER_G_FAT).round_ties_even(),
        })
    }
}

pub fn compute_goals(profile: &PhysicalProfile) -> Option<NutritionGoals> {
    profile.goals()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_profile() -> PhysicalProfile {
        PhysicalProfile {
            age: Some(30),
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            gender: Some(Gender::Male),
            activity_level: Some(ActivityLevel::Moderate),
            primary_goal: Some(PrimaryGoal::MaintainWeight),
        }
    }

    #[test]
    fn incomplete_profiles_have_no_goals() {
        let full = reference_profile();
        let variants = [
            PhysicalProfile { age: None, ..full.clone() },
            PhysicalProfile { weight_kg: None, ..full.clone() },
            PhysicalProfile { height_cm: None, ..full.clone() },
            PhysicalProfile { gender: None, ..full.clone() },
        ];
        for (p, field) in variants.into_iter().zip(["age", "weight_kg", "height_cm", "gender"]) {
            assert!(!p.is_complete());
            assert_eq!(p.missing_fields(), vec![field]);
            assert_eq!(p.bmr(), None);
            assert_eq!(p.daily_calories(), None);
            assert_eq!(compute_goals(&p), None);
        }
        assert_eq!(compute_goals(&PhysicalProfile::default()), None);
        assert_eq!(
            PhysicalProfile::default().missing_fields(),
            vec!["age", "weight_kg", "height_cm", "gender"]
        );
        assert!(full.missing_fields().is_empty());
    }

    #[test]
    fn mifflin_st_jeor_bmr() {
        let male = reference_profile();
        assert_eq!(male.bmr(), Some(1648.75));

        let female = PhysicalProfile {
            gender: Some(Gender::Female),
            ..male.clone()
        };
        assert_eq!(female.bmr(), Some(1482.75));

        let other = PhysicalProfile {
            gender: Some(Gender::Other),
            ..male
        };
        assert_eq!(other.bmr(), female.bmr());
    }

    #[test]
    fn activity_multiplier_scales_bmr() {
        let p = reference_profile();
        assert_eq!(p.daily_calories(), Some(2555.56));

        let sedentary = PhysicalProfile {
            activity_level: Some(ActivityLevel::Sedentary),
            ..p.clone()
        };
        assert_eq!(sedentary.daily_calories(), Some(1978.5));

        let unset = PhysicalProfile {
            activity_level: None,
            ..p
        };
        assert_eq!(unset.daily_calories(), Some(2555.56));
    }

    #[test]
    fn maintain_weight_uses_balanced_split() {
        let goals = compute_goals(&reference_profile()).unwrap();
        assert_eq!(goals.calorie_goal, 2556);
        assert_eq!(goals.protein_goal, 160.0);
        assert_eq!(goals.carbs_goal, 288.0);
        assert_eq!(goals.fat_goal, 85.0);
    }

    #[test]
    fn build_muscle_adds_surplus_and_protein() {
        let p = PhysicalProfile {
            primary_goal: Some(PrimaryGoal::BuildMuscle),
            ..reference_profile()
        };
        let goals = compute_goals(&p).unwrap();
        let c = 2555.56 + 500.0;
        assert_eq!(goals.calorie_goal, 3056);
        assert_eq!(goals.protein_goal, (c * 0.35 / 4.0_f64).round_ties_even());
        assert_eq!(goals.carbs_goal, (c * 0.40 / 4.0_f64).round_ties_even());
        assert_eq!(goals.fat_goal, (c * 0.25 / 9.0_f64).round_ties_even());

        let macro_kcal = goals.protein_goal * 4.0 + goals.carbs_goal * 4.0 + goals.fat_goal * 9.0;
        assert!((macro_kcal - c).abs() <= 3.0, "macro kcal {macro_kcal} vs {c}");
    }

    #[test]
    fn lose_weight_applies_deficit() {
        let p = PhysicalProfile {
            primary_goal: Some(PrimaryGoal::LoseWeight),
            ..reference_profile()
        };
        let goals = compute_goals(&p).unwrap();
        assert_eq!(goals.calorie_goal, 2056);
        assert_eq!(goals.protein_goal, 154.0);
        assert_eq!(goals.carbs_goal, 180.0);
        assert_eq!(goals.fat_goal, 80.0);
    }

    #[test]
    fn half_calorie_rounds_to_even() {
        let p = PhysicalProfile {
            age: Some(25),
            weight_kg: Some(50.0),
            height_cm: Some(151.0),
            gender: Some(Gender::Male),
            activity_level: Some(ActivityLevel::Sedentary),
            primary_goal: None,
        };
        assert_eq!(p.bmr(), Some(1323.75));
        assert_eq!(p.daily_calories(), Some(1588.5));
        let goals = compute_goals(&p).unwrap();
        assert_eq!(goals.calorie_goal, 1588);
    }

    #[test]
    fn enum_names_round_trip_through_storage_strings() {
        for level in ["sedentary", "light", "moderate", "very", "extra"] {
            assert_eq!(ActivityLevel::parse(level).unwrap().as_str(), level);
        }
        assert_eq!(ActivityLevel::parse("couch"), None);
        assert_eq!(PrimaryGoal::parse("build_muscle"), Some(PrimaryGoal::BuildMuscle));
        assert_eq!(Gender::parse(""), None);
    }
}
