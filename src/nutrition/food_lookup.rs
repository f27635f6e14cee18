//! External food database lookup (USDA FoodData Central).
//!
//! Lookups are advisory: network or decoding failures are logged and turned
//! into an empty result, never an error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::FoodLookupConfig;
use crate::nutrition::error::FoodLookupError;

const DATA_TYPES: &str = "Survey (FNDDS),Foundation,SR Legacy";

/// Candidate food with nutrients per 100 g.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodRecord {
    pub name: String,
    pub fdc_id: Option<i64>,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub fiber_per_100g: f64,
}

#[async_trait]
pub trait FoodLookup: Send + Sync {
    async fn search(&self, query: &str, page_size: usize) -> Vec<FoodRecord>;

    async fn get_by_id(&self, fdc_id: i64) -> Option<FoodRecord>;
}

#[derive(Debug, Deserialize)]
struct UsdaSearchResponse {
    #[serde(default)]
    foods: Vec<UsdaFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsdaFood {
    #[serde(default)]
    description: String,
    fdc_id: Option<i64>,
    #[serde(default)]
    food_nutrients: Vec<UsdaNutrient>,
}

/// Search results carry `nutrientName`/`value`; the detail endpoint nests
/// the name under `nutrient` and reports `amount`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsdaNutrient {
    nutrient_name: Option<String>,
    value: Option<f64>,
    nutrient: Option<UsdaNutrientRef>,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct UsdaNutrientRef {
    #[serde(default)]
    name: String,
}

impl UsdaNutrient {
    fn name(&self) -> String {
        self.nutrient_name
            .as_deref()
            .or(self.nutrient.as_ref().map(|n| n.name.as_str()))
            .unwrap_or_default()
            .to_lowercase()
    }

    fn amount(&self) -> f64 {
        self.value.or(self.amount).unwrap_or(0.0)
    }
}

impl UsdaFood {
    fn into_record(self) -> FoodRecord {
        let food = self;
        let mut calories = None;
        let mut protein = None;
        let mut carbs = None;
        let mut fat = None;
        let mut fiber = None;

        for nutrient in &food.food_nutrients {
            let name = nutrient.name();
            let slot = if name.contains("energy") || name.contains("calorie") {
                &mut calories
            } else if name.contains("protein") {
                &mut protein
            } else if name.contains("carbohydrate") {
                &mut carbs
            } else if name.contains("total lipid") || name.contains("fat") {
                &mut fat
            } else if name.contains("fiber") {
                &mut fiber
            } else {
                continue;
            };
            // first reported value wins
            if slot.is_none() {
                *slot = Some(nutrient.amount());
            }
        }

        FoodRecord {
            name: food.description,
            fdc_id: food.fdc_id,
            calories_per_100g: calories.unwrap_or(0.0),
            protein_per_100g: protein.unwrap_or(0.0),
            carbs_per_100g: carbs.unwrap_or(0.0),
            fat_per_100g: fat.unwrap_or(0.0),
            fiber_per_100g: fiber.unwrap_or(0.0),
        }
    }
}

pub struct UsdaFoodLookup {
    client: Client,
    config: FoodLookupConfig,
}

impl UsdaFoodLookup {
    pub fn new(config: FoodLookupConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn try_search(
        &self,
        query: &str,
        page_size: usize,
    ) -> Result<Vec<FoodRecord>, FoodLookupError> {
        let page_size_param = page_size.to_string();
        let response = self
            .client
            .get(self.url("foods/search"))
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("query", query),
                ("pageSize", page_size_param.as_str()),
                ("dataType", DATA_TYPES),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FoodLookupError::Status(response.status().as_u16()));
        }
        let body: UsdaSearchResponse = response.json().await?;
        Ok(body
            .foods
            .into_iter()
            .take(page_size)
            .map(UsdaFood::into_record)
            .collect())
    }

    async fn try_get(&self, fdc_id: i64) -> Result<FoodRecord, FoodLookupError> {
        let response = self
            .client
            .get(self.url(&format!("food/{fdc_id}")))
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FoodLookupError::Status(response.status().as_u16()));
        }
        let food: UsdaFood = response.json().await?;
        Ok(food.into_record())
    }
}

#[async_trait]
impl FoodLookup for UsdaFoodLookup {
    async fn search(&self, query: &str, page_size: usize) -> Vec<FoodRecord> {
        match self.try_search(query, page_size).await {
            Ok(foods) => {
                debug!(query, count = foods.len(), "food search");
                foods
            }
            Err(e) => {
                warn!(error = %e, query, "food search failed");
                Vec::new()
            }
        }
    }

    async fn get_by_id(&self, fdc_id: i64) -> Option<FoodRecord> {
        match self.try_get(fdc_id).await {
            Ok(food) => Some(food),
            Err(e) => {
                warn!(error = %e, fdc_id, "food lookup failed");
                None
            }
        }
    }
}

/// In-memory lookup over a fixed list, matched by case-insensitive
/// substring.
#[cfg(test)]
pub struct StaticFoodLookup(pub Vec<FoodRecord>);

#[cfg(test)]
#[async_trait]
impl FoodLookup for StaticFoodLookup {
    async fn search(&self, query: &str, page_size: usize) -> Vec<FoodRecord> {
        let query = query.to_lowercase();
        self.0
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&query))
            .take(page_size)
            .cloned()
            .collect()
    }

    async fn get_by_id(&self, fdc_id: i64) -> Option<FoodRecord> {
        self.0.iter().find(|f| f.fdc_id == Some(fdc_id)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_search_result_nutrients() {
        let raw = serde_json::json!({
            "foods": [{
                "description": "Rice, white, cooked",
                "fdcId": 168878,
                "foodNutrients": [
                    {"nutrientName": "Protein", "value": 2.69},
                    {"nutrientName": "Total lipid (fat)", "value": 0.28},
                    {"nutrientName": "Carbohydrate, by difference", "value": 28.2},
                    {"nutrientName": "Energy", "value": 130.0},
                    {"nutrientName": "Fiber, total dietary", "value": 0.4},
                    {"nutrientName": "Fatty acids, total saturated", "value": 0.08},
                    {"nutrientName": "Sodium, Na", "value": 1.0}
                ]
            }]
        });
        let parsed: UsdaSearchResponse = serde_json::from_value(raw).unwrap();
        let records: Vec<FoodRecord> = parsed.foods.into_iter().map(UsdaFood::into_record).collect();
        assert_eq!(
            records,
            vec![FoodRecord {
                name: "Rice, white, cooked".into(),
                fdc_id: Some(168878),
                calories_per_100g: 130.0,
                protein_per_100g: 2.69,
                carbs_per_100g: 28.2,
                fat_per_100g: 0.28,
                fiber_per_100g: 0.4,
            }]
        );
    }

    #[test]
    fn maps_detail_shape_and_defaults_missing_values() {
        let raw = serde_json::json!({
            "description": "Broccoli, raw",
            "fdcId": 170379,
            "foodNutrients": [
                {"nutrient": {"name": "Protein"}, "amount": 2.82},
                {"nutrient": {"name": "Energy"}, "amount": 34.0}
            ]
        });
        let record = serde_json::from_value::<UsdaFood>(raw).unwrap().into_record();
        assert_eq!(record.protein_per_100g, 2.82);
        assert_eq!(record.calories_per_100g, 34.0);
        assert_eq!(record.fat_per_100g, 0.0);
        assert_eq!(record.fiber_per_100g, 0.0);
    }

    #[tokio::test]
    async fn network_failure_yields_empty_result() {
        let lookup = UsdaFoodLookup::new(FoodLookupConfig {
            api_key: "DEMO_KEY".into(),
            api_url: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
        })
        .unwrap();
        assert!(lookup.search("rice", 5).await.is_empty());
        assert_eq!(lookup.get_by_id(168878).await, None);
    }
}
