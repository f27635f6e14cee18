//! Heuristic segmentation of free-text meal descriptions into food items.
//!
//! Known limitation: separators are applied blindly, so dish names that
//! contain them ("mac and cheese") are split into separate items.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::round_to;
use super::units::{to_grams, PortionUnit, DEFAULT_PORTION_GRAMS};

/// Applied in this order; each pass splits the output of the previous one.
const SEPARATORS: [&str; 5] = [",", " and ", " with ", "\n", ";"];

const STOPWORDS: [&str; 5] = ["a", "an", "the", "some", "of"];

// Unit keywords must end on a word boundary, so "2 chicken" is not read as
// two cups and "2 grilled" is not two grams.
lazy_static! {
    static ref PORTION_PATTERNS: Vec<Regex> = PortionUnit::ALL
        .iter()
        .map(|unit| {
            Regex::new(&format!(
                r"(\d+(?:\.\d+)?)\s*({})\b",
                unit.keyword_pattern()
            ))
            .unwrap()
        })
        .collect();
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedFoodItem {
    #[serde(rename = "food")]
    pub food_name: String,
    pub quantity_grams: f64,
}

/// Split `description` into food items, left to right.
pub fn parse_meal(description: &str) -> Vec<ParsedFoodItem> {
    let mut parts = vec![description.to_string()];
    for sep in SEPARATORS {
        parts = parts
            .iter()
            .flat_map(|part| part.split(sep).map(str::to_string))
            .collect();
    }

    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .filter_map(parse_food_item)
        .collect()
}

fn parse_food_item(segment: &str) -> Option<ParsedFoodItem> {
    let text = segment.to_lowercase();
    let mut quantity_grams = DEFAULT_PORTION_GRAMS;
    let mut remainder = text.clone();

    for pattern in PORTION_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&text) {
            let amount: f64 = caps[1].parse().unwrap_or(0.0);
            quantity_grams = to_grams(amount, &caps[2], DEFAULT_PORTION_GRAMS);
            remainder = pattern.replace_all(&text, "").into_owned();
            break;
        }
    }

    let food_name = normalize_food_name(&remainder);
    if food_name.is_empty() {
        return None;
    }

    Some(ParsedFoodItem {
        food_name,
        quantity_grams: round_to(quantity_grams, 1),
    })
}

/// Lowercase, drop filler words and collapse whitespace.
pub fn normalize_food_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .filter(|word| !STOPWORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, grams: f64) -> ParsedFoodItem {
        ParsedFoodItem {
            food_name: name.into(),
            quantity_grams: grams,
        }
    }

    #[test]
    fn splits_on_all_separators() {
        let items = parse_meal("2 cups rice and grilled chicken, with a side of broccoli");
        assert_eq!(
            items,
            vec![
                item("rice", 2.0),
                item("grilled chicken", 100.0),
                item("side broccoli", 100.0),
            ]
        );
    }

    #[test]
    fn reparsing_a_normalized_name_is_stable() {
        let first = parse_meal("chicken");
        assert_eq!(first, vec![item("chicken", 100.0)]);
        assert_eq!(parse_meal(&first[0].food_name), first);
    }

    #[test]
    fn quarter_cup_rounds_half_to_even() {
        assert_eq!(parse_meal("0.25 cups milk"), vec![item("milk", 0.2)]);
        assert_eq!(parse_meal("0.75 cup milk"), vec![item("milk", 0.8)]);
    }

    #[test]
    fn unit_letter_inside_a_word_is_not_a_unit() {
        assert_eq!(parse_meal("2 chicken"), vec![item("2 chicken", 100.0)]);
    }

    #[test]
    fn converts_weights_and_rounds() {
        let items = parse_meal("2 oz salmon; 1.5 lbs potatoes\n2 slices of the bread");
        assert_eq!(
            items,
            vec![
                item("salmon", 56.7),
                item("potatoes", 680.4),
                item("bread", 60.0),
            ]
        );
    }

    #[test]
    fn first_unit_in_declaration_order_wins() {
        // Both a cup and a gram quantity appear; cups are tried first.
        let items = parse_meal("200g oats 1 cup milk");
        assert_eq!(items, vec![item("200g oats milk", 1.0)]);
    }

    #[test]
    fn unit_letters_inside_words_are_not_quantities() {
        let items = parse_meal("2 grilled cheese");
        assert_eq!(items, vec![item("2 grilled cheese", 100.0)]);
    }

    #[test]
    fn over_splits_dish_names_containing_separators() {
        let items = parse_meal("mac and cheese");
        assert_eq!(items, vec![item("mac", 100.0), item("cheese", 100.0)]);
    }

    #[test]
    fn drops_segments_with_only_filler() {
        assert!(parse_meal("some, of the, and ,").is_empty());
        assert!(parse_meal("").is_empty());
        assert_eq!(parse_meal("a 2 cups"), Vec::new());
    }

    #[test]
    fn separators_are_case_sensitive() {
        let items = parse_meal("Eggs And Toast");
        assert_eq!(items, vec![item("eggs and toast", 100.0)]);
    }

    #[test]
    fn serializes_with_food_key() {
        let json = serde_json::to_value(item("rice", 2.0)).unwrap();
        assert_eq!(json["food"], "rice");
        assert_eq!(json["quantity_grams"], 2.0);
    }
}
