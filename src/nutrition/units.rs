//! Portion-size units recognised in meal descriptions and their gram
//! equivalents.
//!
//! Cups, tablespoons and teaspoons are volume units with no real gram
//! equivalent here: they pass the amount through 1:1. Pieces, slices and
//! servings use fixed estimates.

/// Quantity assumed when a segment carries no recognised portion.
pub const DEFAULT_PORTION_GRAMS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortionUnit {
    Cup,
    Tablespoon,
    Teaspoon,
    Ounce,
    Pound,
    Gram,
    Piece,
    Slice,
    Serving,
}

impl PortionUnit {
    /// Declaration order. The parser tries units in exactly this order and
    /// keeps the first one that matches.
    pub const ALL: [PortionUnit; 9] = [
        PortionUnit::Cup,
        PortionUnit::Tablespoon,
        PortionUnit::Teaspoon,
        PortionUnit::Ounce,
        PortionUnit::Pound,
        PortionUnit::Gram,
        PortionUnit::Piece,
        PortionUnit::Slice,
        PortionUnit::Serving,
    ];

    pub fn grams_per_unit(self) -> f64 {
        match self {
            PortionUnit::Cup | PortionUnit::Tablespoon | PortionUnit::Teaspoon => 1.0,
            PortionUnit::Ounce => 28.35,
            PortionUnit::Pound => 453.59,
            PortionUnit::Gram => 1.0,
            PortionUnit::Piece => 100.0,
            PortionUnit::Slice => 30.0,
            PortionUnit::Serving => 150.0,
        }
    }

    /// Regex alternation of the spellings accepted for this unit.
    pub(crate) fn keyword_pattern(self) -> &'static str {
        match self {
            PortionUnit::Cup => "cups?|c",
            PortionUnit::Tablespoon => "tablespoons?|tbsp",
            PortionUnit::Teaspoon => "teaspoons?|tsp",
            PortionUnit::Ounce => "ounces?|oz",
            PortionUnit::Pound => "pounds?|lbs?",
            PortionUnit::Gram => "grams?|g",
            PortionUnit::Piece => "pieces?|pcs?",
            PortionUnit::Slice => "slices?",
            PortionUnit::Serving => "servings?",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        let unit = match word.trim().to_lowercase().as_str() {
            "cup" | "cups" | "c" => PortionUnit::Cup,
            "tablespoon" | "tablespoons" | "tbsp" => PortionUnit::Tablespoon,
            "teaspoon" | "teaspoons" | "tsp" => PortionUnit::Teaspoon,
            "ounce" | "ounces" | "oz" => PortionUnit::Ounce,
            "pound" | "pounds" | "lb" | "lbs" => PortionUnit::Pound,
            "gram" | "grams" | "g" => PortionUnit::Gram,
            "piece" | "pieces" | "pc" | "pcs" => PortionUnit::Piece,
            "slice" | "slices" => PortionUnit::Slice,
            "serving" | "servings" => PortionUnit::Serving,
            _ => return None,
        };
        Some(unit)
    }
}

/// Convert `amount` of `unit_keyword` to grams. Unknown keywords yield
/// `fallback_grams` instead of failing.
pub fn to_grams(amount: f64, unit_keyword: &str, fallback_grams: f64) -> f64 {
    match PortionUnit::from_keyword(unit_keyword) {
        Some(unit) => amount * unit.grams_per_unit(),
        None => fallback_grams,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_weight_units() {
        assert_eq!(to_grams(2.0, "oz", DEFAULT_PORTION_GRAMS), 56.7);
        assert_eq!(to_grams(1.0, "lbs", DEFAULT_PORTION_GRAMS), 453.59);
        assert_eq!(to_grams(250.0, "g", DEFAULT_PORTION_GRAMS), 250.0);
    }

    #[test]
    fn volume_units_pass_amount_through() {
        for kw in ["cup", "cups", "tbsp", "teaspoon"] {
            let unit = PortionUnit::from_keyword(kw).unwrap();
            assert_eq!(unit.grams_per_unit(), 1.0);
            assert_eq!(to_grams(3.0, kw, DEFAULT_PORTION_GRAMS), 3.0);
        }
    }

    #[test]
    fn count_units_use_estimates() {
        assert_eq!(to_grams(2.0, "pieces", DEFAULT_PORTION_GRAMS), 200.0);
        assert_eq!(to_grams(3.0, "slices", DEFAULT_PORTION_GRAMS), 90.0);
        assert_eq!(to_grams(1.0, "Serving", DEFAULT_PORTION_GRAMS), 150.0);
    }

    #[test]
    fn unknown_unit_falls_back() {
        assert_eq!(to_grams(4.0, "handfuls", DEFAULT_PORTION_GRAMS), 100.0);
        assert_eq!(to_grams(4.0, "", 42.0), 42.0);
    }
}
