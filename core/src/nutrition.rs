use anyhow::Result;
use serde::Deserialize;

use crate::models::{FoodEntry, Measurement};

/// Platform-native nutrition lookup provider.
///
/// The CLI implements this with reqwest against the API-Ninjas nutrition
/// endpoint; tests use a canned list. Everything downstream of this trait
/// only ever sees normalized [`FoodEntry`] values.
pub trait NutrientLookup {
    fn search(&self, query: &str) -> Result<Vec<FoodEntry>>;
}

/// One row of the upstream nutrition response.
#[derive(Debug, Deserialize)]
pub struct NutritionItem {
    pub name: Option<String>,
    pub calories: Option<f64>,
    #[serde(rename = "protein_g")]
    pub protein: Option<f64>,
    #[serde(rename = "carbohydrates_total_g")]
    pub carbs: Option<f64>,
    #[serde(rename = "fat_total_g")]
    pub fat: Option<f64>,
    #[serde(rename = "sodium_mg")]
    pub sodium: Option<f64>,
    #[serde(rename = "potassium_mg")]
    pub potassium: Option<f64>,
    #[serde(rename = "serving_size_g")]
    pub serving_size: Option<f64>,
}

fn measurement(value: Option<f64>) -> Measurement {
    value.map_or(Measurement::Empty, Measurement::Number)
}

/// Normalize an upstream row into a food entry. Rows without a usable
/// name are dropped; missing nutrients stay absent and aggregate as 0.
#[must_use]
pub fn item_to_entry(item: NutritionItem) -> Option<FoodEntry> {
    let name = item.name.filter(|n| !n.trim().is_empty())?;

    Some(FoodEntry {
        name,
        calories: measurement(item.calories),
        protein: measurement(item.protein),
        carbs: measurement(item.carbs),
        fat: measurement(item.fat),
        sodium: measurement(item.sodium),
        potassium: measurement(item.potassium),
        meal_type: None,
        units: item.serving_size.map(|g| format!("{g:.0}g")),
        quantity: Measurement::Empty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_item() -> NutritionItem {
        NutritionItem {
            name: Some("banana".to_string()),
            calories: Some(105.0),
            protein: Some(1.3),
            carbs: Some(27.0),
            fat: Some(0.4),
            sodium: Some(1.0),
            potassium: Some(422.0),
            serving_size: Some(118.0),
        }
    }

    #[test]
    fn test_item_to_entry_complete() {
        let entry = item_to_entry(full_item()).unwrap();
        assert_eq!(entry.name, "banana");
        assert_eq!(entry.calories, Measurement::Number(105.0));
        assert_eq!(entry.sodium, Measurement::Number(1.0));
        assert_eq!(entry.potassium, Measurement::Number(422.0));
        assert_eq!(entry.units.as_deref(), Some("118g"));
    }

    #[test]
    fn test_item_to_entry_missing_name() {
        let mut item = full_item();
        item.name = None;
        assert!(item_to_entry(item).is_none());

        let mut blank = full_item();
        blank.name = Some("   ".to_string());
        assert!(item_to_entry(blank).is_none());
    }

    #[test]
    fn test_item_to_entry_missing_nutrients_aggregate_as_zero() {
        let item = NutritionItem {
            name: Some("mystery".to_string()),
            calories: None,
            protein: None,
            carbs: None,
            fat: None,
            sodium: None,
            potassium: None,
            serving_size: None,
        };
        let entry = item_to_entry(item).unwrap();
        assert!((entry.sodium.or_zero() - 0.0).abs() < f64::EPSILON);
        assert!(entry.units.is_none());
    }

    #[test]
    fn test_response_row_parses_upstream_field_names() {
        let raw = r#"{
            "name": "rice",
            "calories": 130.0,
            "serving_size_g": 100.0,
            "fat_total_g": 0.3,
            "protein_g": 2.7,
            "sodium_mg": 1.0,
            "potassium_mg": 35.0,
            "carbohydrates_total_g": 28.0
        }"#;
        let item: NutritionItem = serde_json::from_str(raw).unwrap();
        let entry = item_to_entry(item).unwrap();
        assert_eq!(entry.carbs, Measurement::Number(28.0));
        assert_eq!(entry.potassium, Measurement::Number(35.0));
    }
}
