use anyhow::Result;

use vitals_core::models::{DailyRecord, FoodEntry, MealSlot, Measurement};
use vitals_core::store::Store;

use super::helpers::{date_key, parse_date};

fn measurement(value: Option<f64>) -> Measurement {
    value.map_or(Measurement::Empty, Measurement::Number)
}

/// Read-modify-upsert: load the day's record (creating it on first
/// write), append the entry to its slot, write the whole record back.
pub(crate) fn log_entry(store: &Store, key: &str, slot: MealSlot, entry: FoodEntry) -> Result<()> {
    let mut record = store
        .fetch_by_date(key)
        .unwrap_or_else(|| DailyRecord::new(key));
    record.meals.slot_mut(slot).push(entry);
    store.upsert(&record)
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_log(
    store: &Store,
    name: &str,
    meal: &str,
    calories: Option<f64>,
    protein: Option<f64>,
    carbs: Option<f64>,
    fat: Option<f64>,
    sodium: Option<f64>,
    potassium: Option<f64>,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let slot = MealSlot::parse(meal)?;
    let key = date_key(parse_date(date)?);

    let entry = FoodEntry {
        calories: measurement(calories),
        protein: measurement(protein),
        carbs: measurement(carbs),
        fat: measurement(fat),
        sodium: measurement(sodium),
        potassium: measurement(potassium),
        meal_type: Some(slot.as_str().to_string()),
        ..FoodEntry::named(name)
    };

    log_entry(store, &key, slot, entry.clone())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        let slot_name = slot.as_str();
        let na = entry.sodium.or_zero();
        let k = entry.potassium.or_zero();
        println!("Logged {name} for {slot_name} on {key} — Na: {na:.0}mg, K: {k:.0}mg");
    }

    Ok(())
}
