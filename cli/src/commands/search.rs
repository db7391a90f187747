use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use vitals_core::models::{FoodEntry, MealSlot};
use vitals_core::store::Store;

use super::helpers::{date_key, json_error, parse_date};
use super::log::log_entry;
use crate::apininjas::ApiNinjasClient;

fn print_entry_table(entries: &[FoodEntry]) {
    #[derive(Tabled)]
    struct EntryRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Calories")]
        calories: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Sodium")]
        sodium: String,
        #[tabled(rename = "Potassium")]
        potassium: String,
    }

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|e| EntryRow {
            name: e.name.clone(),
            calories: format!("{:.0}", e.calories.or_zero()),
            protein: format!("{:.1}g", e.protein.or_zero()),
            sodium: format!("{:.0}mg", e.sodium.or_zero()),
            potassium: format!("{:.0}mg", e.potassium.or_zero()),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) async fn cmd_search(
    store: &Store,
    client: &ApiNinjasClient,
    query: &str,
    log: bool,
    meal: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let slot = MealSlot::parse(meal)?;
    let key = date_key(parse_date(date)?);

    let results = client.search_async(query).await?;

    if results.is_empty() {
        if json {
            println!("{}", json_error(&format!("No nutrition data for '{query}'")));
        } else {
            eprintln!("No nutrition data for '{query}'");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_entry_table(&results);
    }

    if log {
        // The service splits a combined query ("1 cup rice and 2 eggs")
        // into one row per food; each becomes its own entry.
        let count = results.len();
        for mut entry in results {
            entry.meal_type = Some(slot.as_str().to_string());
            log_entry(store, &key, slot, entry)?;
        }
        if !json {
            let slot_name = slot.as_str();
            println!("Logged {count} item(s) for {slot_name} on {key}");
        }
    }

    Ok(())
}
