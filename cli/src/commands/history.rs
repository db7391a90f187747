use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use vitals_core::aggregate;
use vitals_core::models::DailyRecord;
use vitals_core::store::Store;

pub(crate) fn cmd_history(store: &Store, days: u32, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct HistoryRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Sodium")]
        sodium: String,
        #[tabled(rename = "Potassium")]
        potassium: String,
        #[tabled(rename = "Fluid")]
        fluid: String,
        #[tabled(rename = "BP")]
        bp: String,
    }

    // Already pruned to the retention window and sorted newest first.
    let records: Vec<DailyRecord> = store
        .fetch_all()
        .into_iter()
        .take(days as usize)
        .collect();

    if json {
        let rows: Vec<serde_json::Value> = records
            .iter()
            .map(|record| {
                let totals = aggregate::day_totals(record);
                serde_json::json!({
                    "date": record.date,
                    "sodium": totals.sodium,
                    "potassium": totals.potassium,
                    "fluid": aggregate::day_fluid_total(record),
                    "bloodPressure": aggregate::day_blood_pressure(record)
                        .map(|s| s.to_string()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if records.is_empty() {
        eprintln!("No entries in the last {days} days");
        process::exit(2);
    }

    let rows: Vec<HistoryRow> = records
        .iter()
        .map(|record| {
            let totals = aggregate::day_totals(record);
            HistoryRow {
                date: record.date.clone(),
                sodium: format!("{:.0}mg", totals.sodium),
                potassium: format!("{:.0}mg", totals.potassium),
                fluid: format!("{:.0}oz", aggregate::day_fluid_total(record)),
                bp: aggregate::day_blood_pressure(record)
                    .map_or_else(|| "-".to_string(), |s| s.to_string()),
            }
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}
