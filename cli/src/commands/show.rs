use anyhow::Result;
use std::process;

use vitals_core::aggregate;
use vitals_core::models::DailyRecord;
use vitals_core::prefs::Preferences;
use vitals_core::reconcile::{self, BloodPressureView};
use vitals_core::store::Store;

use super::helpers::{date_key, json_error, parse_date};

pub(crate) fn cmd_show(store: &Store, date: Option<String>, json: bool) -> Result<()> {
    let key = date_key(parse_date(date)?);

    let Some(record) = store.fetch_by_date(&key) else {
        if json {
            println!("{}", json_error(&format!("No record for {key}")));
        } else {
            eprintln!("No record for {key}");
        }
        process::exit(2);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let prefs = Preferences::new(store);
    println!("=== {key} ===\n");

    if prefs.get("mealsSection").unwrap_or(true) {
        print_meals(&record);
    }

    let totals = aggregate::day_totals(&record);
    println!(
        "  TOTAL: {:.0} kcal | Na: {:.0}mg | K: {:.0}mg",
        totals.calories, totals.sodium, totals.potassium
    );

    if prefs.get("bpSection").unwrap_or(true) {
        print_blood_pressure(&record);
    }

    if prefs.get("fluidSection").unwrap_or(true) {
        print_fluid(&record);
    }

    Ok(())
}

fn print_meals(record: &DailyRecord) {
    if record.meals.is_empty() {
        println!("  No meals recorded\n");
        return;
    }
    for (slot, entries) in record.meals.iter() {
        if entries.is_empty() {
            continue;
        }
        println!("  {}", slot.label().to_uppercase());
        for entry in entries {
            let name = &entry.name;
            let cal = entry.calories.or_zero();
            let na = entry.sodium.or_zero();
            let k = entry.potassium.or_zero();
            println!("    {name} — {cal:.0} kcal | Na: {na:.0}mg K: {k:.0}mg");
        }
        println!();
    }
}

fn print_blood_pressure(record: &DailyRecord) {
    let view = BloodPressureView::of(record);
    let qualifying = view.qualifying();
    if qualifying.is_empty() {
        return;
    }

    println!();
    if let Some(summary) = aggregate::day_blood_pressure(record) {
        println!("  BLOOD PRESSURE: {summary}");
    }
    for (window, reading) in qualifying {
        let label = window.map_or("reading", |w| w.as_str());
        let values = format!(
            "{:.0}/{:.0}",
            reading.systolic.or_zero(),
            reading.diastolic.or_zero()
        );
        let hr = if reading.heart_rate.is_present() {
            format!(" HR {:.0}", reading.heart_rate.or_zero())
        } else {
            String::new()
        };
        if reading.time.is_empty() {
            println!("    {label}: {values}{hr}");
        } else {
            let time = &reading.time;
            println!("    {label}: {values}{hr} at {time}");
        }
    }
}

fn print_fluid(record: &DailyRecord) {
    let entries = reconcile::fluid_entries(record);
    if entries.is_empty() {
        return;
    }

    let total: f64 = entries.iter().map(|e| e.amount).sum();
    println!();
    match record.fluid_intake.as_ref().map(|f| f.goal.or_zero()) {
        Some(goal) if goal > 0.0 => {
            println!("  FLUID: {total:.0} / {goal:.0} oz");
        }
        _ => println!("  FLUID: {total:.0} oz"),
    }
    for entry in entries {
        let amount = entry.amount;
        match entry.time {
            Some(time) => println!("    {amount:.0} oz at {time}"),
            None => println!("    {amount:.0} oz"),
        }
    }
}
