use anyhow::{Result, bail};
use chrono::Local;
use std::process;

use vitals_core::aggregate;
use vitals_core::models::{DEFAULT_FLUID_GOAL_OZ, DailyRecord, FluidEntry, Measurement};
use vitals_core::store::Store;

use super::helpers::{confirm, date_key, json_error, parse_date};

pub(crate) fn cmd_fluid_add(
    store: &Store,
    ounces: f64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    if ounces <= 0.0 {
        bail!("Fluid amount must be greater than 0");
    }

    let key = date_key(parse_date(date)?);
    let mut record = store
        .fetch_by_date(&key)
        .unwrap_or_else(|| DailyRecord::new(key.as_str()));

    let now = Local::now();
    let entry = FluidEntry {
        amount: Measurement::Number(ounces),
        time: now.format("%H:%M").to_string(),
        timestamp: now.to_rfc3339(),
    };
    record.fluid_intake_mut().entries.push(entry.clone());

    let total = aggregate::day_fluid_total(&record);
    let goal = record
        .fluid_intake
        .as_ref()
        .map_or(DEFAULT_FLUID_GOAL_OZ, |f| f.goal.or_zero());

    store.upsert(&record)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!("Added {ounces:.0} oz — {total:.0} / {goal:.0} oz for {key}");
        let remaining = goal - total;
        if remaining > 0.0 {
            println!("  {remaining:.0} oz remaining to reach the goal");
        }
    }

    Ok(())
}

pub(crate) fn cmd_fluid_goal(
    store: &Store,
    ounces: f64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    if ounces <= 0.0 {
        bail!("Fluid goal must be greater than 0");
    }

    let key = date_key(parse_date(date)?);
    let mut record = store
        .fetch_by_date(&key)
        .unwrap_or_else(|| DailyRecord::new(key.as_str()));
    record.fluid_intake_mut().goal = Measurement::Number(ounces);
    store.upsert(&record)?;

    if json {
        println!("{}", serde_json::json!({ "date": key, "goal": ounces }));
    } else {
        println!("Fluid goal set to {ounces:.0} oz for {key}");
    }

    Ok(())
}

pub(crate) fn cmd_fluid_clear(
    store: &Store,
    date: Option<String>,
    yes: bool,
    json: bool,
) -> Result<()> {
    let key = date_key(parse_date(date)?);

    let Some(mut record) = store.fetch_by_date(&key) else {
        if json {
            println!("{}", json_error(&format!("No record for {key}")));
        } else {
            eprintln!("No record for {key}");
        }
        process::exit(2);
    };

    let count = record
        .fluid_intake
        .as_ref()
        .map_or(0, |f| f.entries.len());
    if count == 0 {
        if json {
            println!("{}", json_error(&format!("No fluid entries for {key}")));
        } else {
            eprintln!("No fluid entries for {key}");
        }
        process::exit(2);
    }

    if !confirm(
        &format!("Clear all {count} fluid entries for {key}?"),
        yes,
    )? {
        if !json {
            println!("Cancelled");
        }
        return Ok(());
    }

    // The goal survives a clear; only the entries go.
    record.fluid_intake_mut().entries.clear();
    store.upsert(&record)?;

    if json {
        println!("{}", serde_json::json!({ "date": key, "cleared": count }));
    } else {
        println!("Cleared {count} fluid entries for {key}");
    }

    Ok(())
}
