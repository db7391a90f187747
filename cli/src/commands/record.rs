use anyhow::Result;
use std::process;

use vitals_core::store::Store;

use super::helpers::{confirm, date_key, json_error, parse_date};

pub(crate) fn cmd_delete(store: &Store, date: &str, yes: bool, json: bool) -> Result<()> {
    let key = date_key(parse_date(Some(date.to_string()))?);

    if store.fetch_by_date(&key).is_none() {
        if json {
            println!("{}", json_error(&format!("No record for {key}")));
        } else {
            eprintln!("No record for {key}");
        }
        process::exit(2);
    }

    if !confirm(&format!("Delete the record for {key}?"), yes)? {
        if !json {
            println!("Cancelled");
        }
        return Ok(());
    }

    store.delete_by_date(&key)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": key }));
    } else {
        println!("Deleted record for {key}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitals_core::models::DailyRecord;

    #[test]
    fn test_delete_leaves_other_dates_alone() {
        let store = Store::open_in_memory().unwrap();
        store.upsert(&DailyRecord::new("2024-01-08")).unwrap();
        store.upsert(&DailyRecord::new("2024-01-09")).unwrap();

        cmd_delete(&store, "2024-01-08", true, true).unwrap();

        assert!(store.fetch_by_date("2024-01-08").is_none());
        assert!(store.fetch_by_date("2024-01-09").is_some());
    }
}
