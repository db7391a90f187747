use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};

use crate::models::DailyRecord;

/// Fixed key the serialized record collection lives under.
pub const RECORDS_KEY: &str = "nutritionRecords";

/// Key-value backing store holding the record collection (one JSON array
/// under [`RECORDS_KEY`]) and the namespaced UI preference flags.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let store = Store { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Store { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS storage (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL
                );

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    // --- Raw key-value access ---

    pub(crate) fn get_value(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Single-statement replace: the new value lands in full or not at all.
    pub(crate) fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO storage (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .with_context(|| format!("Failed to write '{key}'"))?;
        Ok(())
    }

    pub(crate) fn delete_value(&self, key: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM storage WHERE key = ?1", params![key])?;
        Ok(rows > 0)
    }

    // --- Records ---

    /// Every stored record, newest first. A missing, unreadable, or corrupt
    /// collection degrades to empty rather than erroring: an empty history
    /// is recoverable, a blocked UI is not.
    #[must_use]
    pub fn fetch_all(&self) -> Vec<DailyRecord> {
        let Ok(Some(raw)) = self.get_value(RECORDS_KEY) else {
            return Vec::new();
        };
        let mut records: Vec<DailyRecord> = serde_json::from_str(&raw).unwrap_or_default();
        // The fixed-width zero-padded key makes lexicographic order date order.
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }

    #[must_use]
    pub fn fetch_by_date(&self, date: &str) -> Option<DailyRecord> {
        self.fetch_all().into_iter().find(|r| r.date == date)
    }

    /// Replace the record with a matching date, or append. Write failures
    /// surface to the caller; the previously-persisted collection is left
    /// intact when they do.
    pub fn upsert(&self, record: &DailyRecord) -> Result<()> {
        let mut records = self.fetch_all();
        match records.iter_mut().find(|r| r.date == record.date) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.write_records(&records)
    }

    /// Remove the record for `date`; no-op when absent.
    pub fn delete_by_date(&self, date: &str) -> Result<()> {
        let mut records = self.fetch_all();
        let before = records.len();
        records.retain(|r| r.date != date);
        if records.len() == before {
            return Ok(());
        }
        self.write_records(&records)
    }

    /// Drop every record strictly older than `cutoff` (a record dated
    /// exactly `cutoff` is retained). Compared on the raw key, per the
    /// same fixed-width ordering `fetch_all` relies on.
    pub fn prune_older_than(&self, cutoff: NaiveDate) -> Result<()> {
        let cutoff = cutoff.format("%Y-%m-%d").to_string();
        let mut records = self.fetch_all();
        let before = records.len();
        records.retain(|r| r.date.as_str() >= cutoff.as_str());
        if records.len() == before {
            return Ok(());
        }
        self.write_records(&records)
    }

    fn write_records(&self, records: &[DailyRecord]) -> Result<()> {
        let json = serde_json::to_string(records).context("Failed to serialize records")?;
        self.set_value(RECORDS_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodEntry, Measurement};

    fn record(date: &str) -> DailyRecord {
        DailyRecord::new(date)
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let store = Store::open_in_memory().unwrap();
        let mut r = record("2024-01-10");
        r.meals.lunch.push(FoodEntry {
            sodium: Measurement::Number(250.0),
            ..FoodEntry::named("Soup")
        });

        store.upsert(&r).unwrap();
        store.upsert(&r).unwrap();

        let all = store.fetch_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], r);
    }

    #[test]
    fn test_upsert_replaces_by_date() {
        let store = Store::open_in_memory().unwrap();
        store.upsert(&record("2024-01-10")).unwrap();

        let mut updated = record("2024-01-10");
        updated.meals.dinner.push(FoodEntry::named("Salmon"));
        store.upsert(&updated).unwrap();

        let all = store.fetch_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].meals.dinner.len(), 1);
    }

    #[test]
    fn test_fetch_all_sorted_newest_first() {
        let store = Store::open_in_memory().unwrap();
        store.upsert(&record("2024-01-01")).unwrap();
        store.upsert(&record("2024-01-03")).unwrap();
        store.upsert(&record("2024-01-02")).unwrap();

        let all = store.fetch_all();
        let dates: Vec<&str> = all.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
    }

    #[test]
    fn test_fetch_by_date() {
        let store = Store::open_in_memory().unwrap();
        store.upsert(&record("2024-01-10")).unwrap();

        assert!(store.fetch_by_date("2024-01-10").is_some());
        assert!(store.fetch_by_date("2024-01-11").is_none());
    }

    #[test]
    fn test_round_trip_preserves_legacy_shapes() {
        let store = Store::open_in_memory().unwrap();
        let raw = r#"{
            "date": "2024-01-02",
            "meals": {"breakfast": [], "lunch": [], "dinner": [], "snacks": []},
            "healthMetrics": {
                "bloodPressure": {"systolic": "140", "diastolic": "90", "time": "7:30", "period": "AM"},
                "fluidIntake": [{"ounces": "12"}]
            }
        }"#;
        let legacy: DailyRecord = serde_json::from_str(raw).unwrap();

        store.upsert(&legacy).unwrap();
        let back = store.fetch_by_date("2024-01-02").unwrap();
        assert_eq!(back, legacy);
    }

    #[test]
    fn test_delete_only_affects_matching_date() {
        let store = Store::open_in_memory().unwrap();
        store.upsert(&record("2024-01-09")).unwrap();
        store.upsert(&record("2024-01-10")).unwrap();

        store.delete_by_date("2024-01-09").unwrap();

        let all = store.fetch_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].date, "2024-01-10");

        // Deleting an absent date is a no-op.
        store.delete_by_date("2024-01-09").unwrap();
        assert_eq!(store.fetch_all().len(), 1);
    }

    #[test]
    fn test_prune_retains_cutoff_boundary() {
        let store = Store::open_in_memory().unwrap();
        store.upsert(&record("2024-01-03")).unwrap();
        store.upsert(&record("2024-01-02")).unwrap();
        store.upsert(&record("2024-01-10")).unwrap();

        // today = 2024-01-10, retention = 7 days
        let cutoff = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        store.prune_older_than(cutoff).unwrap();

        let dates: Vec<String> = store.fetch_all().iter().map(|r| r.date.clone()).collect();
        assert_eq!(dates, vec!["2024-01-10", "2024-01-03"]);
    }

    #[test]
    fn test_corrupt_collection_degrades_to_empty() {
        let store = Store::open_in_memory().unwrap();
        store.set_value(RECORDS_KEY, "not json at all {{{").unwrap();

        assert!(store.fetch_all().is_empty());
        assert!(store.fetch_by_date("2024-01-10").is_none());

        // A fresh upsert recovers the collection.
        store.upsert(&record("2024-01-10")).unwrap();
        assert_eq!(store.fetch_all().len(), 1);
    }

    #[test]
    fn test_records_key_is_isolated_from_other_keys() {
        let store = Store::open_in_memory().unwrap();
        store.upsert(&record("2024-01-10")).unwrap();
        store.set_value("prefs:fluidSection", "false").unwrap();

        assert_eq!(store.fetch_all().len(), 1);
        assert_eq!(
            store.get_value("prefs:fluidSection").unwrap().as_deref(),
            Some("false")
        );
    }
}
