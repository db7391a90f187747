use anyhow::{Result, bail};
use chrono::Local;

use vitals_core::models::{DailyRecord, Measurement, TimeWindow};
use vitals_core::reconcile::{ReadingField, record_measurement};
use vitals_core::store::Store;

use super::helpers::{date_key, parse_date};

pub(crate) fn cmd_bp(
    store: &Store,
    window: &str,
    systolic: Option<f64>,
    diastolic: Option<f64>,
    heart_rate: Option<f64>,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let window = TimeWindow::parse(window)?;
    if systolic.is_none() && diastolic.is_none() && heart_rate.is_none() {
        bail!("Nothing to record. Provide at least one of --systolic, --diastolic, --heart-rate");
    }

    let key = date_key(parse_date(date)?);
    let mut record = store
        .fetch_by_date(&key)
        .unwrap_or_else(|| DailyRecord::new(key.as_str()));

    let now = Local::now().time();
    let reading = record.windows_mut().window_mut(window);
    let fields = [
        (ReadingField::Systolic, systolic),
        (ReadingField::Diastolic, diastolic),
        (ReadingField::HeartRate, heart_rate),
    ];
    for (field, value) in fields {
        if let Some(v) = value {
            record_measurement(reading, field, Measurement::Number(v), now);
        }
    }
    let saved = reading.clone();

    store.upsert(&record)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
    } else {
        let label = window.label();
        let mut parts = Vec::new();
        if saved.systolic.is_present() || saved.diastolic.is_present() {
            parts.push(format!(
                "{:.0}/{:.0}",
                saved.systolic.or_zero(),
                saved.diastolic.or_zero()
            ));
        }
        if saved.heart_rate.is_present() {
            parts.push(format!("HR {:.0}", saved.heart_rate.or_zero()));
        }
        let values = parts.join(", ");
        let time = &saved.time;
        println!("Recorded {label} reading for {key}: {values} at {time}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitals_core::models::{BloodPressureLog, Reading};

    fn windows(record: &DailyRecord) -> &vitals_core::models::BloodPressureWindows {
        match record
            .health_metrics
            .as_ref()
            .unwrap()
            .blood_pressure
            .as_ref()
            .unwrap()
        {
            BloodPressureLog::Windowed(w) => w,
            BloodPressureLog::Single(_) => panic!("expected windowed shape"),
        }
    }

    #[test]
    fn test_bp_write_creates_windowed_record_with_timestamp() {
        let store = Store::open_in_memory().unwrap();
        cmd_bp(
            &store,
            "morning",
            Some(120.0),
            Some(80.0),
            None,
            Some("2024-01-08".to_string()),
            true,
        )
        .unwrap();

        let record = store.fetch_by_date("2024-01-08").unwrap();
        let morning = &windows(&record).morning;
        assert_eq!(morning.systolic, Measurement::Number(120.0));
        assert_eq!(morning.diastolic, Measurement::Number(80.0));
        // Auto-stamped on first measurement.
        assert!(!morning.time.is_empty());
    }

    #[test]
    fn test_bp_edit_keeps_original_timestamp() {
        let store = Store::open_in_memory().unwrap();
        let mut record = DailyRecord::new("2024-01-08");
        record.windows_mut().evening = Reading {
            systolic: Measurement::Number(118.0),
            time: "19:05".to_string(),
            ..Reading::default()
        };
        store.upsert(&record).unwrap();

        cmd_bp(
            &store,
            "evening",
            None,
            Some(79.0),
            None,
            Some("2024-01-08".to_string()),
            true,
        )
        .unwrap();

        let record = store.fetch_by_date("2024-01-08").unwrap();
        let evening = &windows(&record).evening;
        assert_eq!(evening.diastolic, Measurement::Number(79.0));
        assert_eq!(evening.time, "19:05");
    }

    #[test]
    fn test_bp_requires_a_measurement() {
        let store = Store::open_in_memory().unwrap();
        assert!(cmd_bp(&store, "morning", None, None, None, None, true).is_err());
    }

    #[test]
    fn test_bp_rejects_unknown_window() {
        let store = Store::open_in_memory().unwrap();
        assert!(cmd_bp(&store, "midnight", Some(120.0), None, None, None, true).is_err());
    }
}
