//! Pure derived-value computation over canonical record views.

use std::fmt;

use serde::Serialize;

use crate::models::DailyRecord;
use crate::reconcile::{self, BloodPressureView};

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NutrientTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub sodium: f64,
    pub potassium: f64,
}

/// Sum every food entry across every meal slot. Non-numeric and missing
/// fields contribute 0.
#[must_use]
pub fn day_totals(record: &DailyRecord) -> NutrientTotals {
    let mut totals = NutrientTotals::default();
    for (_, entries) in record.meals.iter() {
        for entry in entries {
            totals.calories += entry.calories.or_zero();
            totals.protein += entry.protein.or_zero();
            totals.carbs += entry.carbs.or_zero();
            totals.fat += entry.fat.or_zero();
            totals.sodium += entry.sodium.or_zero();
            totals.potassium += entry.potassium.or_zero();
        }
    }
    totals
}

/// Total ounces across the day's reconciled fluid entries; 0 when absent.
#[must_use]
pub fn day_fluid_total(record: &DailyRecord) -> f64 {
    reconcile::fluid_entries(record).iter().map(|e| e.amount).sum()
}

#[derive(Debug, Clone, Serialize)]
pub struct BloodPressureSummary {
    pub systolic: i64,
    pub diastolic: i64,
    /// Windows that contributed, out of 3. `None` for the legacy flat
    /// shape, which has no window attribution.
    pub reading_count: Option<usize>,
}

impl fmt::Display for BloodPressureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reading_count {
            Some(count) => write!(f, "{}/{} ({count}/3)", self.systolic, self.diastolic),
            None => write!(f, "{}/{}", self.systolic, self.diastolic),
        }
    }
}

/// Average systolic/diastolic over the windows where both are present.
/// `None` when no reading qualifies.
#[must_use]
pub fn day_blood_pressure(record: &DailyRecord) -> Option<BloodPressureSummary> {
    let view = BloodPressureView::of(record);
    let qualifying = view.qualifying();
    if qualifying.is_empty() {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = qualifying.len() as f64;
    let systolic = qualifying.iter().map(|(_, r)| r.systolic.or_zero()).sum::<f64>() / n;
    let diastolic = qualifying.iter().map(|(_, r)| r.diastolic.or_zero()).sum::<f64>() / n;

    let windowed = matches!(view, BloodPressureView::Windowed(_));
    Some(BloodPressureSummary {
        systolic: systolic.round() as i64,
        diastolic: diastolic.round() as i64,
        reading_count: windowed.then_some(qualifying.len()),
    })
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PeriodSummary {
    pub avg_sodium: i64,
    pub avg_potassium: i64,
    pub avg_fluid: i64,
    pub days_tracked: usize,
}

/// Multi-day rollup. Sodium and potassium average over every supplied day
/// (an unlogged day counts as 0); fluid averages only over days with a
/// positive total, so forgotten logging does not understate hydration.
#[must_use]
pub fn period_summary(records: &[DailyRecord]) -> PeriodSummary {
    let mut total_sodium = 0.0;
    let mut total_potassium = 0.0;
    let mut total_fluid = 0.0;
    let mut fluid_days = 0u32;

    for record in records {
        let totals = day_totals(record);
        total_sodium += totals.sodium;
        total_potassium += totals.potassium;

        let fluid = day_fluid_total(record);
        if fluid > 0.0 {
            total_fluid += fluid;
            fluid_days += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let days = records.len() as f64;
    let avg = |total: f64, n: f64| if n > 0.0 { (total / n).round() as i64 } else { 0 };

    PeriodSummary {
        avg_sodium: avg(total_sodium, days),
        avg_potassium: avg(total_potassium, days),
        avg_fluid: avg(total_fluid, f64::from(fluid_days)),
        days_tracked: records.len(),
    }
}

/// Advisory band for a period average. Drives the report's status markers
/// and insight sentences, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Good,
    Moderate,
    Alert,
}

#[must_use]
pub fn sodium_status(avg_mg: i64) -> Status {
    if avg_mg > 2300 {
        Status::Alert
    } else if avg_mg > 1500 {
        Status::Moderate
    } else {
        Status::Good
    }
}

#[must_use]
pub fn potassium_status(avg_mg: i64) -> Status {
    if avg_mg < 2000 {
        Status::Alert
    } else if avg_mg < 3500 {
        Status::Moderate
    } else {
        Status::Good
    }
}

#[must_use]
pub fn fluid_status(avg_oz: i64) -> Status {
    if avg_oz < 50 {
        Status::Alert
    } else if avg_oz < 64 {
        Status::Moderate
    } else {
        Status::Good
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FluidEntry, FoodEntry, Measurement, Reading};

    fn entry(sodium: f64, potassium: f64) -> FoodEntry {
        FoodEntry {
            sodium: Measurement::Number(sodium),
            potassium: Measurement::Number(potassium),
            ..FoodEntry::named("item")
        }
    }

    #[test]
    fn test_day_totals_sums_all_slots() {
        let mut record = DailyRecord::new("2024-01-08");
        record.meals.breakfast.push(entry(100.0, 200.0));
        record.meals.lunch.push(entry(50.0, 300.0));

        let totals = day_totals(&record);
        assert!((totals.sodium - 150.0).abs() < f64::EPSILON);
        assert!((totals.potassium - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_day_totals_coerces_strings_and_garbage() {
        let mut record = DailyRecord::new("2024-01-08");
        record.meals.snacks.push(FoodEntry {
            calories: Measurement::Text("250".to_string()),
            sodium: Measurement::Text("not a number".to_string()),
            ..FoodEntry::named("Mystery snack")
        });

        let totals = day_totals(&record);
        assert!((totals.calories - 250.0).abs() < f64::EPSILON);
        assert!((totals.sodium - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_day_fluid_total_both_shapes() {
        let legacy: DailyRecord = serde_json::from_str(
            r#"{
                "date": "2024-01-02",
                "healthMetrics": {"fluidIntake": [{"ounces": "12"}, {"ounces": "8"}]}
            }"#,
        )
        .unwrap();
        assert!((day_fluid_total(&legacy) - 20.0).abs() < f64::EPSILON);

        let mut canonical = DailyRecord::new("2024-01-08");
        canonical.fluid_intake_mut().entries.push(FluidEntry {
            amount: Measurement::Number(16.0),
            time: String::new(),
            timestamp: String::new(),
        });
        canonical.fluid_intake_mut().entries.push(FluidEntry {
            amount: Measurement::Number(8.0),
            time: String::new(),
            timestamp: String::new(),
        });
        assert!((day_fluid_total(&canonical) - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_day_blood_pressure_windowed_average() {
        let mut record = DailyRecord::new("2024-01-08");
        record.windows_mut().morning = Reading {
            systolic: Measurement::Number(120.0),
            diastolic: Measurement::Number(80.0),
            ..Reading::default()
        };

        let summary = day_blood_pressure(&record).unwrap();
        assert_eq!(summary.to_string(), "120/80 (1/3)");

        record.windows_mut().evening = Reading {
            systolic: Measurement::Number(131.0),
            diastolic: Measurement::Number(85.0),
            ..Reading::default()
        };
        let summary = day_blood_pressure(&record).unwrap();
        // (120+131)/2 = 125.5 rounds to 126, (80+85)/2 = 82.5 rounds to 83
        assert_eq!(summary.to_string(), "126/83 (2/3)");
    }

    #[test]
    fn test_day_blood_pressure_legacy_has_no_count() {
        let record: DailyRecord = serde_json::from_str(
            r#"{
                "date": "2024-01-02",
                "healthMetrics": {"bloodPressure": {"systolic": "140", "diastolic": "90"}}
            }"#,
        )
        .unwrap();
        let summary = day_blood_pressure(&record).unwrap();
        assert_eq!(summary.reading_count, None);
        assert_eq!(summary.to_string(), "140/90");
    }

    #[test]
    fn test_day_blood_pressure_absent_when_none_qualify() {
        let mut record = DailyRecord::new("2024-01-08");
        record.windows_mut().morning = Reading {
            systolic: Measurement::Number(120.0),
            ..Reading::default()
        };
        assert!(day_blood_pressure(&record).is_none());
    }

    #[test]
    fn test_period_summary_counts_empty_days_for_nutrients() {
        let mut day1 = DailyRecord::new("2024-01-08");
        day1.meals.lunch.push(entry(2000.0, 3000.0));
        let day2 = DailyRecord::new("2024-01-07");

        let summary = period_summary(&[day1, day2]);
        assert_eq!(summary.avg_sodium, 1000);
        assert_eq!(summary.avg_potassium, 1500);
        assert_eq!(summary.days_tracked, 2);
    }

    #[test]
    fn test_period_summary_fluid_skips_unlogged_days() {
        let mut day1 = DailyRecord::new("2024-01-08");
        day1.fluid_intake_mut().entries.push(FluidEntry {
            amount: Measurement::Number(60.0),
            time: String::new(),
            timestamp: String::new(),
        });
        let day2 = DailyRecord::new("2024-01-07");

        let summary = period_summary(&[day1, day2]);
        // 60 over one logged day, not 30 over two.
        assert_eq!(summary.avg_fluid, 60);
    }

    #[test]
    fn test_period_summary_empty() {
        let summary = period_summary(&[]);
        assert_eq!(summary.days_tracked, 0);
        assert_eq!(summary.avg_sodium, 0);
        assert_eq!(summary.avg_potassium, 0);
        assert_eq!(summary.avg_fluid, 0);
    }

    #[test]
    fn test_status_bands() {
        assert_eq!(sodium_status(2400), Status::Alert);
        assert_eq!(sodium_status(2300), Status::Moderate);
        assert_eq!(sodium_status(1500), Status::Good);

        assert_eq!(potassium_status(1999), Status::Alert);
        assert_eq!(potassium_status(2000), Status::Moderate);
        assert_eq!(potassium_status(3500), Status::Good);

        assert_eq!(fluid_status(49), Status::Alert);
        assert_eq!(fluid_status(50), Status::Moderate);
        assert_eq!(fluid_status(64), Status::Good);
    }
}
