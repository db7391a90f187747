//! Read-time projection of the historical record shapes.
//!
//! Stored records come in two blood-pressure shapes (three time windows
//! vs one flat reading) and two fluid shapes (`fluidIntake.entries` vs a
//! bare `ounces` list under `healthMetrics`). Aggregation and rendering
//! only ever see the views produced here; the shape branching lives in
//! this module and nowhere else, and stored data is never migrated.

use chrono::{NaiveTime, Timelike};

use crate::models::{
    BloodPressureLog, BloodPressureWindows, DailyRecord, Measurement, Reading, TIME_WINDOWS,
    TimeWindow,
};

/// A record's blood-pressure data with its shape resolved.
pub enum BloodPressureView<'a> {
    /// Canonical: one reading per daily time window.
    Windowed(&'a BloodPressureWindows),
    /// Legacy flat reading. Carries no window attribution and must never
    /// be displayed as if it were a morning reading.
    Single(&'a Reading),
    Absent,
}

impl<'a> BloodPressureView<'a> {
    #[must_use]
    pub fn of(record: &'a DailyRecord) -> Self {
        match record
            .health_metrics
            .as_ref()
            .and_then(|m| m.blood_pressure.as_ref())
        {
            Some(BloodPressureLog::Windowed(w)) => BloodPressureView::Windowed(w),
            Some(BloodPressureLog::Single(r)) => BloodPressureView::Single(r),
            None => BloodPressureView::Absent,
        }
    }

    /// Readings that count toward averages, with their window when the
    /// shape has one.
    #[must_use]
    pub fn qualifying(&self) -> Vec<(Option<TimeWindow>, &'a Reading)> {
        match self {
            BloodPressureView::Windowed(w) => TIME_WINDOWS
                .iter()
                .map(|&tw| (Some(tw), w.window(tw)))
                .filter(|(_, r)| r.qualifies())
                .collect(),
            BloodPressureView::Single(r) if r.qualifies() => vec![(None, *r)],
            _ => Vec::new(),
        }
    }
}

/// One fluid entry normalized across both shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidView<'a> {
    pub amount: f64,
    pub time: Option<&'a str>,
}

/// The day's fluid entries. The canonical shape wins whenever it is
/// present (even empty); the legacy `ounces` list is only consulted in
/// its absence, so the two never mix.
#[must_use]
pub fn fluid_entries(record: &DailyRecord) -> Vec<FluidView<'_>> {
    if let Some(fluid) = &record.fluid_intake {
        return fluid
            .entries
            .iter()
            .map(|e| FluidView {
                amount: e.amount.or_zero(),
                time: (!e.time.is_empty()).then_some(e.time.as_str()),
            })
            .collect();
    }

    if let Some(legacy) = record
        .health_metrics
        .as_ref()
        .and_then(|m| m.fluid_intake.as_ref())
    {
        return legacy
            .iter()
            .map(|e| FluidView {
                amount: e.ounces.or_zero(),
                time: None,
            })
            .collect();
    }

    Vec::new()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingField {
    Systolic,
    Diastolic,
    HeartRate,
}

/// Write one measurement into a reading, stamping the entry time on the
/// first value: `(empty time, measurement written) -> time = now`;
/// a reading whose `time` is already set keeps it on every later edit.
/// `period` is only filled on shapes that already track it. Direct
/// `time`/`period` writes do not pass through here and never re-stamp.
pub fn record_measurement(
    reading: &mut Reading,
    field: ReadingField,
    value: Measurement,
    now: NaiveTime,
) {
    let stamp = reading.time.is_empty() && value.is_present();

    match field {
        ReadingField::Systolic => reading.systolic = value,
        ReadingField::Diastolic => reading.diastolic = value,
        ReadingField::HeartRate => reading.heart_rate = value,
    }

    if stamp {
        reading.time = now.format("%H:%M").to_string();
        if reading.period.is_some() {
            let period = if now.hour() < 12 { "AM" } else { "PM" };
            reading.period = Some(period.to_string());
        }
    }
}
