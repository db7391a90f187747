use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A scalar measurement exactly as persisted: a number, a numeric string,
/// or nothing at all. Historical records are inconsistent about which of
/// the three they use, and the stored representation must survive a
/// round trip untouched, so coercion happens on read via [`Measurement::as_f64`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Measurement {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Measurement {
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Measurement::Number(n) => Some(*n),
            Measurement::Text(s) => s.trim().parse().ok(),
            Measurement::Empty => None,
        }
    }

    /// Numeric value for aggregation; anything non-numeric contributes 0.
    #[must_use]
    pub fn or_zero(&self) -> f64 {
        self.as_f64().unwrap_or(0.0)
    }

    /// Whether a usable numeric value is present.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.as_f64().is_some()
    }

    /// True only for the fully-absent variant (used to skip serialization;
    /// an empty string is a stored value and must round-trip as one).
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Measurement::Empty)
    }
}

impl From<f64> for Measurement {
    fn from(v: f64) -> Self {
        Measurement::Number(v)
    }
}

pub const MEAL_SLOTS: [MealSlot; 4] = [
    MealSlot::Breakfast,
    MealSlot::Lunch,
    MealSlot::Dinner,
    MealSlot::Snacks,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealSlot {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            "snacks" | "snack" => Ok(MealSlot::Snacks),
            _ => bail!("Invalid meal slot '{s}'. Must be one of: breakfast, lunch, dinner, snacks"),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snacks => "snacks",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
            MealSlot::Snacks => "Snacks",
        }
    }
}

/// One logged food with its nutrient content. Numeric fields tolerate the
/// string/number/missing mix found in stored data; the optional trailing
/// fields are passthroughs from the lookup service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Measurement::is_absent")]
    pub calories: Measurement,
    #[serde(default, skip_serializing_if = "Measurement::is_absent")]
    pub protein: Measurement,
    #[serde(default, skip_serializing_if = "Measurement::is_absent")]
    pub carbs: Measurement,
    #[serde(default, skip_serializing_if = "Measurement::is_absent")]
    pub fat: Measurement,
    #[serde(default, skip_serializing_if = "Measurement::is_absent")]
    pub sodium: Measurement,
    #[serde(default, skip_serializing_if = "Measurement::is_absent")]
    pub potassium: Measurement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Measurement::is_absent")]
    pub quantity: Measurement,
}

impl FoodEntry {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        FoodEntry {
            name: name.into(),
            calories: Measurement::Empty,
            protein: Measurement::Empty,
            carbs: Measurement::Empty,
            fat: Measurement::Empty,
            sodium: Measurement::Empty,
            potassium: Measurement::Empty,
            meal_type: None,
            units: None,
            quantity: Measurement::Empty,
        }
    }
}

/// The four meal slots of a day. Entry order within a slot is insertion
/// order and is meaningful for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Meals {
    #[serde(default)]
    pub breakfast: Vec<FoodEntry>,
    #[serde(default)]
    pub lunch: Vec<FoodEntry>,
    #[serde(default)]
    pub dinner: Vec<FoodEntry>,
    #[serde(default)]
    pub snacks: Vec<FoodEntry>,
}

impl Meals {
    #[must_use]
    pub fn slot(&self, slot: MealSlot) -> &[FoodEntry] {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
            MealSlot::Snacks => &self.snacks,
        }
    }

    pub fn slot_mut(&mut self, slot: MealSlot) -> &mut Vec<FoodEntry> {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
            MealSlot::Snacks => &mut self.snacks,
        }
    }

    /// All slots in display order.
    pub fn iter(&self) -> impl Iterator<Item = (MealSlot, &[FoodEntry])> {
        MEAL_SLOTS.iter().map(|&s| (s, self.slot(s)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        MEAL_SLOTS.iter().all(|&s| self.slot(s).is_empty())
    }
}

pub const TIME_WINDOWS: [TimeWindow; 3] = [
    TimeWindow::Morning,
    TimeWindow::Afternoon,
    TimeWindow::Evening,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Morning,
    Afternoon,
    Evening,
}

impl TimeWindow {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "morning" => Ok(TimeWindow::Morning),
            "afternoon" => Ok(TimeWindow::Afternoon),
            "evening" => Ok(TimeWindow::Evening),
            _ => bail!("Invalid time window '{s}'. Must be one of: morning, afternoon, evening"),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::Morning => "morning",
            TimeWindow::Afternoon => "afternoon",
            TimeWindow::Evening => "evening",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TimeWindow::Morning => "Morning",
            TimeWindow::Afternoon => "Afternoon",
            TimeWindow::Evening => "Evening",
        }
    }
}

/// One blood-pressure measurement. `time` is "HH:MM" or empty; `period`
/// ("AM"/"PM") only appears on legacy flat readings and is preserved as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    #[serde(default, skip_serializing_if = "Measurement::is_absent")]
    pub systolic: Measurement,
    #[serde(default, skip_serializing_if = "Measurement::is_absent")]
    pub diastolic: Measurement,
    #[serde(default, skip_serializing_if = "Measurement::is_absent")]
    pub heart_rate: Measurement,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl Reading {
    /// A reading exists once any of its three measurements holds a value.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.systolic.is_present() || self.diastolic.is_present() || self.heart_rate.is_present()
    }

    /// A reading counts toward averages only with both systolic and diastolic.
    #[must_use]
    pub fn qualifies(&self) -> bool {
        self.systolic.is_present() && self.diastolic.is_present()
    }
}

/// Canonical blood-pressure shape: one reading per daily time window.
/// Unknown keys are rejected so a legacy flat reading (which carries
/// `systolic` at this level) can never deserialize as windowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BloodPressureWindows {
    #[serde(default)]
    pub morning: Reading,
    #[serde(default)]
    pub afternoon: Reading,
    #[serde(default)]
    pub evening: Reading,
}

impl BloodPressureWindows {
    #[must_use]
    pub fn window(&self, window: TimeWindow) -> &Reading {
        match window {
            TimeWindow::Morning => &self.morning,
            TimeWindow::Afternoon => &self.afternoon,
            TimeWindow::Evening => &self.evening,
        }
    }

    pub fn window_mut(&mut self, window: TimeWindow) -> &mut Reading {
        match window {
            TimeWindow::Morning => &mut self.morning,
            TimeWindow::Afternoon => &mut self.afternoon,
            TimeWindow::Evening => &mut self.evening,
        }
    }
}

/// Both historical blood-pressure shapes, resolved once at the read
/// boundary. Stored bytes are never rewritten from one variant to the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BloodPressureLog {
    Windowed(BloodPressureWindows),
    /// Legacy flat reading with no window attribution.
    Single(Reading),
}

/// Legacy fluid shape: a bare list of `{ounces}` under `healthMetrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyFluidEntry {
    #[serde(default, skip_serializing_if = "Measurement::is_absent")]
    pub ounces: Measurement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<BloodPressureLog>,
    /// Legacy location for fluid entries, predating `DailyRecord::fluid_intake`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluid_intake: Option<Vec<LegacyFluidEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidEntry {
    #[serde(default, skip_serializing_if = "Measurement::is_absent")]
    pub amount: Measurement,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timestamp: String,
}

pub const DEFAULT_FLUID_GOAL_OZ: f64 = 66.0;

fn default_fluid_goal() -> Measurement {
    Measurement::Number(DEFAULT_FLUID_GOAL_OZ)
}

/// Canonical fluid shape: a daily goal plus individual entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidIntake {
    #[serde(default = "default_fluid_goal")]
    pub goal: Measurement,
    #[serde(default)]
    pub entries: Vec<FluidEntry>,
}

impl Default for FluidIntake {
    fn default() -> Self {
        FluidIntake {
            goal: default_fluid_goal(),
            entries: Vec::new(),
        }
    }
}

/// One day of tracked data. `date` (`YYYY-MM-DD`) is the identity key:
/// the store holds at most one record per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: String,
    #[serde(default)]
    pub meals: Meals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_metrics: Option<HealthMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluid_intake: Option<FluidIntake>,
}

impl DailyRecord {
    #[must_use]
    pub fn new(date: impl Into<String>) -> Self {
        DailyRecord {
            date: date.into(),
            meals: Meals::default(),
            health_metrics: None,
            fluid_intake: None,
        }
    }

    pub fn health_metrics_mut(&mut self) -> &mut HealthMetrics {
        self.health_metrics.get_or_insert_with(HealthMetrics::default)
    }

    pub fn fluid_intake_mut(&mut self) -> &mut FluidIntake {
        self.fluid_intake.get_or_insert_with(FluidIntake::default)
    }

    /// The canonical windowed blood-pressure shape for writing. A legacy
    /// flat reading on the same day is superseded, matching the entry
    /// form's behavior.
    pub fn windows_mut(&mut self) -> &mut BloodPressureWindows {
        let bp = &mut self.health_metrics_mut().blood_pressure;
        if !matches!(bp, Some(BloodPressureLog::Windowed(_))) {
            *bp = Some(BloodPressureLog::Windowed(BloodPressureWindows::default()));
        }
        match bp {
            Some(BloodPressureLog::Windowed(w)) => w,
            _ => unreachable!("blood pressure was just set to the windowed shape"),
        }
    }
}

pub fn validate_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date '{date}'. Must be YYYY-MM-DD"))
}
