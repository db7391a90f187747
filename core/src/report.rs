//! Multi-page report rendering.
//!
//! Layout is a cursor-and-threshold pass: pages hold a fixed number of
//! content lines, blocks that would overflow move to a fresh page, and a
//! day's heading is never separated from its first content lines. Page
//! footers are filled in by a finalization pass once the page count is
//! known. The renderer hands the finished document back to the caller;
//! writing the artifact to disk is the caller's job.

use std::mem;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use crate::aggregate::{self, Status};
use crate::models::DailyRecord;
use crate::reconcile::{self, BloodPressureView};

pub const PAGE_WIDTH: usize = 78;
/// Content lines per page, excluding the footer line.
pub const PAGE_HEIGHT: usize = 54;

/// Minimum lines a day block needs on the current page: heading, rule,
/// and the first content line.
const DAY_KEEP_LINES: usize = 4;

pub const REPORT_PREFIX: &str = "health-report";

/// File name for a report generated on `date`; each invocation produces
/// a fresh artifact.
#[must_use]
pub fn artifact_name(date: NaiveDate) -> String {
    format!("{REPORT_PREFIX}-{date}.txt")
}

/// A fully laid-out report.
pub struct Report {
    pages: Vec<Vec<String>>,
}

impl Report {
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Finalize the document: pad every page to height, number the
    /// footers now that the total is known, separate pages with form feeds.
    #[must_use]
    pub fn to_text(&self) -> String {
        let total = self.pages.len();
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push('\u{c}');
                out.push('\n');
            }
            for line in page {
                out.push_str(line);
                out.push('\n');
            }
            for _ in page.len()..PAGE_HEIGHT {
                out.push('\n');
            }
            let footer = format!("Page {} of {total}", i + 1);
            let pad = PAGE_WIDTH.saturating_sub(footer.len()) / 2;
            out.push_str(&" ".repeat(pad));
            out.push_str(&footer);
            out.push('\n');
        }
        out
    }
}

/// Vertical cursor over fixed-height pages.
struct PageComposer {
    pages: Vec<Vec<String>>,
    current: Vec<String>,
}

impl PageComposer {
    fn new() -> Self {
        PageComposer {
            pages: Vec::new(),
            current: Vec::new(),
        }
    }

    fn line(&mut self, text: impl Into<String>) {
        if self.current.len() >= PAGE_HEIGHT {
            self.break_page();
        }
        self.current.push(text.into());
    }

    /// Separator line, suppressed at the top of a page.
    fn blank(&mut self) {
        if !self.current.is_empty() && self.current.len() < PAGE_HEIGHT {
            self.current.push(String::new());
        }
    }

    /// Break before a block of `lines` that would not fit as a unit.
    fn ensure(&mut self, lines: usize) {
        if !self.current.is_empty() && self.current.len() + lines > PAGE_HEIGHT {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        if !self.current.is_empty() {
            self.pages.push(mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> Vec<Vec<String>> {
        self.break_page();
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        self.pages
    }
}

fn marker(status: Status) -> &'static str {
    match status {
        Status::Good => "[ok]",
        Status::Moderate => "[~]",
        Status::Alert => "[!]",
    }
}

fn sodium_advice(status: Status) -> &'static str {
    match status {
        Status::Alert => "Average sodium intake exceeds the daily recommended limit (2300mg)",
        Status::Moderate => "Sodium intake is moderate but could be reduced",
        Status::Good => "Sodium intake is within a healthy range",
    }
}

fn potassium_advice(status: Status) -> &'static str {
    match status {
        Status::Alert => "Potassium intake is below recommended levels",
        Status::Moderate => "Consider increasing potassium-rich foods",
        Status::Good => "Potassium intake is adequate",
    }
}

fn fluid_advice(status: Status) -> &'static str {
    match status {
        Status::Alert => "Fluid intake is below the recommended daily amount",
        Status::Moderate => "Try to increase fluid intake to 64oz daily",
        Status::Good => "Fluid intake meets daily recommendations",
    }
}

/// Lay out the full report over the supplied records (expected pruned and
/// newest-first, as the store returns them).
#[must_use]
pub fn render(records: &[DailyRecord], generated_at: NaiveDateTime) -> Report {
    let mut doc = PageComposer::new();

    header(&mut doc, generated_at);
    summary_section(&mut doc, records);
    week_overview(&mut doc, records);

    // Detail section starts on a fresh page.
    doc.break_page();
    detail_section(&mut doc, records);

    Report {
        pages: doc.finish(),
    }
}

fn rule() -> String {
    "=".repeat(PAGE_WIDTH)
}

fn header(doc: &mut PageComposer, generated_at: NaiveDateTime) {
    doc.line(rule());
    doc.line("  HEALTH TRACKER REPORT");
    doc.line(format!(
        "  Generated on {}",
        generated_at.format("%B %d, %Y")
    ));
    doc.line(rule());
    doc.blank();
}

fn summary_section(doc: &mut PageComposer, records: &[DailyRecord]) {
    let summary = aggregate::period_summary(records);
    let sodium = aggregate::sodium_status(summary.avg_sodium);
    let potassium = aggregate::potassium_status(summary.avg_potassium);
    let fluid = aggregate::fluid_status(summary.avg_fluid);

    doc.line("SUMMARY OVERVIEW");
    doc.line("-".repeat(16));
    doc.blank();
    doc.line(format!(
        "  {:<4} Average Daily Sodium     {:>6} mg",
        marker(sodium),
        summary.avg_sodium
    ));
    doc.line(format!(
        "  {:<4} Average Daily Potassium  {:>6} mg",
        marker(potassium),
        summary.avg_potassium
    ));
    doc.line(format!(
        "  {:<4} Average Fluid Intake     {:>6} oz",
        marker(fluid),
        summary.avg_fluid
    ));
    doc.line(format!(
        "  {:<4} Days Tracked             {:>6} days",
        "[i]", summary.days_tracked
    ));
    doc.blank();

    doc.line("  Key Insights");
    doc.line(format!("  {:<4} {}", marker(sodium), sodium_advice(sodium)));
    doc.line(format!(
        "  {:<4} {}",
        marker(potassium),
        potassium_advice(potassium)
    ));
    doc.line(format!("  {:<4} {}", marker(fluid), fluid_advice(fluid)));
    doc.blank();
}

#[derive(Tabled)]
struct OverviewRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Sodium")]
    sodium: String,
    #[tabled(rename = "Potassium")]
    potassium: String,
    #[tabled(rename = "Fluid")]
    fluid: String,
    #[tabled(rename = "BP (AM)")]
    bp: String,
}

/// Representative reading for the overview table: the morning window if
/// present, else the legacy flat reading, else "-".
fn representative_bp(record: &DailyRecord) -> String {
    match BloodPressureView::of(record) {
        BloodPressureView::Windowed(w) if w.morning.qualifies() => format!(
            "{:.0}/{:.0}",
            w.morning.systolic.or_zero(),
            w.morning.diastolic.or_zero()
        ),
        BloodPressureView::Single(r) if r.qualifies() => {
            format!("{:.0}/{:.0}", r.systolic.or_zero(), r.diastolic.or_zero())
        }
        _ => "-".to_string(),
    }
}

fn short_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_or_else(|_| date.to_string(), |d| d.format("%b %d").to_string())
}

fn week_overview(doc: &mut PageComposer, records: &[DailyRecord]) {
    doc.line("LAST 7 DAYS OVERVIEW");
    doc.line("-".repeat(20));
    doc.blank();

    if records.is_empty() {
        doc.line("  No records in the last 7 days.");
        doc.blank();
        return;
    }

    let rows: Vec<OverviewRow> = records
        .iter()
        .take(7)
        .map(|record| {
            let totals = aggregate::day_totals(record);
            OverviewRow {
                date: short_date(&record.date),
                sodium: format!("{:.0}mg", totals.sodium),
                potassium: format!("{:.0}mg", totals.potassium),
                fluid: format!("{:.0}oz", aggregate::day_fluid_total(record)),
                bp: representative_bp(record),
            }
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();

    let lines: Vec<String> = table.lines().map(String::from).collect();
    doc.ensure(lines.len());
    for line in lines {
        doc.line(line);
    }
    doc.blank();
}

fn detail_section(doc: &mut PageComposer, records: &[DailyRecord]) {
    doc.line("DETAILED DAILY RECORDS");
    doc.line("-".repeat(22));
    doc.blank();

    for record in records {
        match day_block(record) {
            Ok(lines) => {
                doc.ensure(lines.len().min(DAY_KEEP_LINES));
                for line in lines {
                    doc.line(line);
                }
            }
            Err(_) => {
                // One malformed day must not take the report down with it.
                doc.line(format!("{} — no data for this day", record.date));
            }
        }
        doc.blank();
    }
}

/// One day's detail lines. Only the date heading can fail; everything
/// else degrades field-by-field through the reconciled views.
fn day_block(record: &DailyRecord) -> Result<Vec<String>> {
    let date = crate::models::validate_date(&record.date)?;
    let mut lines = Vec::new();

    let heading = date.format("%A, %B %-d, %Y").to_string();
    lines.push(heading.clone());
    lines.push("-".repeat(heading.len()));

    let totals = aggregate::day_totals(record);
    lines.push(format!(
        "  Calories: {:.0}   Sodium: {:.0}mg   Potassium: {:.0}mg",
        totals.calories, totals.sodium, totals.potassium
    ));

    if record.meals.is_empty() {
        lines.push("  No meals recorded".to_string());
    } else {
        for (slot, entries) in record.meals.iter() {
            if entries.is_empty() {
                continue;
            }
            lines.push(format!("  {}:", slot.label()));
            for entry in entries {
                lines.push(format!(
                    "    - {} (Na: {:.0}mg, K: {:.0}mg)",
                    entry.name,
                    entry.sodium.or_zero(),
                    entry.potassium.or_zero()
                ));
            }
        }
    }

    let qualifying = BloodPressureView::of(record).qualifying();
    let fluid_entries = reconcile::fluid_entries(record);
    if !qualifying.is_empty() || !fluid_entries.is_empty() {
        lines.push("  Health Metrics:".to_string());
        for (window, reading) in qualifying {
            let label = window.map_or_else(|| "BP".to_string(), |w| format!("{} BP", w.label()));
            let values = format!(
                "{:.0}/{:.0}",
                reading.systolic.or_zero(),
                reading.diastolic.or_zero()
            );
            if reading.time.is_empty() {
                lines.push(format!("    - {label}: {values}"));
            } else {
                lines.push(format!("    - {label}: {values} at {}", reading.time));
            }
        }
        if !fluid_entries.is_empty() {
            let total: f64 = fluid_entries.iter().map(|e| e.amount).sum();
            lines.push(format!("    - Fluid intake: {total:.0}oz"));
        }
    }

    Ok(lines)
}
