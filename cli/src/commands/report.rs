use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

use vitals_core::report;
use vitals_core::store::Store;

/// Render the report over the retained records and write the artifact.
/// Returns the path and page count.
pub(crate) fn write_report(store: &Store, dir: &Path) -> Result<(PathBuf, usize)> {
    let records = store.fetch_all();
    let now = Local::now();

    let rendered = report::render(&records, now.naive_local());
    let path = dir.join(report::artifact_name(now.date_naive()));
    std::fs::write(&path, rendered.to_text())
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    Ok((path, rendered.page_count()))
}

pub(crate) fn cmd_report(store: &Store, out: Option<PathBuf>, json: bool) -> Result<()> {
    let dir = match out {
        Some(dir) => dir,
        None => std::env::current_dir().context("Could not determine current directory")?,
    };

    let days = store.fetch_all().len();
    let (path, pages) = write_report(store, &dir)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "path": path.display().to_string(),
                "pages": pages,
                "days": days,
            })
        );
    } else {
        println!("Wrote {} ({pages} pages, {days} days)", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitals_core::models::{DailyRecord, FoodEntry, Measurement};

    #[test]
    fn test_write_report_creates_fresh_artifact() {
        let store = Store::open_in_memory().unwrap();
        let mut record = DailyRecord::new("2024-01-08");
        record.meals.lunch.push(FoodEntry {
            sodium: Measurement::Number(900.0),
            ..FoodEntry::named("Soup")
        });
        store.upsert(&record).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let (path, pages) = write_report(&store, dir.path()).unwrap();

        assert!(path.exists());
        assert!(pages >= 1);
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("health-report-"));
        assert!(name.ends_with(".txt"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("HEALTH TRACKER REPORT"));
        assert!(text.contains("Soup"));
    }

    #[test]
    fn test_write_report_over_empty_store() {
        let store = Store::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let (path, pages) = write_report(&store, dir.path()).unwrap();
        assert!(path.exists());
        assert!(pages >= 1);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("0 days"));
    }
}
