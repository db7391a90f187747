use anyhow::{Result, bail};

use vitals_core::prefs::Preferences;
use vitals_core::store::Store;

/// Sections of `show` output that can be hidden.
const SECTIONS: &[&str] = &["meals", "bp", "fluid"];

fn pref_name(section: &str) -> String {
    format!("{section}Section")
}

pub(crate) fn cmd_prefs_set(store: &Store, section: &str, state: &str) -> Result<()> {
    let section = section.to_lowercase();
    if !SECTIONS.contains(&section.as_str()) {
        bail!(
            "Unknown section '{section}'. Must be one of: {}",
            SECTIONS.join(", ")
        );
    }

    let value = match state.to_lowercase().as_str() {
        "on" => true,
        "off" => false,
        _ => bail!("Invalid state '{state}'. Use 'on' or 'off'"),
    };

    Preferences::new(store).set(&pref_name(&section), value)?;
    println!("Section '{section}' is now {state}");
    Ok(())
}

pub(crate) fn cmd_prefs_show(store: &Store, json: bool) -> Result<()> {
    let prefs = Preferences::new(store);

    if json {
        let map: serde_json::Map<String, serde_json::Value> = SECTIONS
            .iter()
            .map(|s| {
                let on = prefs.get(&pref_name(s)).unwrap_or(true);
                ((*s).to_string(), serde_json::Value::Bool(on))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    for section in SECTIONS {
        let state = if prefs.get(&pref_name(section)).unwrap_or(true) {
            "on"
        } else {
            "off"
        };
        println!("{section}: {state}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_read_back() {
        let store = Store::open_in_memory().unwrap();
        cmd_prefs_set(&store, "fluid", "off").unwrap();

        let prefs = Preferences::new(&store);
        assert_eq!(prefs.get("fluidSection"), Some(false));
        // Unset sections default on.
        assert_eq!(prefs.get("mealsSection"), None);
    }

    #[test]
    fn test_rejects_unknown_section_and_state() {
        let store = Store::open_in_memory().unwrap();
        assert!(cmd_prefs_set(&store, "weather", "on").is_err());
        assert!(cmd_prefs_set(&store, "meals", "maybe").is_err());
    }
}
