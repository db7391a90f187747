use anyhow::Result;

use crate::store::Store;

/// UI display preferences: per-section collapse/expand flags.
///
/// Cosmetic state only. Flags live under `prefs:`-namespaced keys in the
/// same backing store as the records, so they can never collide with the
/// record collection key, and nothing in the data layer reads them.
pub struct Preferences<'a> {
    store: &'a Store,
}

impl<'a> Preferences<'a> {
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Preferences { store }
    }

    fn key(name: &str) -> String {
        format!("prefs:{name}")
    }

    /// Read a flag; unreadable or malformed values degrade to `None`
    /// (callers fall back to their default) like any other read failure.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        let raw = self.store.get_value(&Self::key(name)).ok()??;
        serde_json::from_str(&raw).ok()
    }

    pub fn set(&self, name: &str, value: bool) -> Result<()> {
        self.store.set_value(&Self::key(name), &value.to_string())
    }

    pub fn clear(&self, name: &str) -> Result<()> {
        self.store.delete_value(&Self::key(name))?;
        Ok(())
    }
}
