use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use std::path::PathBuf;

pub struct Config {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "vitals").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = data_dir.join("vitals.db");

        Ok(Config { db_path, data_dir })
    }

    /// API key for the nutrition lookup: the `API_NINJAS_KEY` environment
    /// variable wins, else a `nutrition_api_key` file in the data dir.
    pub fn nutrition_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var("API_NINJAS_KEY") {
            let key = key.trim().to_string();
            if !key.is_empty() {
                return Ok(key);
            }
        }

        let path = self.data_dir.join("nutrition_api_key");
        let key = std::fs::read_to_string(&path).with_context(|| {
            format!(
                "No nutrition API key found. Set API_NINJAS_KEY or write the key to {}",
                path.display()
            )
        })?;
        let key = key.trim().to_string();
        if key.is_empty() {
            bail!("Nutrition API key file is empty: {}", path.display());
        }
        Ok(key)
    }
}
