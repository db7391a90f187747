use anyhow::{Context, Result};

use vitals_core::models::FoodEntry;
use vitals_core::nutrition::{NutrientLookup, NutritionItem, item_to_entry};

const NUTRITION_URL: &str = "https://api.api-ninjas.com/v1/nutrition";

pub struct ApiNinjasClient {
    client: reqwest::Client,
    api_key: String,
    rt: tokio::runtime::Handle,
}

impl ApiNinjasClient {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "vitals-cli/{} (health tracker)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            api_key,
            rt: tokio::runtime::Handle::current(),
        }
    }

    pub async fn search_async(&self, query: &str) -> Result<Vec<FoodEntry>> {
        let resp = self
            .client
            .get(NUTRITION_URL)
            .query(&[("query", query)])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .context("Failed to reach nutrition API")?;

        let items: Vec<NutritionItem> = resp
            .json()
            .await
            .context("Failed to parse nutrition response")?;

        Ok(items.into_iter().filter_map(item_to_entry).collect())
    }
}

impl NutrientLookup for ApiNinjasClient {
    fn search(&self, query: &str) -> Result<Vec<FoodEntry>> {
        self.rt.block_on(self.search_async(query))
    }
}
