use serde::{Deserialize, Serialize};

/// A yacht listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Yacht {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub location: String,
    pub yacht_type: String,
    pub capacity: u32,
    /// Price per night.
    pub price: f64,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Filters for `GET /api/catalog/yachts/search`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YachtSearch {
    pub location: Option<String>,
    pub yacht_type: Option<String>,
    pub min_capacity: Option<u32>,
    pub max_price: Option<f64>,
}

impl YachtSearch {
    /// Query-string pairs in the backend's parameter names.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(location) = self.location.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("location", location.to_string()));
        }
        if let Some(yacht_type) = self.yacht_type.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("yachtType", yacht_type.to_string()));
        }
        if let Some(min_capacity) = self.min_capacity.filter(|c| *c > 0) {
            pairs.push(("minCapacity", min_capacity.to_string()));
        }
        if let Some(max_price) = self.max_price.filter(|p| *p > 0.0) {
            pairs.push(("maxPrice", max_price.to_string()));
        }
        pairs
    }
}
