//! Menu Model

use serde::{Deserialize, Serialize};

/// Menu item entity (菜品)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    /// Price in whole currency units
    pub price: i64,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub allergens: Vec<String>,
}
