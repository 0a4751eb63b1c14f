//! Result types produced by badge conversion.

use serde::{Deserialize, Serialize};

/// How many units of one daily item a price buys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemConversionResult {
    /// Display name of the item (e.g., "咖啡")
    pub name: String,
    /// Units purchasable, rounded to one decimal and never below 0.1
    pub quantity: f64,
    /// Display position copied from the item
    pub order: i64,
}
