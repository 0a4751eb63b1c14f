//! Conversion settings and the built-in daily item list.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Reference hourly wage used when none is configured.
pub const DEFAULT_HOURLY_WAGE: f64 = 183.0;
/// Number of item segments shown in a badge by default.
pub const DEFAULT_MAX_ITEMS_DISPLAY: usize = 2;
/// Order assigned to items that do not carry one.
pub const DEFAULT_ITEM_ORDER: i64 = 999;
/// Range accepted for `max_items_display` after normalization.
pub const MAX_ITEMS_DISPLAY_RANGE: std::ops::RangeInclusive<usize> = 1..=5;

const NEW_ITEM_NAME: &str = "新物件";
const NEW_ITEM_PRICE: f64 = 100.0;
const UNKNOWN_ITEM_NAME: &str = "未知物件";

/// A reference good used as a conversion unit, e.g. a cup of coffee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyItem {
    #[serde(default)]
    pub id: String,
    #[serde(default = "unknown_item_name")]
    pub name: String,
    /// Price of one unit; items priced at or below zero are never converted
    #[serde(default)]
    pub price: f64,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Display position, ascending
    #[serde(default = "default_item_order")]
    pub order: i64,
}

impl DailyItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, order: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            enabled: true,
            order,
        }
    }

    /// Whether this item can serve as a conversion unit.
    pub fn is_convertible(&self) -> bool {
        self.enabled && self.price.is_finite() && self.price > 0.0
    }
}

fn unknown_item_name() -> String {
    UNKNOWN_ITEM_NAME.to_string()
}

fn enabled_by_default() -> bool {
    true
}

fn default_item_order() -> i64 {
    DEFAULT_ITEM_ORDER
}

/// Coffee, bubble tea and a lunch box, in that display order.
pub fn default_daily_items() -> Vec<DailyItem> {
    vec![
        DailyItem::new("coffee", "咖啡", 120.0, 0),
        DailyItem::new("bubble_tea", "珍奶", 65.0, 1),
        DailyItem::new("lunch", "便當", 100.0, 2),
    ]
}

/// How the hours segment of a badge is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HoursFormat {
    /// `2.7 小時`
    #[default]
    Decimal,
    /// `2h 42m`
    Clock,
}

/// User settings that drive badge generation.
///
/// Field names serialize in camelCase so that the JSON stored by the browser
/// extension (`hourlyWage`, `showHours`, ...) loads as-is. Missing keys take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionSettings {
    /// Reference wage used to turn a price into hours of work
    pub hourly_wage: f64,
    /// Include the hours segment
    pub show_hours: bool,
    /// Include the daily item segment
    pub show_items: bool,
    /// Maximum number of items rendered in the badge
    #[serde(deserialize_with = "deserialize_item_count")]
    pub max_items_display: usize,
    /// Conversion units, replaced wholesale on update
    pub daily_items: Vec<DailyItem>,
    pub hours_format: HoursFormat,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            hourly_wage: DEFAULT_HOURLY_WAGE,
            show_hours: true,
            show_items: true,
            max_items_display: DEFAULT_MAX_ITEMS_DISPLAY,
            daily_items: default_daily_items(),
            hours_format: HoursFormat::Decimal,
        }
    }
}

/// Reads any JSON number as a count: negatives and NaN become 0 and
/// fractions are truncated, leaving range checks to `normalized`.
fn deserialize_item_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let count = f64::deserialize(deserializer)?;
    // `as` saturates and maps NaN to 0
    Ok(count.max(0.0) as usize)
}

/// Keys an imported settings document must carry, with the JSON type each must have.
const REQUIRED_KEYS: [(&str, fn(&Value) -> bool, &str); 5] = [
    ("hourlyWage", Value::is_number, "a number"),
    ("showHours", Value::is_boolean, "a boolean"),
    ("showItems", Value::is_boolean, "a boolean"),
    ("maxItemsDisplay", Value::is_number, "a number"),
    ("dailyItems", Value::is_array, "an array"),
];

impl ConversionSettings {
    /// Loads settings as stored by the extension. Missing keys fall back to
    /// their defaults and the result is normalized.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self =
            serde_json::from_str(json).context("Failed to parse conversion settings")?;
        Ok(settings.normalized())
    }

    /// Strict import of an exported settings file.
    ///
    /// Unlike [`ConversionSettings::from_json`], every core key must be present
    /// with the expected JSON type.
    pub fn import_json(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).context("Failed to read settings file")?;
        let object = value
            .as_object()
            .ok_or_else(|| anyhow!("Settings file must contain a JSON object"))?;

        for (key, has_type, expected) in REQUIRED_KEYS {
            match object.get(key) {
                None => bail!("Settings file is missing `{}`", key),
                Some(field) if !has_type(field) => {
                    bail!("Settings key `{}` must be {}", key, expected)
                }
                Some(_) => {}
            }
        }

        let settings: Self =
            serde_json::from_value(value).context("Failed to parse conversion settings")?;
        Ok(settings.normalized())
    }

    /// Pretty-printed JSON, readable by [`ConversionSettings::import_json`].
    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize conversion settings")
    }

    /// Replaces every field with its default value.
    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    /// Brings out-of-range values back into range: a non-positive wage falls
    /// back to the default and `max_items_display` is clamped to `1..=5`.
    pub fn normalized(mut self) -> Self {
        if !(self.hourly_wage.is_finite() && self.hourly_wage > 0.0) {
            debug!(hourly_wage = self.hourly_wage, "invalid hourly wage, using default");
            self.hourly_wage = DEFAULT_HOURLY_WAGE;
        }
        self.max_items_display = self.max_items_display.clamp(
            *MAX_ITEMS_DISPLAY_RANGE.start(),
            *MAX_ITEMS_DISPLAY_RANGE.end(),
        );
        self
    }

    /// Items that take part in conversion.
    pub fn enabled_items(&self) -> impl Iterator<Item = &DailyItem> {
        self.daily_items.iter().filter(|item| item.enabled)
    }

    /// Appends a new enabled item placed after every existing one and returns its id.
    ///
    /// The id is `item_<n>` where `n` is one past the largest number found in
    /// the existing ids. When that id is already taken (the largest number
    /// saturated at `u64::MAX`), the smallest free `item_<n>` is used instead.
    pub fn add_item(&mut self, name: impl Into<String>, price: f64) -> String {
        let next = self
            .daily_items
            .iter()
            .map(|item| id_number(&item.id))
            .max()
            .map_or(0, |n| n.saturating_add(1));
        let is_taken = |id: &str| self.daily_items.iter().any(|item| item.id == id);

        let mut id = format!("item_{}", next);
        if is_taken(&id) {
            id = (0..)
                .map(|n: u64| format!("item_{}", n))
                .find(|candidate| !is_taken(candidate))
                .unwrap_or_default();
        }

        let order = self.daily_items.len() as i64;
        self.daily_items.push(DailyItem::new(id.clone(), name, price, order));
        id
    }

    /// Appends a placeholder item, as the options page does for "add item".
    pub fn add_placeholder_item(&mut self) -> String {
        self.add_item(NEW_ITEM_NAME, NEW_ITEM_PRICE)
    }

    /// Removes the item with `id`. Returns whether anything was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.daily_items.len();
        self.daily_items.retain(|item| item.id != id);
        self.daily_items.len() != before
    }
}

/// Digits of an id read as one number (`item_12` -> 12); ids without digits
/// count as 0 and digit runs too long for `u64` count as `u64::MAX`.
fn id_number(id: &str) -> u64 {
    let digits: String = id.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Partial settings change applied to a [`crate::BadgeTextGenerator`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsUpdate {
    /// Ignored unless positive
    pub hourly_wage: Option<f64>,
    /// Ignored when empty
    pub daily_items: Option<Vec<DailyItem>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_extension() {
        let settings = ConversionSettings::default();
        assert_eq!(settings.hourly_wage, 183.0);
        assert!(settings.show_hours);
        assert!(settings.show_items);
        assert_eq!(settings.max_items_display, 2);
        let names: Vec<&str> = settings.daily_items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["咖啡", "珍奶", "便當"]);
        assert_eq!(settings.hours_format, HoursFormat::Decimal);
    }

    #[test]
    fn from_json_fills_missing_keys() {
        let settings = ConversionSettings::from_json(r#"{"hourlyWage": 200, "showItems": false}"#)
            .unwrap();
        assert_eq!(settings.hourly_wage, 200.0);
        assert!(settings.show_hours);
        assert!(!settings.show_items);
        assert_eq!(settings.daily_items, default_daily_items());
    }

    #[test]
    fn item_fields_default_when_absent() {
        let settings =
            ConversionSettings::from_json(r#"{"dailyItems": [{"id": "tea", "price": 30}]}"#)
                .unwrap();
        let item = &settings.daily_items[0];
        assert_eq!(item.name, "未知物件");
        assert!(item.enabled);
        assert_eq!(item.order, DEFAULT_ITEM_ORDER);
    }

    #[test]
    fn normalization_repairs_out_of_range_values() {
        let settings =
            ConversionSettings::from_json(r#"{"hourlyWage": 0, "maxItemsDisplay": 9}"#).unwrap();
        assert_eq!(settings.hourly_wage, DEFAULT_HOURLY_WAGE);
        assert_eq!(settings.max_items_display, 5);

        let settings = ConversionSettings::from_json(r#"{"maxItemsDisplay": 0}"#).unwrap();
        assert_eq!(settings.max_items_display, 1);
    }

    #[test]
    fn from_json_rejects_malformed_input() {
        assert!(ConversionSettings::from_json("not json").is_err());
        assert!(ConversionSettings::from_json(r#"{"maxItemsDisplay": "two"}"#).is_err());
    }

    #[test]
    fn negative_item_count_is_clamped_not_rejected() {
        let settings =
            ConversionSettings::from_json(r#"{"hourlyWage": 250, "maxItemsDisplay": -1}"#)
                .unwrap();
        assert_eq!(settings.hourly_wage, 250.0);
        assert_eq!(settings.max_items_display, 1);

        let settings = ConversionSettings::from_json(r#"{"maxItemsDisplay": 3.0}"#).unwrap();
        assert_eq!(settings.max_items_display, 3);
    }

    #[test]
    fn import_requires_every_core_key() {
        let err = ConversionSettings::import_json(
            r#"{"hourlyWage": 183, "showHours": true, "showItems": true, "maxItemsDisplay": 2}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("dailyItems"));
    }

    #[test]
    fn import_checks_value_types() {
        let err = ConversionSettings::import_json(
            r#"{"hourlyWage": "183", "showHours": true, "showItems": true,
                "maxItemsDisplay": 2, "dailyItems": []}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("hourlyWage"));

        assert!(ConversionSettings::import_json("[]").is_err());
    }

    #[test]
    fn export_then_import_keeps_settings() {
        let mut settings = ConversionSettings::default();
        settings.hourly_wage = 250.0;
        settings.show_hours = false;
        let json = settings.export_json().unwrap();
        assert!(json.contains("\"hourlyWage\""));
        assert_eq!(ConversionSettings::import_json(&json).unwrap(), settings);
    }

    #[test]
    fn add_item_picks_next_id_and_order() {
        let mut settings = ConversionSettings::default();
        let id = settings.add_placeholder_item();
        assert_eq!(id, "item_1");
        let added = settings.daily_items.last().unwrap();
        assert_eq!(added.name, "新物件");
        assert_eq!(added.price, 100.0);
        assert_eq!(added.order, 3);

        assert_eq!(settings.add_item("早餐", 80.0), "item_2");
    }

    #[test]
    fn add_item_to_empty_list_starts_at_zero() {
        let mut settings = ConversionSettings {
            daily_items: Vec::new(),
            ..Default::default()
        };
        assert_eq!(settings.add_item("茶", 30.0), "item_0");
        assert_eq!(settings.daily_items[0].order, 0);
    }

    #[test]
    fn add_item_after_largest_possible_id() {
        let mut settings = ConversionSettings::default();
        settings
            .daily_items
            .push(DailyItem::new("item_18446744073709551615", "x", 1.0, 3));
        assert_eq!(settings.add_item("y", 2.0), "item_0");
        assert_eq!(settings.add_item("z", 3.0), "item_1");
    }

    #[test]
    fn add_item_after_id_longer_than_u64() {
        let mut settings = ConversionSettings::default();
        settings
            .daily_items
            .push(DailyItem::new("item_99999999999999999999999", "x", 1.0, 3));
        let id = settings.add_item("y", 2.0);
        assert_eq!(id, "item_18446744073709551615");

        let ids: Vec<&str> = settings.daily_items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.iter().filter(|existing| **existing == id).count(), 1);
    }

    #[test]
    fn remove_item_by_id() {
        let mut settings = ConversionSettings::default();
        assert!(settings.remove_item("coffee"));
        assert!(!settings.remove_item("coffee"));
        assert_eq!(settings.daily_items.len(), 2);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut settings = ConversionSettings::default();
        settings.hourly_wage = 1.0;
        settings.daily_items.clear();
        settings.reset_to_defaults();
        assert_eq!(settings, ConversionSettings::default());
    }

    #[test]
    fn enabled_items_skips_disabled() {
        let mut settings = ConversionSettings::default();
        settings.daily_items[1].enabled = false;
        let ids: Vec<&str> = settings.enabled_items().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["coffee", "lunch"]);
    }
}
