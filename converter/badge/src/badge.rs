//! Badge text generation
//!
//! Converts a price into hours of work and daily item quantities, and renders
//! both into the short text shown next to a price. Every function here is
//! total: prices that cannot be converted produce `0.0`, an empty list or an
//! empty string, never an error.

use tracing::{debug, trace};
use utils::{format_decimal, round_positive_tenth};

use crate::config::{ConversionSettings, DailyItem, HoursFormat, SettingsUpdate};
use crate::types::ItemConversionResult;

/// Unit label appended to the hours segment.
pub const HOURS_UNIT: &str = "小時";
/// Separator placed between badge segments and between item entries.
pub const SEGMENT_SEPARATOR: &str = " · ";

/// Items listed in the detail text shown when a badge is clicked.
const DETAIL_ITEMS: usize = 3;

/// Returns the price when it is a finite, strictly positive amount.
fn convertible(price: Option<f64>) -> Option<f64> {
    price.filter(|p| p.is_finite() && *p > 0.0)
}

/// Computes how many hours of work `price` costs at `hourly_wage`.
///
/// # Returns
/// The hours rounded to one decimal and never below `0.1`, or `0.0` when the
/// price is missing or non-positive or the wage is not a positive amount.
pub fn calculate_hours(price: Option<f64>, hourly_wage: f64) -> f64 {
    let Some(price) = convertible(price) else {
        return 0.0;
    };
    if !(hourly_wage.is_finite() && hourly_wage > 0.0) {
        debug!(hourly_wage, "hourly wage is not positive, skipping hours");
        return 0.0;
    }

    round_positive_tenth(price / hourly_wage).unwrap_or_else(|| {
        debug!(price, hourly_wage, "hours overflow, skipping hours");
        0.0
    })
}

/// Converts `price` into a quantity of each enabled, positively priced item.
///
/// Results are sorted by ascending `order`; items sharing an order keep
/// their position in `items`.
pub fn calculate_items(price: Option<f64>, items: &[DailyItem]) -> Vec<ItemConversionResult> {
    let Some(price) = convertible(price) else {
        return Vec::new();
    };

    let mut results: Vec<ItemConversionResult> = items
        .iter()
        .filter(|item| item.is_convertible())
        .filter_map(|item| {
            let Some(quantity) = round_positive_tenth(price / item.price) else {
                debug!(price, item = %item.id, "quantity overflow, skipping item");
                return None;
            };
            Some(ItemConversionResult {
                name: item.name.clone(),
                quantity,
                order: item.order,
            })
        })
        .collect();

    // sort_by_key is stable
    results.sort_by_key(|result| result.order);
    trace!(price, count = results.len(), "converted price into daily items");
    results
}

/// Renders hours as `"2.7 小時"`. Empty for zero or negative hours.
pub fn format_hours_text(hours: f64) -> String {
    if hours.is_nan() || hours <= 0.0 {
        return String::new();
    }
    format!("{} {}", format_decimal(hours, 1), HOURS_UNIT)
}

/// Renders hours as whole minutes: `"42m"`, `"2h"` or `"2h 42m"`.
pub fn format_hours_clock(hours: f64) -> String {
    if !hours.is_finite() || hours <= 0.0 {
        return String::new();
    }

    let total_minutes = (hours * 60.0).round() as u64;
    let h = total_minutes / 60;
    let m = total_minutes % 60;

    match (h, m) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Renders the first `max_display` results as `"4.2 咖啡 · 7.7 珍奶"`.
pub fn format_items_text(results: &[ItemConversionResult], max_display: usize) -> String {
    results
        .iter()
        .take(max_display)
        .map(|result| format!("{} {}", format_decimal(result.quantity, 1), result.name))
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR)
}

fn hours_segment(hours: f64, format: HoursFormat) -> String {
    match format {
        HoursFormat::Decimal => format_hours_text(hours),
        HoursFormat::Clock => format_hours_clock(hours),
    }
}

/// Builds the full badge text for `price`.
///
/// # Arguments
/// * `price` - Price of the good; missing or non-positive prices yield `""`
/// * `settings` - Settings to apply, or `None` for the built-in defaults
///
/// # Returns
/// The hours segment and the item segment joined by `" · "`, omitting
/// whichever is disabled or empty.
pub fn generate_badge_text(price: Option<f64>, settings: Option<&ConversionSettings>) -> String {
    match settings {
        Some(settings) => render_badge(price, settings),
        None => render_badge(price, &ConversionSettings::default()),
    }
}

fn render_badge(price: Option<f64>, settings: &ConversionSettings) -> String {
    if convertible(price).is_none() {
        debug!(?price, "price not convertible, no badge");
        return String::new();
    }

    let mut segments = Vec::with_capacity(2);

    if settings.show_hours {
        let hours = calculate_hours(price, settings.hourly_wage);
        let text = hours_segment(hours, settings.hours_format);
        if !text.is_empty() {
            segments.push(text);
        }
    }

    if settings.show_items && !settings.daily_items.is_empty() {
        let results = calculate_items(price, &settings.daily_items);
        let text = format_items_text(&results, settings.max_items_display);
        if !text.is_empty() {
            segments.push(text);
        }
    }

    segments.join(SEGMENT_SEPARATOR)
}

/// Builds the compact breakdown shown when a badge is clicked:
/// `"2.7h · 4.2咖啡 · 7.7珍奶 · 5.0便當"`, with up to three items.
pub fn generate_detail_text(price: Option<f64>, settings: &ConversionSettings) -> String {
    if convertible(price).is_none() {
        return String::new();
    }

    let hours = calculate_hours(price, settings.hourly_wage);
    let hours_part = (hours > 0.0).then(|| format!("{}h", format_decimal(hours, 1)));

    hours_part
        .into_iter()
        .chain(
            calculate_items(price, &settings.daily_items)
                .into_iter()
                .take(DETAIL_ITEMS)
                .map(|result| format!("{}{}", format_decimal(result.quantity, 1), result.name)),
        )
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR)
}

/// Badge generator bound to one caller's settings.
///
/// Holds the settings of a single session (one user, one page). Reads never
/// modify it; only [`BadgeTextGenerator::update_settings`] does.
#[derive(Debug, Clone, Default)]
pub struct BadgeTextGenerator {
    settings: ConversionSettings,
}

impl BadgeTextGenerator {
    /// Creates a generator that renders with `settings`.
    pub fn new(settings: ConversionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Applies a partial settings change.
    ///
    /// A wage replaces the stored one only when it is a positive amount; an
    /// item list replaces the stored list wholesale only when non-empty.
    pub fn update_settings(&mut self, update: SettingsUpdate) {
        if let Some(wage) = update.hourly_wage.filter(|w| w.is_finite() && *w > 0.0) {
            debug!(hourly_wage = wage, "updating hourly wage");
            self.settings.hourly_wage = wage;
        }
        if let Some(items) = update.daily_items.filter(|items| !items.is_empty()) {
            debug!(count = items.len(), "replacing daily items");
            self.settings.daily_items = items;
        }
    }

    pub fn calculate_hours(&self, price: Option<f64>) -> f64 {
        calculate_hours(price, self.settings.hourly_wage)
    }

    /// Converts `price` using the stored item list.
    pub fn calculate_items(&self, price: Option<f64>) -> Vec<ItemConversionResult> {
        calculate_items(price, &self.settings.daily_items)
    }

    pub fn generate_badge_text(&self, price: Option<f64>) -> String {
        render_badge(price, &self.settings)
    }

    pub fn generate_detail_text(&self, price: Option<f64>) -> String {
        generate_detail_text(price, &self.settings)
    }
}
