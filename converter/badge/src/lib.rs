//! Labor-time badge conversion.
//!
//! Turns a price into the hours of work it costs at a reference hourly wage
//! and into quantities of everyday items, then renders both as a short badge
//! string such as `2.7 小時 · 4.2 咖啡 · 7.7 珍奶`.

mod badge;
pub mod config;
mod types;

pub use badge::{
    calculate_hours, calculate_items, format_hours_clock, format_hours_text, format_items_text,
    generate_badge_text, generate_detail_text, BadgeTextGenerator, HOURS_UNIT, SEGMENT_SEPARATOR,
};
pub use config::{ConversionSettings, DailyItem, HoursFormat, SettingsUpdate};
pub use types::ItemConversionResult;
