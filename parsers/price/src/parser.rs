//! Price extraction from page text.
//!
//! Shop pages show prices in many shapes (`NT$1,299`, `$ 45.60`, `1,299元`,
//! a bare `1299` inside markup). These helpers pull out a plausible price and
//! score candidate elements so the most likely one wins.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;
use utils::group_thousands;

use crate::types::PriceElement;

/// Smallest amount accepted as a price.
pub const MIN_PRICE: f64 = 1.0;
/// Largest amount accepted as a price.
pub const MAX_PRICE: f64 = 1_000_000.0;

/// A price below 95% of the original counts as discounted.
const DISCOUNT_RATIO: f64 = 0.95;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Tried in order; the first that yields an in-range amount wins.
static PRICE_PATTERNS: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)NT\$\s*([0-9,]+(?:\.[0-9]+)?)").unwrap(),
        Regex::new(r"\$\s*([0-9,]+(?:\.[0-9]+)?)").unwrap(),
        Regex::new(r"([0-9,]+(?:\.[0-9]+)?)\s*元").unwrap(),
        Regex::new(r"([0-9,]+(?:\.[0-9]+)?)").unwrap(),
    ]
});

static PRICE_INDICATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)NT\$|\$|元|[0-9,]+|price|cost|fee").unwrap());

const POSITIVE_KEYWORDS: [&str; 10] = [
    "price", "cost", "amount", "fee", "total", "價格", "金額", "費用", "總計", "售價",
];
const NEGATIVE_KEYWORDS: [&str; 9] = [
    "shipping", "tax", "discount", "save", "運費", "稅", "折扣", "節省", "原價",
];
const PRICE_TAGS: [&str; 4] = ["span", "div", "strong", "b"];

/// Extracts a price from free text, possibly containing HTML.
///
/// # Returns
/// The amount rounded to a whole number, or `None` when no pattern yields an
/// amount between [`MIN_PRICE`] and [`MAX_PRICE`].
pub fn parse(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }

    let clean = HTML_TAG.replace_all(text, "");

    for pattern in PRICE_PATTERNS.iter() {
        let Some(captures) = pattern.captures(&clean) else {
            continue;
        };
        let digits = captures[1].replace(',', "");
        match digits.parse::<f64>() {
            Ok(price) if (MIN_PRICE..=MAX_PRICE).contains(&price) => {
                trace!(text, price, "parsed price");
                return Some(price.round());
            }
            _ => continue,
        }
    }

    None
}

/// Parses the first source that holds a price.
pub fn parse_first<'a>(sources: impl IntoIterator<Item = &'a str>) -> Option<f64> {
    sources
        .into_iter()
        .filter(|source| !source.is_empty())
        .find_map(parse)
}

/// Whether `current` is at least 5% below `original`.
pub fn is_discount_price(current: Option<f64>, original: Option<f64>) -> bool {
    match (current, original) {
        (Some(current), Some(original)) if current != 0.0 && original != 0.0 => {
            current < original * DISCOUNT_RATIO
        }
        _ => false,
    }
}

/// Formats a price as `NT$ 1,234`. Missing, zero and NaN amounts render as `NT$ 0`.
pub fn format_price(price: Option<f64>) -> String {
    let price = match price {
        Some(price) if price.is_finite() && price != 0.0 => price,
        _ => return "NT$ 0".to_string(),
    };

    let sign = if price < 0.0 { "-" } else { "" };
    let fixed = format!("{:.3}", price.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let whole = group_thousands(whole);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        format!("NT$ {}{}", sign, whole)
    } else {
        format!("NT$ {}{}.{}", sign, whole, fraction)
    }
}

/// Cheap pre-check before running [`parse`] on a piece of text.
pub fn may_contain_price(text: &str) -> bool {
    PRICE_INDICATOR.is_match(text)
}

/// Scores how likely `element` is to be the main price on the page, 0 to 100.
pub fn confidence(element: &PriceElement) -> u8 {
    let class_name = element.class_name.to_lowercase();
    let id = element.id.to_lowercase();
    let text = element.text.to_lowercase();

    let mut score: i32 = 50;

    for keyword in POSITIVE_KEYWORDS {
        if class_name.contains(keyword) || id.contains(keyword) {
            score += 20;
        }
        if text.contains(keyword) {
            score += 10;
        }
    }

    for keyword in NEGATIVE_KEYWORDS {
        if class_name.contains(keyword) || id.contains(keyword) {
            score -= 30;
        }
        if text.contains(keyword) {
            score -= 15;
        }
    }

    if PRICE_TAGS.contains(&element.tag_name.to_lowercase().as_str()) {
        score += 5;
    }

    // larger type usually means the headline price
    if element.font_size.is_some_and(|size| size > 16.0) {
        score += 10;
    }

    score.clamp(0, 100) as u8
}

/// Picks the price of the highest scoring element that holds one.
///
/// Among equally scored elements the earliest wins.
pub fn best_price<'a>(elements: impl IntoIterator<Item = &'a PriceElement>) -> Option<f64> {
    let mut best: Option<(u8, f64)> = None;

    for element in elements {
        let Some(price) = parse_first(element.sources()) else {
            continue;
        };
        let score = confidence(element);
        trace!(price, score, "price candidate");
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, price));
        }
    }

    best.map(|(_, price)| price)
}
