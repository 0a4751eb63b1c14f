//! badge-text: print the labor-time badge for a price.
//!
//! Usage: badge-text <price-or-text> [settings.json]
//!
//! The first argument may be a plain number or page text such as "NT$1,299".
//! Settings use the JSON layout stored by the browser extension; missing keys
//! take their defaults. Set `RUST_LOG=debug` to see conversion details.

use anyhow::{anyhow, Context, Result};
use badge::{format_hours_text, BadgeTextGenerator, ConversionSettings};
use price::{format_price, parse as parse_price};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn load_settings(path: Option<&str>) -> Result<ConversionSettings> {
    let Some(path) = path else {
        return Ok(ConversionSettings::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path))?;
    ConversionSettings::from_json(&json)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <price-or-text> [settings.json]",
            args.first().map(|s| s.as_str()).unwrap_or("badge-text")
        );
        std::process::exit(1);
    }

    let input = args[1].trim();
    let price = parse_price(input).ok_or_else(|| anyhow!("No price found in {:?}", input))?;
    let settings = load_settings(args.get(2).map(|s| s.as_str()))?;
    info!(price, hourly_wage = settings.hourly_wage, "converting price");

    let generator = BadgeTextGenerator::new(settings);

    println!(
        "{} = {}",
        format_price(Some(price)),
        format_hours_text(generator.calculate_hours(Some(price)))
    );
    for item in generator.calculate_items(Some(price)) {
        println!("= {:.1} {}", item.quantity, item.name);
    }
    println!("Badge: {}", generator.generate_badge_text(Some(price)));
    println!("Detail: {}", generator.generate_detail_text(Some(price)));

    Ok(())
}
