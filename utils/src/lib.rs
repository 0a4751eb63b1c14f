//! Shared numeric helpers for the grindmeter workspace.

/// Rounds `value` to `decimals` places, halves away from zero.
///
/// Scales by a power of ten and divides back so that results such as
/// `2.7` come out as the nearest `f64` rather than `2.7000000000000002`.
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Rounds a positive ratio to one decimal place and floors it at `0.1`.
///
/// Any strictly positive input therefore never shows up as `0.0`. Returns
/// `None` when the value, or its scaled form during rounding, is not finite.
pub fn round_positive_tenth(value: f64) -> Option<f64> {
    let rounded = round_to_decimals(value, 1);
    rounded.is_finite().then(|| rounded.max(0.1))
}

/// Formats a value with a fixed number of decimal places.
pub fn format_decimal(value: f64, decimals: u32) -> String {
    format!("{:.prec$}", value, prec = decimals as usize)
}

/// Inserts `,` between every group of three digits, e.g. `1234567` -> `1,234,567`.
///
/// Works on the digit string so amounts beyond `u64` keep every digit.
pub fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
