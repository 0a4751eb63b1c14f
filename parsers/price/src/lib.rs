mod parser;
mod types;

pub use parser::{
    best_price, confidence, format_price, is_discount_price, may_contain_price, parse,
    parse_first, MAX_PRICE, MIN_PRICE,
};
pub use types::PriceElement;
