//! Coercions from scraped price and date text into numbers.
//!
//! Scraped text is always kept for display; these helpers run only when a
//! chart or export needs a numeric value.

use chrono::NaiveDate;

const EOK: &str = "억";
const MAN_WON: &str = "만원";

/// Convert a transaction price such as `"12억"` or `"9억 8,000"` into a
/// count of 만원.
///
/// This is a digit substitution, not arithmetic: `억` becomes `0000`,
/// separators are dropped and whatever digits remain are read as one number.
/// `"3억 5,000"` therefore yields `300005000`.
pub fn price_to_num(text: &str) -> Option<u64> {
    let digits: String = text
        .replace(EOK, "0000")
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok()
}

/// Parse a region price like `"7,200만원"` into 7200.
///
/// Text without the `만원` unit is not a region price and yields `None`.
pub fn region_price_man_won(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() || !text.contains(MAN_WON) {
        return None;
    }
    text.replace(MAN_WON, "")
        .replace(',', "")
        .trim()
        .parse::<i64>()
        .ok()
}

/// Parse a contract date with a two digit year (`"24.03.15"`).
///
/// Years are always read as 20xx.
pub fn parse_contract_date(text: &str) -> Option<NaiveDate> {
    let full = format!("20{}", text.trim());
    NaiveDate::parse_from_str(&full, "%Y.%m.%d").ok()
}
