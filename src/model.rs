// 🚗 Record Model
// One merged vehicle: type/model/prices from the markup source,
// brand/release date from the delimited-text source.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Layout used wherever a date is shown: `06/15/2023`
pub const DISPLAY_DATE_FORMAT: &str = "%m/%d/%Y";

/// Layout of dates typed at the prompt and stored in brand files: `2023,15,06`
pub const INPUT_DATE_FORMAT: &str = "%Y,%d,%m";

/// Human-readable form of [`INPUT_DATE_FORMAT`], shown in prompts
pub const INPUT_DATE_HINT: &str = "yyyy,dd,MM";

/// Plain decimal amount: optional sign, digits, optional fraction.
///
/// Anything else (digit separators, exponents, blanks) is rejected, as is a
/// value that would lose digits when stored.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let text = text.trim();
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return None;
    }

    Decimal::from_str_exact(text).ok()
}

/// Currency code -> amount. Keys are unique; iteration follows code order.
pub type Prices = BTreeMap<String, Decimal>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    // Assigned by the positional merge (may stay unset when the brand file is short)
    pub brand: Option<String>,
    pub release_date: Option<NaiveDate>,

    // Assigned by the markup parser
    #[serde(rename = "type")]
    pub car_type: Option<String>,
    pub model: Option<String>,
    pub prices: Prices,
}

impl Car {
    pub fn new(car_type: Option<String>, model: Option<String>, prices: Prices) -> Self {
        Car {
            brand: None,
            release_date: None,
            car_type,
            model,
            prices,
        }
    }

    /// Builder pattern: set brand
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Builder pattern: set release date
    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    /// Builder pattern: add or overwrite one price
    pub fn with_price(mut self, currency: impl Into<String>, amount: Decimal) -> Self {
        self.prices.insert(currency.into(), amount);
        self
    }

    /// Case-insensitive brand comparison. A car without a brand never matches.
    pub fn brand_matches(&self, brand: &str) -> bool {
        self.brand
            .as_deref()
            .map(|b| b.to_lowercase() == brand.to_lowercase())
            .unwrap_or(false)
    }

    /// Highest amount across all currencies
    pub fn max_price(&self) -> Option<Decimal> {
        self.prices.values().copied().max()
    }

    /// Price in one currency, zero when that currency is absent
    pub fn price_or_zero(&self, currency: &str) -> Decimal {
        self.prices.get(currency).copied().unwrap_or(Decimal::ZERO)
    }

    /// Release date as `MM/DD/YYYY`
    pub fn display_date(&self) -> Option<String> {
        self.release_date
            .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample_car() -> Car {
        Car::new(Some("SUV".to_string()), Some("X3".to_string()), Prices::new())
            .with_brand("BMW")
            .with_release_date(NaiveDate::from_ymd_opt(2023, 6, 15).unwrap())
            .with_price("EUR", dec("50000"))
            .with_price("USD", dec("55000"))
    }

    #[test]
    fn test_brand_matches_ignores_case() {
        let car = sample_car();
        assert!(car.brand_matches("bmw"));
        assert!(car.brand_matches("BMW"));
        assert!(!car.brand_matches("Audi"));
    }

    #[test]
    fn test_missing_brand_never_matches() {
        let car = Car::default();
        assert!(!car.brand_matches(""));
    }

    #[test]
    fn test_max_price() {
        assert_eq!(sample_car().max_price(), Some(dec("55000")));
        assert_eq!(Car::default().max_price(), None);
    }

    #[test]
    fn test_price_or_zero() {
        let car = sample_car();
        assert_eq!(car.price_or_zero("EUR"), dec("50000"));
        assert_eq!(car.price_or_zero("JPY"), Decimal::ZERO);
    }

    #[test]
    fn test_display_date() {
        assert_eq!(sample_car().display_date().as_deref(), Some("06/15/2023"));
        assert_eq!(Car::default().display_date(), None);
    }

    #[test]
    fn test_input_date_format() {
        let date = NaiveDate::parse_from_str("2023,31,01", INPUT_DATE_FORMAT).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 1, 31).unwrap());
    }

    #[test]
    fn test_parse_amount_accepts_plain_decimals() {
        assert_eq!(parse_amount("50000"), Some(dec("50000")));
        assert_eq!(parse_amount(" 25999.99 "), Some(dec("25999.99")));
        assert_eq!(parse_amount("-12.5"), Some(dec("-12.5")));
        assert_eq!(parse_amount("10.50").map(|d| d.to_string()), Some("10.50".to_string()));
    }

    #[test]
    fn test_parse_amount_rejects_non_numeric() {
        for text in ["", "-", ".", "lots", "1_000", "1e5", "1,000", "1.2.3", "+-1", "12 34"] {
            assert_eq!(parse_amount(text), None, "accepted {text:?}");
        }
    }

    #[test]
    fn test_parse_amount_rejects_lost_precision() {
        assert_eq!(parse_amount("0.123456789012345678901234567891"), None);
        assert_eq!(parse_amount("99999999999999999999999999999999"), None);
    }

    #[test]
    fn test_serializes_type_field() {
        let json = serde_json::to_value(sample_car()).unwrap();
        assert_eq!(json["type"], "SUV");
        assert_eq!(json["releaseDate"], "2023-06-15");
    }
}
