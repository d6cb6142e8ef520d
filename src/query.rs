// 🔎 Query Engine - filters and sorts over the catalog
//
// Every operation takes a slice and returns a fresh Vec; the catalog
// itself is never reordered or mutated. All sorts are stable.

use crate::error::SessionError;
use crate::model::{parse_amount, Car, INPUT_DATE_FORMAT};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::{Ordering, Reverse};

// ============================================================================
// FILTERS
// ============================================================================

/// Brand matches (case-insensitive) and at least one price >= `min_price`
pub fn filter_by_brand_and_min_price(cars: &[Car], brand: &str, min_price: Decimal) -> Vec<Car> {
    cars.iter()
        .filter(|car| car.brand_matches(brand))
        .filter(|car| car.prices.values().any(|p| *p >= min_price))
        .cloned()
        .collect()
}

/// Brand matches (case-insensitive) and release date equals `date`.
///
/// `date` is typed by the user as `yyyy,dd,MM`; anything else is
/// `InvalidDateInput` and no result set is produced.
pub fn filter_by_brand_and_date(
    cars: &[Car],
    brand: &str,
    date: &str,
) -> Result<Vec<Car>, SessionError> {
    let date = parse_input_date(date)?;

    Ok(cars
        .iter()
        .filter(|car| car.brand_matches(brand))
        .filter(|car| car.release_date == Some(date))
        .cloned()
        .collect())
}

/// Parse a prompt date (`2023,31,01` -> 2023-01-31)
pub fn parse_input_date(input: &str) -> Result<NaiveDate, SessionError> {
    NaiveDate::parse_from_str(input.trim(), INPUT_DATE_FORMAT)
        .map_err(|_| SessionError::InvalidDateInput(input.to_string()))
}

/// Parse a prompt price, exact decimal
pub fn parse_min_price(input: &str) -> Result<Decimal, SessionError> {
    parse_amount(input).ok_or_else(|| SessionError::InvalidPriceInput(input.to_string()))
}

// ============================================================================
// SORTS
// ============================================================================

/// Latest release date first. Cars without a date go last.
pub fn sort_by_release_date_descending(cars: &[Car]) -> Vec<Car> {
    let mut sorted = cars.to_vec();
    sorted.sort_by(|a, b| descending_none_last(a.release_date, b.release_date));
    sorted
}

/// Highest price in any currency first. Cars without prices go last.
pub fn sort_by_max_price_descending(cars: &[Car]) -> Vec<Car> {
    let mut sorted = cars.to_vec();
    sorted.sort_by(|a, b| descending_none_last(a.max_price(), b.max_price()));
    sorted
}

/// Highest price in the type's own currency first (SUV/EUR, Sedan/JPY, Truck/USD).
pub fn sort_by_type_specific_currency(cars: &[Car]) -> Vec<Car> {
    let mut sorted = cars.to_vec();
    sorted.sort_by_key(|car| Reverse(type_specific_price(car)));
    sorted
}

/// Currency a car type is compared in
pub fn preferred_currency(car_type: &str) -> Option<&'static str> {
    match car_type {
        "SUV" => Some("EUR"),
        "Sedan" => Some("JPY"),
        "Truck" => Some("USD"),
        _ => None,
    }
}

/// Price in the type's preferred currency; zero for other types or a missing price
pub fn type_specific_price(car: &Car) -> Decimal {
    car.car_type
        .as_deref()
        .and_then(preferred_currency)
        .map(|currency| car.price_or_zero(currency))
        .unwrap_or(Decimal::ZERO)
}

/// Descending on present values; `None` after every `Some`
fn descending_none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ============================================================================
// TESTS
// ============================================================================
