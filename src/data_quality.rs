// ✅ Data Quality Engine - post-load checks on merged cars
//
// Loading is best-effort (missing type/model are tolerated, a short brand
// file leaves cars unset). These checks surface what was tolerated.

use crate::model::Car;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub rule_name: String,
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationResult {
    pub fn pass(rule_name: &str, field: &str, message: &str) -> Self {
        ValidationResult {
            passed: true,
            rule_name: rule_name.to_string(),
            field: field.to_string(),
            message: message.to_string(),
            severity: Severity::Info,
        }
    }

    pub fn fail(rule_name: &str, field: &str, message: &str, severity: Severity) -> Self {
        ValidationResult {
            passed: false,
            rule_name: rule_name.to_string(),
            field: field.to_string(),
            message: message.to_string(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Record cannot be rendered or sorted meaningfully
    Warning,  // Record is incomplete
    Info,     // Record is valid but unusual
}

// ============================================================================
// QUALITY REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Position of the car in the catalog
    pub index: usize,
    pub validations: Vec<ValidationResult>,
    pub passed_count: usize,
    pub failed_count: usize,
}

impl QualityReport {
    pub fn issues(&self) -> impl Iterator<Item = &ValidationResult> {
        self.validations.iter().filter(|v| !v.passed)
    }

    pub fn is_clean(&self) -> bool {
        self.failed_count == 0
    }

    pub fn has_critical_issues(&self) -> bool {
        self.issues().any(|v| v.severity == Severity::Critical)
    }

    pub fn summary(&self) -> String {
        format!(
            "car #{}: {}/{} checks passed",
            self.index + 1,
            self.passed_count,
            self.validations.len()
        )
    }
}

// ============================================================================
// DATA QUALITY ENGINE
// ============================================================================

pub struct DataQualityEngine {
    /// Types that have a preferred sort currency
    known_types: Vec<String>,
}

impl DataQualityEngine {
    pub fn new() -> Self {
        DataQualityEngine {
            known_types: vec!["SUV".to_string(), "Sedan".to_string(), "Truck".to_string()],
        }
    }

    /// Validate one car
    pub fn validate(&self, index: usize, car: &Car) -> QualityReport {
        let validations = vec![
            self.validate_text("brand", car.brand.as_deref()),
            self.validate_release_date(car),
            self.validate_type(car.car_type.as_deref()),
            self.validate_text("model", car.model.as_deref()),
            self.validate_prices_present(car),
            self.validate_currency_codes(car),
            self.validate_amounts(car),
        ];

        let passed_count = validations.iter().filter(|v| v.passed).count();
        let failed_count = validations.len() - passed_count;

        QualityReport {
            index,
            validations,
            passed_count,
            failed_count,
        }
    }

    /// Batch validate a whole catalog
    pub fn validate_batch(&self, cars: &[Car]) -> Vec<QualityReport> {
        cars.iter()
            .enumerate()
            .map(|(i, car)| self.validate(i, car))
            .collect()
    }

    /// Generate summary statistics for batch validation
    pub fn batch_summary(&self, reports: &[QualityReport]) -> BatchSummary {
        BatchSummary {
            total_cars: reports.len(),
            clean_count: reports.iter().filter(|r| r.is_clean()).count(),
            with_issues_count: reports.iter().filter(|r| !r.is_clean()).count(),
            critical_count: reports.iter().filter(|r| r.has_critical_issues()).count(),
        }
    }

    // ========================================================================
    // VALIDATION RULES
    // ========================================================================

    fn validate_text(&self, field: &str, value: Option<&str>) -> ValidationResult {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => {
                ValidationResult::pass(&format!("{field}_present"), field, "Present")
            }
            _ => ValidationResult::fail(
                &format!("{field}_missing"),
                field,
                &format!("No {field}"),
                Severity::Warning,
            ),
        }
    }

    fn validate_release_date(&self, car: &Car) -> ValidationResult {
        if car.release_date.is_some() {
            ValidationResult::pass("release_date_present", "release_date", "Present")
        } else {
            ValidationResult::fail(
                "release_date_missing",
                "release_date",
                "No release date (no matching brand row)",
                Severity::Warning,
            )
        }
    }

    fn validate_type(&self, car_type: Option<&str>) -> ValidationResult {
        let Some(car_type) = car_type.map(str::trim).filter(|t| !t.is_empty()) else {
            return ValidationResult::fail("type_missing", "type", "No type", Severity::Warning);
        };

        if self.known_types.iter().any(|t| t == car_type) {
            ValidationResult::pass("type_known", "type", "Known type")
        } else {
            ValidationResult::fail(
                "type_unknown",
                "type",
                &format!("Type {car_type:?} has no preferred currency, sorts as zero"),
                Severity::Info,
            )
        }
    }

    fn validate_prices_present(&self, car: &Car) -> ValidationResult {
        if car.prices.is_empty() {
            ValidationResult::fail(
                "prices_empty",
                "prices",
                "No prices at all",
                Severity::Critical,
            )
        } else {
            ValidationResult::pass("prices_present", "prices", "At least one price")
        }
    }

    fn validate_currency_codes(&self, car: &Car) -> ValidationResult {
        let bad: Vec<&str> = car
            .prices
            .keys()
            .map(String::as_str)
            .filter(|code| !(code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())))
            .collect();

        if bad.is_empty() {
            ValidationResult::pass("currency_codes_valid", "prices", "ISO 4217 style codes")
        } else {
            ValidationResult::fail(
                "currency_codes_invalid",
                "prices",
                &format!("Unusual currency codes: {}", bad.join(", ")),
                Severity::Warning,
            )
        }
    }

    fn validate_amounts(&self, car: &Car) -> ValidationResult {
        if car.prices.values().any(|p| *p < Decimal::ZERO) {
            ValidationResult::fail(
                "amount_negative",
                "prices",
                "Negative price",
                Severity::Warning,
            )
        } else {
            ValidationResult::pass("amounts_valid", "prices", "Non-negative prices")
        }
    }
}

impl Default for DataQualityEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// BATCH SUMMARY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_cars: usize,
    pub clean_count: usize,
    pub with_issues_count: usize,
    pub critical_count: usize,
}

impl BatchSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} cars: {} clean, {} with issues, {} critical",
            self.total_cars, self.clean_count, self.with_issues_count, self.critical_count
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Prices;
    use chrono::NaiveDate;

    fn create_valid_car() -> Car {
        Car::new(Some("SUV".to_string()), Some("X3".to_string()), Prices::new())
            .with_brand("BMW")
            .with_release_date(NaiveDate::from_ymd_opt(2023, 6, 15).unwrap())
            .with_price("EUR", Decimal::new(50000, 0))
    }

    #[test]
    fn test_validate_perfect_car() {
        let engine = DataQualityEngine::new();
        let report = engine.validate(0, &create_valid_car());

        assert!(report.is_clean());
        assert_eq!(report.failed_count, 0);
        assert!(!report.has_critical_issues());
    }

    #[test]
    fn test_validate_unmerged_car() {
        let engine = DataQualityEngine::new();
        let mut car = create_valid_car();
        car.brand = None;
        car.release_date = None;

        let report = engine.validate(4, &car);

        assert_eq!(report.failed_count, 2);
        let fields: Vec<&str> = report.issues().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["brand", "release_date"]);
        assert!(report.summary().starts_with("car #5"));
    }

    #[test]
    fn test_validate_unknown_type_is_info() {
        let engine = DataQualityEngine::new();
        let mut car = create_valid_car();
        car.car_type = Some("Coupe".to_string());

        let report = engine.validate(0, &car);
        let issue = report.issues().next().unwrap();

        assert_eq!(issue.rule_name, "type_unknown");
        assert_eq!(issue.severity, Severity::Info);
    }

    #[test]
    fn test_validate_empty_prices_is_critical() {
        let engine = DataQualityEngine::new();
        let mut car = create_valid_car();
        car.prices.clear();

        assert!(engine.validate(0, &car).has_critical_issues());
    }

    #[test]
    fn test_validate_odd_currency_and_negative_amount() {
        let engine = DataQualityEngine::new();
        let car = create_valid_car()
            .with_price("usd", Decimal::new(-1, 0));

        let report = engine.validate(0, &car);
        let rules: Vec<&str> = report.issues().map(|v| v.rule_name.as_str()).collect();

        assert_eq!(rules, vec!["currency_codes_invalid", "amount_negative"]);
    }

    #[test]
    fn test_batch_summary() {
        let engine = DataQualityEngine::new();
        let mut broken = create_valid_car();
        broken.prices.clear();
        let cars = vec![create_valid_car(), broken, Car::default()];

        let reports = engine.validate_batch(&cars);
        let summary = engine.batch_summary(&reports);

        assert_eq!(summary.total_cars, 3);
        assert_eq!(summary.clean_count, 1);
        assert_eq!(summary.with_issues_count, 2);
        assert_eq!(summary.critical_count, 2);
        assert_eq!(summary.summary(), "3 cars: 1 clean, 2 with issues, 2 critical");
    }
}
