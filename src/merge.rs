// ⚖️ Positional Merge - brand rows onto cars by index
//
//   brand row i  ->  car i        (for i < min(cars, rows))
//
// The two sources carry no shared key, only row order. Lengths that
// disagree are tolerated: extra brand rows are dropped, extra cars keep
// brand/release date unset. The report says which happened.

use crate::model::Car;
use crate::parser::BrandRow;
use log::warn;
use serde::{Deserialize, Serialize};

// ============================================================================
// MERGE OUTCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeOutcome {
    /// Same number of cars and brand rows
    Aligned,

    /// More cars than brand rows - trailing cars have no brand/date
    MissingBrands { unset_cars: Vec<usize> },

    /// More brand rows than cars - trailing rows were dropped
    ExtraBrands { dropped_lines: Vec<usize> },
}

impl MergeOutcome {
    pub fn is_aligned(&self) -> bool {
        matches!(self, MergeOutcome::Aligned)
    }
}

// ============================================================================
// MERGE REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeReport {
    pub car_count: usize,
    pub brand_row_count: usize,
    pub merged_count: usize,
    pub outcome: MergeOutcome,
}

impl MergeReport {
    pub fn is_aligned(&self) -> bool {
        self.outcome.is_aligned()
    }

    pub fn summary(&self) -> String {
        match &self.outcome {
            MergeOutcome::Aligned => format!(
                "Merged {} cars with {} brand rows",
                self.car_count, self.brand_row_count
            ),
            MergeOutcome::MissingBrands { unset_cars } => format!(
                "Merged {} of {} cars: {} cars have no brand row",
                self.merged_count,
                self.car_count,
                unset_cars.len()
            ),
            MergeOutcome::ExtraBrands { dropped_lines } => format!(
                "Merged {} cars: {} brand rows beyond the catalog were dropped",
                self.merged_count,
                dropped_lines.len()
            ),
        }
    }
}

// ============================================================================
// INDEX-ALIGNED JOIN
// ============================================================================

/// Assign brand and release date from `rows[i]` to `cars[i]`.
///
/// Never fails: a length mismatch is logged at `warn` and recorded in the report.
pub fn align_brands(cars: &mut [Car], rows: &[BrandRow]) -> MergeReport {
    let merged_count = cars.len().min(rows.len());

    for (car, row) in cars.iter_mut().zip(rows) {
        car.brand = Some(row.brand.clone());
        car.release_date = Some(row.release_date);
    }

    let outcome = if cars.len() > rows.len() {
        MergeOutcome::MissingBrands {
            unset_cars: (merged_count..cars.len()).collect(),
        }
    } else if rows.len() > cars.len() {
        MergeOutcome::ExtraBrands {
            dropped_lines: rows[merged_count..].iter().map(|r| r.line_number).collect(),
        }
    } else {
        MergeOutcome::Aligned
    };

    let report = MergeReport {
        car_count: cars.len(),
        brand_row_count: rows.len(),
        merged_count,
        outcome,
    };

    if !report.is_aligned() {
        warn!("Catalog length mismatch: {}", report.summary());
    }

    report
}

// ============================================================================
// TESTS
// ============================================================================
