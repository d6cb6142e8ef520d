// Car Catalog - Core Library
// Exposes the load -> query -> present pipeline for the CLI and tests

pub mod error;
pub mod model;
pub mod parser;
pub mod merge;
pub mod data_quality;
pub mod loader;
pub mod query;
pub mod presenter;
pub mod menu;

// Re-export commonly used types
pub use error::{CatalogError, SessionError};
pub use model::{Car, Prices, DISPLAY_DATE_FORMAT, INPUT_DATE_FORMAT};
pub use parser::{
    BrandCatalogParser, BrandRow, SourceKind, SourceParser, TypeCatalogParser,
    detect_source,
};
pub use merge::{align_brands, MergeOutcome, MergeReport};
pub use data_quality::{
    BatchSummary, DataQualityEngine, QualityReport, Severity, ValidationResult,
};
pub use loader::{Catalog, CatalogLoader};
pub use query::{
    filter_by_brand_and_date, filter_by_brand_and_min_price, sort_by_max_price_descending,
    sort_by_release_date_descending, sort_by_type_specific_currency,
};
pub use presenter::{render_json, render_table, render_xml, OutputFormat};
pub use menu::{run_session, MenuState, Session};
