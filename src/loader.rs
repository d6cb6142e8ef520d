// 📂 Catalog Loader - both sources -> one merged car list
//
// Order matters: the markup source decides how many cars exist, the
// brand source is only read when that list is non-empty.

use crate::error::CatalogError;
use crate::merge::{align_brands, MergeReport};
use crate::model::Car;
use crate::parser::{
    detect_source, BrandCatalogParser, BrandRow, SourceKind, SourceParser, TypeCatalogParser,
};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Cars for one session plus how the merge went
#[derive(Debug, Clone)]
pub struct Catalog {
    pub cars: Vec<Car>,
    /// `None` when the type catalog was empty and the brand source was never read
    pub merge: Option<MergeReport>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}

pub struct CatalogLoader {
    type_path: PathBuf,
    brand_path: PathBuf,
    strict: bool,
}

impl CatalogLoader {
    pub fn new(type_path: impl Into<PathBuf>, brand_path: impl Into<PathBuf>) -> Self {
        CatalogLoader {
            type_path: type_path.into(),
            brand_path: brand_path.into(),
            strict: false,
        }
    }

    /// Strict mode: a length mismatch between the sources is fatal
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Read, parse and merge both files
    pub fn load(&self) -> Result<Catalog, CatalogError> {
        let type_parser = TypeCatalogParser::new();
        let brand_parser = BrandCatalogParser::new();
        check_kind(&self.type_path, type_parser.source_kind())?;
        check_kind(&self.brand_path, brand_parser.source_kind())?;

        info!("Loading type catalog from {}", self.type_path.display());
        let cars = type_parser.parse(&self.type_path)?;

        self.assemble(cars, || {
            info!("Loading brand catalog from {}", self.brand_path.display());
            brand_parser.parse(&self.brand_path)
        })
    }

    /// Same pipeline over already-read contents
    pub fn load_from_str(&self, type_xml: &str, brand_csv: &str) -> Result<Catalog, CatalogError> {
        let cars = TypeCatalogParser::new().parse_str(type_xml, "type catalog")?;
        self.assemble(cars, || {
            BrandCatalogParser::new().parse_str(brand_csv, "brand catalog")
        })
    }

    fn assemble<F>(&self, mut cars: Vec<Car>, read_brands: F) -> Result<Catalog, CatalogError>
    where
        F: FnOnce() -> Result<Vec<BrandRow>, CatalogError>,
    {
        if cars.is_empty() {
            debug!("Type catalog is empty, brand catalog not read");
            return Ok(Catalog { cars, merge: None });
        }

        let rows = read_brands()?;
        let report = align_brands(&mut cars, &rows);

        if self.strict && !report.is_aligned() {
            return Err(CatalogError::LengthMismatch {
                cars: report.car_count,
                brands: report.brand_row_count,
            });
        }

        info!("{}", report.summary());

        Ok(Catalog {
            cars,
            merge: Some(report),
        })
    }
}

fn check_kind(path: &Path, expected: SourceKind) -> Result<(), CatalogError> {
    match detect_source(path) {
        Some(kind) if kind == expected => Ok(()),
        _ => Err(CatalogError::WrongSource {
            path: path.display().to_string(),
            expected: expected.name(),
            extension: expected.extension(),
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================
