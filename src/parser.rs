// 🏗️ Source Parsers
// One parser per input source: the markup type catalog and the delimited brand list

use crate::error::CatalogError;
use crate::model::{parse_amount, Car, Prices, DISPLAY_DATE_FORMAT, INPUT_DATE_FORMAT};
use chrono::NaiveDate;
use log::debug;
use roxmltree::{Document, Node};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// CORE TYPES
// ============================================================================

/// SourceKind - which of the two inputs a file is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// Markup file: type, model and prices per car
    TypeCatalog,
    /// Delimited-text file: brand and release date per car
    BrandCatalog,
}

impl SourceKind {
    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::TypeCatalog => "type catalog (XML)",
            SourceKind::BrandCatalog => "brand catalog (CSV)",
        }
    }

    /// Expected file extension
    pub fn extension(&self) -> &'static str {
        match self {
            SourceKind::TypeCatalog => "xml",
            SourceKind::BrandCatalog => "csv",
        }
    }
}

/// BrandRow - one accepted row of the delimited-text source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandRow {
    pub brand: String,
    pub release_date: NaiveDate,
    pub line_number: usize,
}

// ============================================================================
// PARSER TRAIT
// ============================================================================

/// SourceParser - turns the full text of one source into rows
///
/// `parse_str` is the core; `parse` only adds the "read all bytes" step.
pub trait SourceParser {
    type Row;

    /// Parse already-loaded content. `source_name` is used in error messages.
    fn parse_str(&self, content: &str, source_name: &str) -> Result<Vec<Self::Row>, CatalogError>;

    /// Which source this parser handles
    fn source_kind(&self) -> SourceKind;

    /// Read a whole file and parse it
    fn parse(&self, file_path: &Path) -> Result<Vec<Self::Row>, CatalogError> {
        let content = fs::read_to_string(file_path).map_err(|source| CatalogError::Io {
            path: file_path.display().to_string(),
            source,
        })?;

        let filename = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");

        self.parse_str(&content, filename)
    }
}

/// Detect source kind from the file extension
///
/// ```
/// use car_catalog::parser::{detect_source, SourceKind};
/// use std::path::Path;
///
/// assert_eq!(detect_source(Path::new("carsType.xml")), Some(SourceKind::TypeCatalog));
/// assert_eq!(detect_source(Path::new("CarsBrand.CSV")), Some(SourceKind::BrandCatalog));
/// assert_eq!(detect_source(Path::new("cars.json")), None);
/// ```
pub fn detect_source(file_path: &Path) -> Option<SourceKind> {
    let extension = file_path
        .extension()
        .and_then(|e| e.to_str())?
        .to_lowercase();

    match extension.as_str() {
        "xml" => Some(SourceKind::TypeCatalog),
        "csv" => Some(SourceKind::BrandCatalog),
        _ => None,
    }
}

// ============================================================================
// TYPE CATALOG (XML)
// ============================================================================

/// Parses `<cars><car>...</car></cars>` into cars with type, model and prices.
///
/// Expected shape per car:
/// ```xml
/// <car>
///   <type>SUV</type>
///   <model>X3</model>
///   <price currency="EUR">50000</price>
///   <prices>
///     <price currency="USD">55000</price>
///   </prices>
/// </car>
/// ```
pub struct TypeCatalogParser;

impl TypeCatalogParser {
    pub fn new() -> Self {
        TypeCatalogParser
    }

    fn parse_car(&self, car: Node, number: usize) -> Result<Car, CatalogError> {
        let car_type = first_text(car, "type");
        let model = first_text(car, "model");

        let mut prices = Prices::new();

        // Main price: required
        let main = main_price_element(car).ok_or(CatalogError::MissingElement {
            car: number,
            element: "price",
        })?;
        let (currency, amount) = read_price(main, number)?;
        prices.insert(currency, amount);

        // Additional prices: optional container, later duplicates overwrite
        if let Some(container) = car.descendants().find(|n| n.has_tag_name("prices")) {
            for price in container.children().filter(|n| n.is_element()) {
                let (currency, amount) = read_price(price, number)?;
                prices.insert(currency, amount);
            }
        }

        Ok(Car::new(car_type, model, prices))
    }
}

impl Default for TypeCatalogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for TypeCatalogParser {
    type Row = Car;

    fn parse_str(&self, content: &str, source_name: &str) -> Result<Vec<Car>, CatalogError> {
        let document = Document::parse(content).map_err(|e| CatalogError::Xml {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

        document
            .descendants()
            .filter(|n| n.has_tag_name("car"))
            .enumerate()
            .map(|(i, car)| self.parse_car(car, i + 1))
            .collect()
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::TypeCatalog
    }
}

/// Text of the first descendant named `tag`. Absent is tolerated.
fn first_text(parent: Node, tag: &str) -> Option<String> {
    parent
        .descendants()
        .find(|n| n.has_tag_name(tag))
        .map(text_content)
}

/// All text beneath a node, concatenated
fn text_content(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// First `<price>` of a car that does not sit inside its `<prices>` container
fn main_price_element<'a, 'input>(car: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    car.descendants().find(|n| {
        n.has_tag_name("price")
            && !n
                .ancestors()
                .take_while(|a| *a != car)
                .any(|a| a.has_tag_name("prices"))
    })
}

fn read_price(element: Node, car: usize) -> Result<(String, Decimal), CatalogError> {
    let currency = element
        .attribute("currency")
        .ok_or(CatalogError::MissingCurrency { car })?
        .to_string();

    let raw = text_content(element);
    let amount = parse_amount(&raw).ok_or_else(|| CatalogError::InvalidPrice {
        car,
        currency: currency.clone(),
        value: raw.clone(),
    })?;

    Ok((currency, amount))
}

// ============================================================================
// BRAND CATALOG (CSV)
// ============================================================================

/// Parses the delimited brand list. Header line is skipped.
///
/// Quotes are stripped before splitting on `,`, so both of these are one row:
/// ```text
/// "BMW","2023,15,06"    -> BMW, 2023-06-15 (yyyy,dd,MM)
/// "BMW","06/15/2023"    -> BMW, 2023-06-15 (MM/dd/yyyy)
/// ```
/// Rows of any other shape are skipped and do not consume an index.
pub struct BrandCatalogParser;

impl BrandCatalogParser {
    pub fn new() -> Self {
        BrandCatalogParser
    }

    /// Split already quote-stripped fields into (brand, date text)
    fn split_row(fields: &[&str]) -> Option<(String, String)> {
        match fields {
            [brand, date] => Some((brand.trim().to_string(), date.trim().to_string())),
            [brand, year, day, month] => Some((
                brand.trim().to_string(),
                format!("{},{},{}", year.trim(), day.trim(), month.trim()),
            )),
            _ => None,
        }
    }

    fn parse_date(text: &str, line: usize) -> Result<NaiveDate, CatalogError> {
        let format = if text.contains(',') {
            INPUT_DATE_FORMAT
        } else {
            DISPLAY_DATE_FORMAT
        };

        NaiveDate::parse_from_str(text, format).map_err(|_| CatalogError::InvalidDate {
            line,
            value: text.to_string(),
        })
    }
}

impl Default for BrandCatalogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for BrandCatalogParser {
    type Row = BrandRow;

    fn parse_str(&self, content: &str, source_name: &str) -> Result<Vec<BrandRow>, CatalogError> {
        use csv::ReaderBuilder;

        // Quoting off: quote characters are stripped by hand, commas inside
        // quotes still split (the date carries its own commas)
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();

        for (line_num, result) in reader.records().enumerate() {
            let fallback_line = line_num + 2; // 1-indexed + header row
            let record = result.map_err(|e| CatalogError::Csv {
                line: fallback_line,
                message: e.to_string(),
            })?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(fallback_line);

            let stripped: Vec<String> = record.iter().map(|f| f.replace('"', "")).collect();
            let fields: Vec<&str> = stripped.iter().map(String::as_str).collect();

            let Some((brand, date_text)) = Self::split_row(&fields) else {
                debug!(
                    "{}: skipping line {} ({} fields)",
                    source_name,
                    line,
                    fields.len()
                );
                continue;
            };

            let release_date = Self::parse_date(&date_text, line)?;

            rows.push(BrandRow {
                brand,
                release_date,
                line_number: line,
            });
        }

        Ok(rows)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::BrandCatalog
    }
}

// ============================================================================
// TESTS
// ============================================================================
