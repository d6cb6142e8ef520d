// 🖨️ Presenter - table, XML and JSON renderings of a car list
//
// Pure: each renderer returns the full text, the caller writes it.
// Missing values print as `null` (JSON: a real null).

use crate::model::Car;

const TABLE_BORDER: &str = "+-----------------+------------+------------+------------+--------------------------------------------------------------+";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Xml,
    Json,
}

impl OutputFormat {
    pub fn render(&self, cars: &[Car]) -> String {
        match self {
            OutputFormat::Table => render_table(cars),
            OutputFormat::Xml => render_xml(cars),
            OutputFormat::Json => render_json(cars),
        }
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// Fixed-width report: border, header, border, one row per car, border
pub fn render_table(cars: &[Car]) -> String {
    let mut out = String::new();

    out.push_str(TABLE_BORDER);
    out.push('\n');
    push_table_row(&mut out, "Brand", "Type", "Model", "Date", "Price");
    out.push_str(TABLE_BORDER);
    out.push('\n');

    for car in cars {
        let prices = car
            .prices
            .iter()
            .map(|(currency, amount)| format!("{currency}: {amount}"))
            .collect::<Vec<_>>()
            .join(", ");

        push_table_row(
            &mut out,
            or_null(car.brand.as_deref()),
            or_null(car.car_type.as_deref()),
            or_null(car.model.as_deref()),
            car.display_date().as_deref().unwrap_or("null"),
            &prices,
        );
    }

    out.push_str(TABLE_BORDER);
    out.push('\n');
    out
}

fn push_table_row(out: &mut String, brand: &str, car_type: &str, model: &str, date: &str, price: &str) {
    // Columns pad but never truncate
    out.push_str(&format!(
        "| {brand:<15} | {car_type:<10} | {model:<10} | {date:<10} | {price:<60} |\n"
    ));
}

// ============================================================================
// XML
// ============================================================================

pub fn render_xml(cars: &[Car]) -> String {
    let mut out = String::from("<cars>\n");

    for car in cars {
        let date = car.display_date();

        out.push_str("  <car>\n");
        push_xml_element(&mut out, "brand", car.brand.as_deref());
        push_xml_element(&mut out, "type", car.car_type.as_deref());
        push_xml_element(&mut out, "model", car.model.as_deref());
        push_xml_element(&mut out, "releaseDate", date.as_deref());
        out.push_str("    <prices>\n");
        for (currency, amount) in &car.prices {
            out.push_str(&format!(
                "      <price currency=\"{}\">{}</price>\n",
                escape_xml(currency),
                amount
            ));
        }
        out.push_str("    </prices>\n");
        out.push_str("  </car>\n");
    }

    out.push_str("</cars>\n");
    out
}

fn push_xml_element(out: &mut String, tag: &str, value: Option<&str>) {
    out.push_str(&format!("    <{tag}>{}</{tag}>\n", escape_xml(or_null(value))));
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// JSON
// ============================================================================

/// Array of objects, two-space indent, no trailing commas.
///
/// Prices are bare numbers so they keep their decimal scale.
pub fn render_json(cars: &[Car]) -> String {
    let mut out = String::from("[\n");

    for (i, car) in cars.iter().enumerate() {
        let date = car.display_date();

        out.push_str("  {\n");
        out.push_str(&format!("    \"brand\": {},\n", json_string(car.brand.as_deref())));
        out.push_str(&format!("    \"type\": {},\n", json_string(car.car_type.as_deref())));
        out.push_str(&format!("    \"model\": {},\n", json_string(car.model.as_deref())));
        out.push_str(&format!("    \"releaseDate\": {},\n", json_string(date.as_deref())));
        out.push_str("    \"prices\": {\n");

        let entries: Vec<String> = car
            .prices
            .iter()
            .map(|(currency, amount)| format!("      {}: {}", json_string(Some(currency)), amount))
            .collect();
        if !entries.is_empty() {
            out.push_str(&entries.join(",\n"));
            out.push('\n');
        }

        out.push_str("    }\n");
        out.push_str("  }");
        if i + 1 < cars.len() {
            out.push(',');
        }
        out.push('\n');
    }

    out.push_str("]\n");
    out
}

fn json_string(value: Option<&str>) -> String {
    match value {
        Some(v) => serde_json::Value::from(v).to_string(),
        None => "null".to_string(),
    }
}

fn or_null(value: Option<&str>) -> &str {
    value.unwrap_or("null")
}

// ============================================================================
// TESTS
// ============================================================================
