//! Locates the quotes table inside the fetched page and pulls out raw rows.
//!
//! The page carries several tables; the right one is identified by a stable
//! class on its `<tbody>`. Headers live in the enclosing table's `<thead>`;
//! when the markup drops it, a configured fixed header list takes over.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::ExtractionError;

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Class attribute that identifies the quotes `<tbody>`.
    pub table_marker: String,
    /// Rows with fewer cells than this are rejected, never padded.
    pub min_columns: usize,
    /// Header used when the page carries no `<thead>`.
    pub fallback_header: Vec<String>,
}

/// Pulls the header and the raw cell text of every usable body row.
pub fn extract(
    html: &str,
    opts: &ExtractOptions,
) -> Result<(Vec<String>, Vec<Vec<String>>), ExtractionError> {
    let document = Html::parse_document(html);

    let not_found = || ExtractionError::TableNotFound {
        marker: opts.table_marker.clone(),
    };
    let tbody_selector =
        Selector::parse(&format!("tbody.{}", opts.table_marker)).map_err(|_| not_found())?;
    let tbody = document.select(&tbody_selector).next().ok_or_else(not_found)?;

    let header = match enclosing_table_headers(tbody) {
        Some(header) => header,
        None => {
            debug!("page carries no <thead>, using the configured fallback header");
            opts.fallback_header.clone()
        }
    };

    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    let mut rows = Vec::new();
    for (index, tr) in tbody.select(&row_selector).enumerate() {
        let cells: Vec<String> = tr
            .select(&cell_selector)
            .map(|td| td.text().collect::<String>().trim().to_string())
            .collect();
        if cells.is_empty() {
            continue;
        }
        if cells.len() < opts.min_columns {
            warn!(
                row = index,
                cells = cells.len(),
                required = opts.min_columns,
                "rejecting underfilled table row"
            );
            continue;
        }
        rows.push(cells);
    }

    if rows.is_empty() {
        return Err(ExtractionError::EmptyTable);
    }
    Ok((header, rows))
}

/// Walks up to the `<table>` wrapping the body and reads its `<thead>` cells.
fn enclosing_table_headers(tbody: ElementRef) -> Option<Vec<String>> {
    let th_selector = Selector::parse("thead th").unwrap();
    let table = tbody
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")?;
    let header: Vec<String> = table
        .select(&th_selector)
        .map(|th| th.text().collect::<String>().trim().to_string())
        .collect();
    (!header.is_empty()).then_some(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ExtractOptions {
        ExtractOptions {
            table_marker: "datatable-v2_body__8TXQk".into(),
            min_columns: 2,
            fallback_header: vec!["Nome".into(), "Último".into(), "Var. %".into()],
        }
    }

    #[test]
    fn extracts_headers_and_rows() {
        let html = r#"
            <table>
              <thead><tr><th> Nome </th><th>Último</th><th>Var. %</th></tr></thead>
              <tbody class="datatable-v2_body__8TXQk">
                <tr><td>Bovespa</td><td>137.481,90</td><td>-0,45%</td></tr>
                <tr><td>Nasdaq</td><td>21.713,14</td><td>1,88%</td></tr>
              </tbody>
            </table>"#;
        let (header, rows) = extract(html, &options()).unwrap();
        assert_eq!(header, vec!["Nome", "Último", "Var. %"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["Bovespa", "137.481,90", "-0,45%"]);
    }

    #[test]
    fn ignores_other_tables_on_the_page() {
        let html = r#"
            <table><tbody class="other"><tr><td>x</td><td>y</td></tr></tbody></table>
            <table>
              <tbody class="datatable-v2_body__8TXQk">
                <tr><td>Dólar</td><td>5,43</td></tr>
              </tbody>
            </table>"#;
        let (header, rows) = extract(html, &options()).unwrap();
        // No thead anywhere near the marked body: fallback header applies.
        assert_eq!(header, options().fallback_header);
        assert_eq!(rows, vec![vec!["Dólar".to_string(), "5,43".to_string()]]);
    }

    #[test]
    fn missing_marker_is_table_not_found() {
        let html = "<html><body><p>layout changed</p></body></html>";
        let err = extract(html, &options()).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::TableNotFound {
                marker: "datatable-v2_body__8TXQk".into()
            }
        );
    }

    #[test]
    fn marker_with_no_rows_is_empty_table() {
        let html = r#"<table><tbody class="datatable-v2_body__8TXQk"></tbody></table>"#;
        assert_eq!(extract(html, &options()).unwrap_err(), ExtractionError::EmptyTable);
    }

    #[test]
    fn underfilled_rows_are_rejected_not_padded() {
        let html = r#"
            <table>
              <tbody class="datatable-v2_body__8TXQk">
                <tr><td>só uma célula</td></tr>
                <tr><td>Euro</td><td>6,12</td></tr>
              </tbody>
            </table>"#;
        let (_, rows) = extract(html, &options()).unwrap();
        assert_eq!(rows, vec![vec!["Euro".to_string(), "6,12".to_string()]]);
    }
}
