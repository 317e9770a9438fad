// src/sheet.rs
//
// Spreadsheet hand-off between the two pipelines. The harvester writes the
// raw variants file, the checker reads it back and writes the augmented one.
// Write side: rust_xlsxwriter. Read side: calamine, matching columns by
// header name so column order doesn't matter.

use std::{
    error::Error,
    fs,
    path::Path,
};

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;

use crate::data::{CheckedRow, VariantRow};

pub const RAW_HEADERS: [&str; 4] = [
    "variant_name",
    "variant_sku",
    "variant_price_usd",
    "variant_public_title",
];

pub const CHECKED_HEADERS: [&str; 7] = [
    "variant_name",
    "variant_sku",
    "variant_price_usd",
    "variant_public_title",
    "search_url",
    "product_page_url",
    "stock_status",
];

fn ensure_parent(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write the harvested rows, overwriting any prior file.
pub fn write_variants(path: &Path, rows: &[VariantRow]) -> Result<(), Box<dyn Error>> {
    ensure_parent(path)?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in RAW_HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        write_variant_cells(sheet, r, row)?;
    }

    workbook.save(path)?;
    Ok(())
}

/// Write the checked rows, overwriting any prior file.
pub fn write_checked(path: &Path, rows: &[CheckedRow]) -> Result<(), Box<dyn Error>> {
    ensure_parent(path)?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in CHECKED_HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        write_variant_cells(sheet, r, &row.variant)?;
        if let Some(v) = &row.search_url {
            sheet.write_string(r, 4, v)?;
        }
        if let Some(v) = &row.product_page_url {
            sheet.write_string(r, 5, v)?;
        }
        sheet.write_string(r, 6, row.status.as_str())?;
    }

    workbook.save(path)?;
    Ok(())
}

fn write_variant_cells(
    sheet: &mut rust_xlsxwriter::Worksheet,
    r: u32,
    row: &VariantRow,
) -> Result<(), Box<dyn Error>> {
    if let Some(v) = &row.name {
        sheet.write_string(r, 0, v)?;
    }
    if let Some(v) = &row.sku {
        sheet.write_string(r, 1, v)?;
    }
    if let Some(v) = row.price_usd {
        sheet.write_number(r, 2, v)?;
    }
    if let Some(v) = &row.public_title {
        sheet.write_string(r, 3, v)?;
    }
    Ok(())
}

/// Read the harvested rows back. Fails if the file or any expected column is
/// missing; callers check existence first for a friendlier message.
pub fn read_variants(path: &Path) -> Result<Vec<VariantRow>, Box<dyn Error>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or("workbook has no worksheets")??;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .ok_or("missing header row")?
        .iter()
        .map(cell_to_string)
        .collect();

    let col = |name: &str| -> Result<usize, Box<dyn Error>> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| format!("missing column: {name}").into())
    };
    let c_name = col(RAW_HEADERS[0])?;
    let c_sku = col(RAW_HEADERS[1])?;
    let c_price = col(RAW_HEADERS[2])?;
    let c_title = col(RAW_HEADERS[3])?;

    let mut out = Vec::new();
    for row in rows_iter {
        out.push(VariantRow {
            name: text_cell(row, c_name),
            sku: text_cell(row, c_sku),
            price_usd: row.get(c_price).and_then(number_cell),
            public_title: text_cell(row, c_title),
        });
    }
    Ok(out)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => s!(),
    }
}

fn text_cell(row: &[Data], col: usize) -> Option<String> {
    let text = row.get(col).map(cell_to_string)?;
    if text.is_empty() { None } else { Some(text) }
}

fn number_cell(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StockStatus;

    fn sample_rows() -> Vec<VariantRow> {
        vec![
            VariantRow {
                name: Some(s!("Folding Cane - Black")),
                sku: Some(s!("FC-B")),
                price_usd: Some(19.99),
                public_title: Some(s!("Black")),
            },
            VariantRow {
                name: Some(s!("Shower Chair")),
                sku: None,
                price_usd: Some(45.0),
                public_title: None,
            },
        ]
    }

    #[test]
    fn variants_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.xlsx");

        write_variants(&path, &sample_rows()).unwrap();
        let back = read_variants(&path).unwrap();

        assert_eq!(back, sample_rows());
    }

    #[test]
    fn write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/raw.xlsx");
        write_variants(&path, &sample_rows()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn read_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_variants(&dir.path().join("nope.xlsx")).is_err());
    }

    #[test]
    fn checked_file_carries_status_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checked.xlsx");

        let rows = vec![CheckedRow {
            variant: sample_rows().remove(0),
            search_url: Some(s!("https://carex.com/pages/search-results-page?q=FC-B")),
            product_page_url: None,
            status: StockStatus::OutOfStock,
        }];
        write_checked(&path, &rows).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let cells: Vec<Vec<String>> = range
            .rows()
            .map(|r| r.iter().map(cell_to_string).collect())
            .collect();

        assert_eq!(cells[0], CHECKED_HEADERS);
        assert_eq!(cells[1][1], "FC-B");
        assert_eq!(cells[1][6], "Out of Stock");
        // No product URL resolved → empty cell
        assert_eq!(cells[1][5], "");
    }
}
