use std::path::Path;

use crate::error::Result;
use crate::models::Row;

// ---------------------------------------------------------------------------
// Shared table shaping
// ---------------------------------------------------------------------------

/// Turn raw records into keyed rows. The first record is the header; short
/// records are padded with empty cells and surplus cells are dropped.
fn to_rows(mut records: Vec<Vec<String>>, footer_rows: usize) -> Vec<Row> {
    if records.is_empty() {
        return Vec::new();
    }
    let header = records.remove(0);
    let keep = records.len().saturating_sub(footer_rows);
    records
        .into_iter()
        .take(keep)
        .map(|record| {
            header
                .iter()
                .enumerate()
                .map(|(i, key)| (key.clone(), record.get(i).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}

/// True when every configured column holds exactly the configured value.
pub fn matches_entry(row: &Row, mapping: &[(String, String)]) -> bool {
    mapping
        .iter()
        .all(|(key, value)| row.get(key) == Some(value.as_str()))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Lines above the header row.
    pub header_rows: usize,
    /// Lines below the last transaction.
    pub footer_rows: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            header_rows: 0,
            footer_rows: 0,
        }
    }
}

fn read_csv_records(filepath: &Path, options: &CsvOptions) -> Result<Vec<Vec<String>>> {
    let file = std::fs::File::open(filepath)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(std::io::BufReader::new(file));
    let mut records = Vec::new();
    for result in rdr.records().skip(options.header_rows) {
        let record = result?;
        records.push(record.iter().map(str::to_string).collect());
    }
    Ok(records)
}

pub fn read_csv_header(filepath: &Path, options: &CsvOptions) -> Result<Vec<String>> {
    Ok(read_csv_records(filepath, options)?
        .into_iter()
        .next()
        .unwrap_or_default())
}

pub fn read_csv_table(filepath: &Path, options: &CsvOptions) -> Result<Vec<Row>> {
    Ok(to_rows(read_csv_records(filepath, options)?, options.footer_rows))
}

pub fn read_csv_first_row(filepath: &Path, options: &CsvOptions) -> Result<Option<Row>> {
    Ok(read_csv_table(filepath, options)?.into_iter().next())
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

#[cfg(feature = "xlsx")]
pub use xlsx::*;

#[cfg(feature = "xlsx")]
mod xlsx {
    use std::path::Path;

    use calamine::{Data, Reader};
    use chrono::NaiveDate;

    use super::to_rows;
    use crate::error::{ImportError, Result};
    use crate::models::Row;
    use crate::descriptors::date::DEFAULT_DATE_FORMAT;
    use crate::text::convert_number_to_decimal;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct XlsxOptions {
        /// Zero-based worksheet index.
        pub sheet: usize,
        pub header_rows: usize,
        pub footer_rows: usize,
        /// How date-typed cells are rendered before the row descriptors see
        /// them.
        pub date_format: String,
    }

    impl Default for XlsxOptions {
        fn default() -> Self {
            Self {
                sheet: 0,
                header_rows: 0,
                footer_rows: 0,
                date_format: DEFAULT_DATE_FORMAT.to_string(),
            }
        }
    }

    pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
        // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
        let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
        base.checked_add_signed(chrono::Duration::days(serial.floor() as i64))
    }

    fn cell_to_string(cell: &Data, date_format: &str) -> Result<String> {
        Ok(match cell {
            Data::String(s) => s.clone(),
            Data::Float(f) => convert_number_to_decimal(*f)?.to_string(),
            Data::Int(i) => i.to_string(),
            Data::Bool(b) => b.to_string(),
            Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
                Some(date) => date.format(date_format).to_string(),
                None => dt.as_f64().to_string(),
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
            _ => String::new(),
        })
    }

    fn read_xlsx_records(filepath: &Path, options: &XlsxOptions) -> Result<Vec<Vec<String>>> {
        let mut workbook = calamine::open_workbook_auto(filepath)?;
        let range = workbook
            .worksheet_range_at(options.sheet)
            .ok_or(ImportError::MissingSheet(options.sheet))??;
        range
            .rows()
            .skip(options.header_rows)
            .map(|row| {
                row.iter()
                    .map(|cell| cell_to_string(cell, &options.date_format))
                    .collect::<Result<Vec<String>>>()
            })
            .collect()
    }

    pub fn read_xlsx_header(filepath: &Path, options: &XlsxOptions) -> Result<Vec<String>> {
        Ok(read_xlsx_records(filepath, options)?
            .into_iter()
            .next()
            .unwrap_or_default())
    }

    pub fn read_xlsx_table(filepath: &Path, options: &XlsxOptions) -> Result<Vec<Row>> {
        Ok(to_rows(read_xlsx_records(filepath, options)?, options.footer_rows))
    }

    pub fn read_xlsx_first_row(filepath: &Path, options: &XlsxOptions) -> Result<Option<Row>> {
        Ok(read_xlsx_table(filepath, options)?.into_iter().next())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::text::convert_text_to_decimal;

        #[test]
        fn test_excel_serial_to_date() {
            assert_eq!(
                excel_serial_to_date(45667.0),
                NaiveDate::from_ymd_opt(2025, 1, 10)
            );
            assert_eq!(
                excel_serial_to_date(45667.75),
                NaiveDate::from_ymd_opt(2025, 1, 10)
            );
        }

        #[test]
        fn test_cell_rendering() {
            assert_eq!(cell_to_string(&Data::Float(12.345), "%Y").unwrap(), "12.34");
            assert_eq!(cell_to_string(&Data::Int(7), "%Y").unwrap(), "7");
            assert_eq!(cell_to_string(&Data::Empty, "%Y").unwrap(), "");
            assert_eq!(
                cell_to_string(&Data::String("EUR".into()), "%Y").unwrap(),
                "EUR"
            );
        }

        fn write_statement(path: &Path) {
            use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

            let date_format = Format::new().set_num_format("dd-mm-yyyy");
            let mut workbook = Workbook::new();
            let sheet = workbook.add_worksheet();
            sheet.write_string(0, 0, "Statement export").unwrap();
            for (col, name) in ["Datum", "Bedrag", "Munt"].into_iter().enumerate() {
                sheet.write_string(1, col as u16, name).unwrap();
            }
            for (row, (day, amount)) in [(1, -12.5), (2, 1234.567)].into_iter().enumerate() {
                let row = row as u32 + 2;
                let date = ExcelDateTime::from_ymd(2024, 9, day).unwrap();
                sheet.write_datetime_with_format(row, 0, &date, &date_format).unwrap();
                sheet.write_number(row, 1, amount).unwrap();
                sheet.write_string(row, 2, "EUR").unwrap();
            }
            sheet.write_string(4, 0, "Totaal").unwrap();
            sheet.write_number(4, 1, 1222.07).unwrap();
            workbook.save(path).unwrap();
        }

        #[test]
        fn test_workbook_with_title_and_total_rows() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("stmt.xlsx");
            write_statement(&path);
            let options = XlsxOptions {
                header_rows: 1,
                footer_rows: 1,
                date_format: "%d-%m-%Y".to_string(),
                ..XlsxOptions::default()
            };

            assert_eq!(read_xlsx_header(&path, &options).unwrap(), vec!["Datum", "Bedrag", "Munt"]);
            let rows = read_xlsx_table(&path, &options).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].get("Datum"), Some("01-09-2024"));
            assert_eq!(
                convert_text_to_decimal(rows[0].get("Bedrag").unwrap()).unwrap(),
                rust_decimal_macros::dec!(-12.5)
            );
            assert_eq!(rows[1].get("Datum"), Some("02-09-2024"));
            assert_eq!(rows[1].get("Bedrag"), Some("1234.57"));
            assert_eq!(rows[1].get("Munt"), Some("EUR"));

            let first = read_xlsx_first_row(&path, &options).unwrap().unwrap();
            assert_eq!(first, rows[0]);
        }

        #[test]
        fn test_workbook_without_skipping_sees_title_as_header() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("stmt.xlsx");
            write_statement(&path);
            let header = read_xlsx_header(&path, &XlsxOptions::default()).unwrap();
            assert_eq!(header[0], "Statement export");
            // Default rendering of date cells is ISO.
            let rows = read_xlsx_table(&path, &XlsxOptions::default()).unwrap();
            assert_eq!(rows.len(), 4);
            assert_eq!(rows[1].get("Statement export"), Some("2024-09-01"));
        }

        #[test]
        fn test_missing_file_is_an_error() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nope.xlsx");
            assert!(read_xlsx_table(&path, &XlsxOptions::default()).is_err());
        }
    }
}
