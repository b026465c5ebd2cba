use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use super::date::DEFAULT_DATE_FORMAT;
use super::FileDescription;
use crate::error::{ImportError, Result};
use crate::models::Row;
use crate::reader::{matches_entry, read_csv_first_row, read_csv_header, read_csv_table, CsvOptions};
use crate::text::{
    basename, compile_filename_pattern, extract_date_from_filename, match_filepath_date,
    match_filepath_extension, match_filepath_pattern,
};

/// What a statement file of one bank account looks like.
#[derive(Debug, Clone)]
pub struct FileSpec {
    pub extension: String,
    /// Matched against the basename; must have a `date` group.
    pub pattern: Regex,
    pub date_format: String,
    pub header: Vec<String>,
    /// Column/value pairs the first data row must contain.
    pub entry_mapping: Option<Vec<(String, String)>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FileSpec {
    pub fn new(extension: &str, pattern: &str, header: &[&str]) -> Result<Self> {
        Ok(Self {
            extension: extension.to_string(),
            pattern: compile_filename_pattern(pattern)?,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            entry_mapping: None,
            start_date: None,
            end_date: None,
        })
    }

    pub fn date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    pub fn entry_mapping(mut self, pairs: &[(&str, &str)]) -> Self {
        self.entry_mapping = Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Cheap checks on the path first; the file is only opened once the name
    /// looks right.
    fn identify(
        &self,
        filepath: &Path,
        read_header: impl FnOnce() -> Result<Vec<String>>,
        read_first_row: impl FnOnce() -> Result<Option<Row>>,
    ) -> Result<bool> {
        if filepath.as_os_str().is_empty() {
            return Err(ImportError::EmptyPath);
        }
        let name = basename(filepath);

        if !match_filepath_extension(filepath, &self.extension)? {
            debug!(file = %name, extension = %self.extension, "extension mismatch");
            return Ok(false);
        }
        if !match_filepath_pattern(filepath, &self.pattern)? {
            debug!(file = %name, pattern = %self.pattern, "filename pattern mismatch");
            return Ok(false);
        }
        if !match_filepath_date(
            filepath,
            &self.pattern,
            &self.date_format,
            self.start_date,
            self.end_date,
        )? {
            debug!(file = %name, "filename date outside configured range");
            return Ok(false);
        }

        let header = read_header()?;
        if header != self.header {
            debug!(file = %name, found = ?header, "header mismatch");
            return Ok(false);
        }

        if let Some(mapping) = &self.entry_mapping {
            let matched = read_first_row()?.is_some_and(|row| matches_entry(&row, mapping));
            if !matched {
                debug!(file = %name, "first row does not match entry mapping");
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn date(&self, filepath: &Path) -> Result<NaiveDate> {
        extract_date_from_filename(filepath, &self.pattern, &self.date_format)
    }
}

/// Basename with spaces swapped for underscores, for archived file names.
fn archive_name(filepath: &Path) -> String {
    basename(filepath).replace(' ', "_")
}

#[derive(Debug, Clone)]
pub struct FileDescriptionCsv {
    pub spec: FileSpec,
    pub options: CsvOptions,
}

impl FileDescriptionCsv {
    pub fn new(spec: FileSpec) -> Self {
        Self {
            spec,
            options: CsvOptions::default(),
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.options.delimiter = delimiter;
        self
    }

    pub fn skip_rows(mut self, header_rows: usize, footer_rows: usize) -> Self {
        self.options.header_rows = header_rows;
        self.options.footer_rows = footer_rows;
        self
    }
}

impl FileDescription for FileDescriptionCsv {
    fn identify(&self, filepath: &Path) -> Result<bool> {
        self.spec.identify(
            filepath,
            || read_csv_header(filepath, &self.options),
            || read_csv_first_row(filepath, &self.options),
        )
    }

    fn date(&self, filepath: &Path) -> Result<NaiveDate> {
        self.spec.date(filepath)
    }

    fn name(&self, filepath: &Path) -> String {
        archive_name(filepath)
    }

    fn read(&self, filepath: &Path) -> Result<Vec<Row>> {
        read_csv_table(filepath, &self.options)
    }
}

#[cfg(feature = "xlsx")]
pub use xlsx::FileDescriptionXlsx;

#[cfg(feature = "xlsx")]
mod xlsx {
    use std::path::Path;

    use chrono::NaiveDate;

    use super::{archive_name, FileSpec};
    use crate::descriptors::FileDescription;
    use crate::error::Result;
    use crate::models::Row;
    use crate::reader::{read_xlsx_first_row, read_xlsx_header, read_xlsx_table, XlsxOptions};

    #[derive(Debug, Clone)]
    pub struct FileDescriptionXlsx {
        pub spec: FileSpec,
        pub options: XlsxOptions,
    }

    impl FileDescriptionXlsx {
        pub fn new(spec: FileSpec) -> Self {
            Self {
                spec,
                options: XlsxOptions::default(),
            }
        }

        pub fn sheet(mut self, sheet: usize) -> Self {
            self.options.sheet = sheet;
            self
        }

        pub fn skip_rows(mut self, header_rows: usize, footer_rows: usize) -> Self {
            self.options.header_rows = header_rows;
            self.options.footer_rows = footer_rows;
            self
        }

        pub fn cell_date_format(mut self, format: &str) -> Self {
            self.options.date_format = format.to_string();
            self
        }
    }

    impl FileDescription for FileDescriptionXlsx {
        fn identify(&self, filepath: &Path) -> Result<bool> {
            self.spec.identify(
                filepath,
                || read_xlsx_header(filepath, &self.options),
                || read_xlsx_first_row(filepath, &self.options),
            )
        }

        fn date(&self, filepath: &Path) -> Result<NaiveDate> {
            self.spec.date(filepath)
        }

        fn name(&self, filepath: &Path) -> String {
            archive_name(filepath)
        }

        fn read(&self, filepath: &Path) -> Result<Vec<Row>> {
            read_xlsx_table(filepath, &self.options)
        }
    }
}
