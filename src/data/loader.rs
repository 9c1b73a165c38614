//! Upload Loader Module
//! Turns an uploaded file (name + bytes) into a Polars DataFrame.
//! The format is chosen from the file extension only.

use calamine::{Data, Range, Reader};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Invalid file format. Please upload a CSV or Excel file. ({name})")]
    UnsupportedFormat { name: String },
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to load spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Spreadsheet contains no worksheet")]
    EmptyWorkbook,
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// File formats accepted by the uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Excel,
}

impl FileFormat {
    /// Extensions offered by the file dialog.
    pub const EXTENSIONS: [&'static str; 3] = ["csv", "xls", "xlsx"];

    /// Pick the format from the file name suffix (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name.ends_with(".csv") {
            Some(FileFormat::Csv)
        } else if name.ends_with(".xls") || name.ends_with(".xlsx") {
            Some(FileFormat::Excel)
        } else {
            None
        }
    }
}

/// A file handed over by the file dialog or a drag-and-drop.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> Result<Self, LoaderError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }
}

/// Reader settings.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            infer_schema_length: 10000,
        }
    }
}

/// Parse an uploaded file into a DataFrame.
pub fn load_upload(file: &UploadedFile, options: LoadOptions) -> Result<DataFrame, LoaderError> {
    match FileFormat::from_name(&file.name) {
        Some(FileFormat::Csv) => load_csv_bytes(&file.bytes, options),
        Some(FileFormat::Excel) => load_excel_bytes(&file.bytes),
        None => Err(LoaderError::UnsupportedFormat {
            name: file.name.clone(),
        }),
    }
}

/// Markers read as missing, on top of empty fields.
const NA_MARKERS: [&str; 12] = [
    "NA", "N/A", "n/a", "#N/A", "NaN", "nan", "-NaN", "NULL", "null", "None", "<NA>", "#NA",
];

fn load_csv_bytes(bytes: &[u8], options: LoadOptions) -> Result<DataFrame, LoaderError> {
    let null_values = NullValues::AllColumns(NA_MARKERS.iter().map(|m| (*m).into()).collect());
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(options.infer_schema_length))
        .with_parse_options(CsvParseOptions::default().with_null_values(Some(null_values)))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()?;
    Ok(df)
}

fn load_excel_bytes(bytes: &[u8]) -> Result<DataFrame, LoaderError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoaderError::EmptyWorkbook)??;
    range_to_dataframe(&range)
}

/// Convert a worksheet range into a DataFrame. The first row holds the headers.
pub fn range_to_dataframe(range: &Range<Data>) -> Result<DataFrame, LoaderError> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let body: Vec<&[Data]> = rows.collect();

    let names = header_names(header);
    let columns = names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(idx).unwrap_or(&Data::Empty))
                .collect();
            sheet_column(name, &cells)
        })
        .collect::<Vec<_>>();

    Ok(DataFrame::new(columns)?)
}

/// Header cells as unique column names (blank → `Unnamed: i`, repeats → `name.n`).
fn header_names(header: &[Data]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                Data::Empty => format!("Unnamed: {idx}"),
                other => other.to_string(),
            };
            let mut name = base.clone();
            while used.contains(&name) {
                let suffix = suffixes.entry(base.clone()).or_insert(0);
                *suffix += 1;
                name = format!("{base}.{suffix}");
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

/// Whole number that converts to i64 without saturating.
fn fits_i64(f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

/// Type a spreadsheet column from its non-empty cells.
fn sheet_column(name: String, cells: &[&Data]) -> Column {
    let filled = || cells.iter().filter(|c| !matches!(c, Data::Empty));

    let all_numeric = filled().all(|c| matches!(c, Data::Int(_) | Data::Float(_)));
    let all_integral = filled().all(|c| match c {
        Data::Int(_) => true,
        Data::Float(f) => fits_i64(*f),
        _ => false,
    });
    let all_bool = filled().all(|c| matches!(c, Data::Bool(_)));
    let any_filled = filled().next().is_some();

    if any_filled && all_integral {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(i) => Some(*i),
                Data::Float(f) => Some(*f as i64),
                _ => None,
            })
            .collect();
        Column::new(name.into(), values)
    } else if any_filled && all_numeric {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(i) => Some(*i as f64),
                Data::Float(f) => Some(*f),
                _ => None,
            })
            .collect();
        Column::new(name.into(), values)
    } else if any_filled && all_bool {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        Column::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|c| match c {
                Data::Empty => None,
                other => Some(other.to_string()),
            })
            .collect();
        Column::new(name.into(), values)
    }
}

/// Holds the dataset of the currently opened file.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_name: Option<String>,
    options: LoadOptions,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(LoadOptions::default())
    }
}

impl DataLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            df: None,
            file_name: None,
            options,
        }
    }

    /// Load an uploaded file. On error any previous dataset is dropped.
    pub fn load(&mut self, file: &UploadedFile) -> Result<&DataFrame, LoaderError> {
        self.file_name = Some(file.name.clone());
        self.df = None;

        let df = load_upload(file, self.options)?;
        log::info!(
            "Loaded {}: {} rows, {} columns",
            file.name,
            df.height(),
            df.width()
        );
        Ok(&*self.df.insert(df))
    }

    /// Read a file from disk and load it. A read error also drops the
    /// previous dataset.
    pub fn load_path(&mut self, path: &Path) -> Result<&DataFrame, LoaderError> {
        self.file_name = path.file_name().map(|n| n.to_string_lossy().to_string());
        self.df = None;

        let file = UploadedFile::from_path(path)?;
        self.load(&file)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    pub fn get_file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "name,age,city\nalice,30,Paris\nbob,,Berlin\ncarol,41,\n";

    #[test]
    fn csv_keeps_row_and_column_counts() {
        let file = UploadedFile::new("people.csv", SAMPLE_CSV);
        let df = load_upload(&file, LoadOptions::default()).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 3);
        assert_eq!(df.column("age").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("age").unwrap().null_count(), 1);
        assert_eq!(df.column("city").unwrap().null_count(), 1);
    }

    #[test]
    fn na_markers_read_as_missing() {
        let file = UploadedFile::new("m.csv", "x,y\n1,NA\nNaN,b\n3,c\n");
        let df = load_upload(&file, LoadOptions::default()).unwrap();

        assert_eq!(df.column("x").unwrap().null_count(), 1);
        assert_eq!(df.column("y").unwrap().null_count(), 1);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert_eq!(FileFormat::from_name("DATA.CSV"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_name("book.xls"), Some(FileFormat::Excel));
        assert_eq!(FileFormat::from_name("book.XLSX"), Some(FileFormat::Excel));
        assert_eq!(FileFormat::from_name("notes.csv.bak"), None);
    }

    #[test]
    fn unsupported_extension_yields_no_dataset() {
        let mut loader = DataLoader::default();
        loader
            .load(&UploadedFile::new("people.csv", SAMPLE_CSV))
            .unwrap();

        let err = loader
            .load(&UploadedFile::new("data.txt", SAMPLE_CSV))
            .unwrap_err();

        assert!(matches!(err, LoaderError::UnsupportedFormat { .. }));
        assert!(err.to_string().starts_with("Invalid file format"));
        assert!(loader.get_dataframe().is_none());
        assert_eq!(loader.get_row_count(), 0);
    }

    #[test]
    fn garbage_spreadsheet_is_an_error() {
        let file = UploadedFile::new("book.xlsx", "definitely,not,a,workbook");
        assert!(load_upload(&file, LoadOptions::default()).is_err());
    }

    #[test]
    fn load_path_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(&path, SAMPLE_CSV).unwrap();

        let mut loader = DataLoader::default();
        loader.load_path(&path).unwrap();

        assert_eq!(loader.get_file_name(), Some("people.csv"));
        assert_eq!(loader.get_columns(), vec!["name", "age", "city"]);
        assert_eq!(loader.get_row_count(), 3);
    }

    #[test]
    fn unreadable_path_keeps_name_and_drops_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = DataLoader::default();
        loader
            .load(&UploadedFile::new("people.csv", SAMPLE_CSV))
            .unwrap();

        let err = loader.load_path(&dir.path().join("gone.csv")).unwrap_err();

        assert!(matches!(err, LoaderError::Io(_)));
        assert_eq!(loader.get_file_name(), Some("gone.csv"));
        assert!(loader.get_dataframe().is_none());
    }

    #[test]
    fn worksheet_columns_are_typed_from_cells() {
        let mut range = Range::new((0, 0), (3, 4));
        range.set_value((0, 0), Data::String("id".into()));
        range.set_value((0, 1), Data::String("score".into()));
        range.set_value((0, 2), Data::String("label".into()));
        range.set_value((0, 3), Data::String("flag".into()));
        // (0, 4) left blank

        range.set_value((1, 0), Data::Float(1.0));
        range.set_value((2, 0), Data::Int(2));
        range.set_value((3, 0), Data::Float(3.0));

        range.set_value((1, 1), Data::Float(0.5));
        range.set_value((3, 1), Data::Int(4));

        range.set_value((1, 2), Data::String("a".into()));
        range.set_value((2, 2), Data::Float(2.5));

        range.set_value((1, 3), Data::Bool(true));
        range.set_value((2, 3), Data::Bool(false));

        let df = range_to_dataframe(&range).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(
            df.get_column_names()
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>(),
            vec!["id", "score", "label", "flag", "Unnamed: 4"]
        );
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("score").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("score").unwrap().null_count(), 1);
        assert_eq!(df.column("label").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("flag").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(df.column("Unnamed: 4").unwrap().null_count(), 3);
    }

    #[test]
    fn repeated_headers_are_made_unique() {
        let header = [
            Data::String("x".into()),
            Data::String("x".into()),
            Data::Empty,
        ];
        assert_eq!(header_names(&header), vec!["x", "x.1", "Unnamed: 2"]);
    }

    #[test]
    fn suffixes_skip_names_already_taken() {
        let header = [
            Data::String("x".into()),
            Data::String("x.1".into()),
            Data::String("x".into()),
        ];
        assert_eq!(header_names(&header), vec!["x", "x.1", "x.2"]);

        let mut range = Range::new((0, 0), (1, 2));
        for (col, cell) in header.into_iter().enumerate() {
            range.set_value((0, col as u32), cell);
        }
        assert_eq!(range_to_dataframe(&range).unwrap().width(), 3);
    }

    #[test]
    fn huge_whole_floats_stay_float() {
        let mut range = Range::new((0, 0), (2, 0));
        range.set_value((0, 0), Data::String("big".into()));
        range.set_value((1, 0), Data::Float(1e20));
        range.set_value((2, 0), Data::Float(2.0));

        let df = range_to_dataframe(&range).unwrap();

        let big = df.column("big").unwrap();
        assert_eq!(big.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = big.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1e20), Some(2.0)]);
    }

    #[test]
    fn xlsx_workbook_keeps_row_and_column_counts() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "name").unwrap();
        sheet.write_string(0, 1, "score").unwrap();
        sheet.write_string(0, 2, "rank").unwrap();
        sheet.write_string(0, 3, "passed").unwrap();
        let rows = [("ann", 1.5, 1.0, true), ("ben", 2.0, 2.0, false), ("cy", 3.25, 3.0, true)];
        for (idx, (name, score, rank, passed)) in rows.into_iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_string(row, 0, name).unwrap();
            sheet.write_number(row, 1, score).unwrap();
            sheet.write_number(row, 2, rank).unwrap();
            sheet.write_boolean(row, 3, passed).unwrap();
        }
        let bytes = workbook.save_to_buffer().unwrap();

        let mut loader = DataLoader::default();
        let df = loader
            .load(&UploadedFile::new("scores.xlsx", bytes))
            .unwrap();

        assert_eq!((df.height(), df.width()), (3, 4));
        assert_eq!(df.column("name").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("score").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("rank").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("passed").unwrap().dtype(), &DataType::Boolean);
    }
}
