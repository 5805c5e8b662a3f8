//! Directory-backed store of named tables.
//!
//! Table `t` lives in `<root>/t.csv`: UTF-8, one header row, comma separated,
//! an empty cell is a null. Tables are always read with every column as text
//! so that numeric coercion stays an explicit step of the transform.
//! Writes replace the whole table through a temporary sibling file that is
//! renamed over the destination.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use sha2::{Digest, Sha256};
use tracing::debug;

use sales_common::{any_to_string, clean_column_name, clean_column_names};

use crate::error::{IngestError, Result};

const TABLE_EXTENSION: &str = "csv";

/// A directory of CSV tables.
#[derive(Debug, Clone)]
pub struct TableStore {
    root: PathBuf,
}

impl TableStore {
    /// Open a store, creating its directory when missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| IngestError::DirectoryCreate {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{table}.{TABLE_EXTENSION}"))
    }

    pub fn contains(&self, table: &str) -> bool {
        self.table_path(table).is_file()
    }

    fn existing_path(&self, table: &str) -> Result<PathBuf> {
        let path = self.table_path(table);
        if path.is_file() {
            Ok(path)
        } else {
            Err(IngestError::TableNotFound {
                table: table.to_string(),
                path: self.root.clone(),
            })
        }
    }

    /// Read a table with cleaned column names and all columns as strings.
    pub fn read_table(&self, table: &str) -> Result<DataFrame> {
        let path = self.existing_path(table)?;
        let df = read_csv_file(&path)?;
        let df = clean_column_names(&df)?;
        debug!(
            table,
            rows = df.height(),
            columns = df.width(),
            "table read"
        );
        Ok(df)
    }

    /// Column names of a table, cleaned the same way `read_table` cleans them.
    pub fn read_schema(&self, table: &str) -> Result<Vec<String>> {
        let path = self.existing_path(table)?;
        let mut reader = csv_reader(&path)?;
        let headers = reader.headers().map_err(|e| IngestError::CsvParse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(headers.iter().map(clean_column_name).collect())
    }

    /// Number of data rows in a table.
    pub fn row_count(&self, table: &str) -> Result<usize> {
        let path = self.existing_path(table)?;
        let mut reader = csv_reader(&path)?;
        let mut count = 0usize;
        for record in reader.records() {
            record.map_err(|e| IngestError::CsvParse {
                path: path.clone(),
                message: e.to_string(),
            })?;
            count += 1;
        }
        Ok(count)
    }

    /// Table names in the store, sorted.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|source| IngestError::DirectoryRead {
            path: self.root.clone(),
            source,
        })?;
        let mut tables = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| IngestError::DirectoryRead {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_table = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(TABLE_EXTENSION));
            if !is_table {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                tables.push(stem.to_string());
            }
        }
        tables.sort();
        Ok(tables)
    }

    /// Replace a table with the contents of `df`. Returns the rows written.
    pub fn write_table(&self, table: &str, df: &DataFrame) -> Result<usize> {
        let path = self.table_path(table);
        let tmp_path = self
            .root
            .join(format!("{table}.{TABLE_EXTENSION}.tmp"));
        write_csv_file(&tmp_path, df)?;
        fs::rename(&tmp_path, &path).map_err(|source| IngestError::FileWrite {
            path: path.clone(),
            source,
        })?;
        debug!(table, rows = df.height(), path = %path.display(), "table replaced");
        Ok(df.height())
    }

    /// SHA-256 of the stored table file as lowercase hex.
    pub fn fingerprint(&self, table: &str) -> Result<String> {
        let path = self.existing_path(table)?;
        let file = File::open(&path).map_err(|source| IngestError::FileRead {
            path: path.clone(),
            source,
        })?;
        let mut reader = BufReader::new(file);
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];
        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .map_err(|source| IngestError::FileRead {
                    path: path.clone(),
                    source,
                })?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }
        Ok(hex::encode(hasher.finalize()))
    }
}

fn csv_reader(path: &Path) -> Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Read a CSV file into a DataFrame with every column as a string column.
///
/// Column names are kept exactly as written in the file.
pub fn read_csv_file(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Write a DataFrame as CSV. Nulls become empty cells.
pub fn write_csv_file(path: &Path, df: &DataFrame) -> Result<()> {
    let file = File::create(path).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    let csv_error = |e: csv::Error| IngestError::CsvWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let columns = df.get_columns();
    writer
        .write_record(columns.iter().map(|column| column.name().as_str()))
        .map_err(csv_error)?;
    let mut record: Vec<String> = Vec::with_capacity(columns.len());
    for idx in 0..df.height() {
        record.clear();
        for column in columns {
            record.push(any_to_string(column.get(idx)?));
        }
        writer.write_record(&record).map_err(csv_error)?;
    }
    let mut inner = writer.into_inner().map_err(|e| IngestError::CsvWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    inner.flush().map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
