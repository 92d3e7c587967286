//! # Flat-File Record Codec
//!
//! One product per line, comma-delimited, fixed column order:
//!
//! ```text
//! ProductName,StoreId,Quantity,Price
//! Apple,1,10,2.00
//! "Nuts, salted",1,4,3.25
//! "12"" Pizza",2,3,9.99
//! ```
//!
//! Quoting and parsing are handled by the `csv` crate. Columns map onto
//! `Product` through its PascalCase serde names, so the header is checked
//! once and every row deserializes by column name.

use std::io;
use std::path::Path;

use catalog_core::{Product, PRODUCT_COLUMNS};
use csv::{ReaderBuilder, Terminator, Trim, Writer, WriterBuilder};

use crate::error::{StoreError, StoreResult};

/// Header line written at the top of every file.
pub fn header() -> String {
    PRODUCT_COLUMNS.join(",")
}

/// Encodes one product as a line (without the trailing newline).
pub fn encode(product: &Product) -> StoreResult<String> {
    let mut writer = writer();
    writer.serialize(product).map_err(io::Error::from)?;

    let mut line = finish(writer)?;
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}

/// Encodes a whole catalog, header first, one trailing newline per line.
pub fn encode_all(products: &[Product]) -> StoreResult<String> {
    let mut writer = writer();
    writer
        .write_record(PRODUCT_COLUMNS)
        .map_err(io::Error::from)?;
    for product in products {
        writer.serialize(product).map_err(io::Error::from)?;
    }
    finish(writer)
}

/// Parses a whole file. `path` is only used in error messages.
///
/// An empty file is an empty catalog. Otherwise the first row must be the
/// header. Blank lines are skipped.
pub fn decode_all(path: &Path, contents: &str) -> StoreResult<Vec<Product>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .from_reader(contents.as_bytes());

    let headers = reader.headers().map_err(|e| corrupt(path, e))?;
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    if !headers.iter().eq(PRODUCT_COLUMNS) {
        return Err(StoreError::CorruptRecord {
            path: path.to_path_buf(),
            line: headers.position().map_or(1, |p| p.line() as usize),
            reason: format!("expected header '{}'", header()),
        });
    }

    reader
        .deserialize::<Product>()
        .map(|row| row.map_err(|e| corrupt(path, e)))
        .collect()
}

fn writer() -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: Writer<Vec<u8>>) -> StoreResult<String> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let text = String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(text)
}

/// Maps a parse failure to `CorruptRecord`, keeping the line it starts on.
fn corrupt(path: &Path, err: csv::Error) -> StoreError {
    let line = err.position().map_or(0, |p| p.line() as usize);
    let reason = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {} fields, found {}", expected_len, len),
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        _ => err.to_string(),
    };

    StoreError::CorruptRecord {
        path: path.to_path_buf(),
        line,
        reason,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
