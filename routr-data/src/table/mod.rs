//! CSV adapters for batch input and output tables.
//!
//! Input tables are headed and must provide `origin_long`, `origin_lat`,
//! `dest_long` and `dest_lat`; other columns are ignored and values are
//! trimmed but otherwise kept as text. Output tables always start with the
//! header `origin_lat,origin_long,dest_lat,dest_long,distance`, even when
//! there are no rows.

use std::io::{Read, Write};

use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::debug;
use routr_core::{InputRow, OutputRow};
use thiserror::Error;

/// Errors raised while reading or writing tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// A row could not be parsed.
    #[error("failed to read input table at line {line}: {source}")]
    Read {
        /// One-based line number, or zero when unknown.
        line: u64,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
    /// A row could not be written.
    #[error("failed to write output table: {0}")]
    Write(#[source] csv::Error),
    /// Buffered output could not be flushed.
    #[error("failed to flush output table: {0}")]
    Flush(#[source] std::io::Error),
}

/// Parse every row of a headed CSV table.
///
/// # Errors
///
/// Returns [`TableError::Read`] for the first row that is missing a
/// required column or is otherwise malformed.
///
/// # Examples
///
/// ```
/// use routr_data::table::read_rows;
///
/// let csv = "origin_long,origin_lat,dest_long,dest_lat,label\n13.38, 52.51,13.42,52.50,x\n";
/// let rows = read_rows(csv.as_bytes())?;
/// assert_eq!(rows[0].origin_lat, "52.51");
/// # Ok::<(), routr_data::table::TableError>(())
/// ```
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<InputRow>, TableError> {
    let mut csv = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let rows = csv
        .deserialize()
        .map(|row| {
            row.map_err(|source| TableError::Read {
                line: source.position().map_or(0, csv::Position::line),
                source,
            })
        })
        .collect::<Result<Vec<InputRow>, _>>()?;
    debug!("read {} input rows", rows.len());
    Ok(rows)
}

/// Write `rows` as a headed CSV table.
///
/// # Errors
///
/// Returns [`TableError::Write`] or [`TableError::Flush`] when the writer
/// fails.
pub fn write_rows<W: Write>(writer: W, rows: &[OutputRow]) -> Result<(), TableError> {
    let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(OutputRow::HEADERS)
        .map_err(TableError::Write)?;
    for row in rows {
        csv.serialize(row).map_err(TableError::Write)?;
    }
    csv.flush().map_err(TableError::Flush)?;
    debug!("wrote {} output rows", rows.len());
    Ok(())
}
