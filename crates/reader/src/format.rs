//! Probe CSV format
//!
//! A block of `key = value` metadata lines followed by a comma separated
//! sample table whose first line names the columns.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use contracts::{Recording, SampleTable, TIME_COLUMN};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use tracing::{debug, info};

use crate::error::{ReaderError, Result};

/// Split a `key = value` header line, quotes and whitespace stripped.
fn metadata_entry(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once('=')?;
    Some((clean(key).to_string(), clean(value).to_string()))
}

fn clean(raw: &str) -> &str {
    raw.trim().trim_matches('"').trim()
}

/// Index columns written by spreadsheet tools carry no data.
fn is_index_column(name: &str) -> bool {
    name.is_empty() || name.starts_with("Unnamed")
}

fn parse_cell(cell: &str) -> std::result::Result<f64, String> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .map_err(|e| format!("'{cell}' is not a number ({e})"))
}

/// Metadata block and the byte offset and 0-based line of the column header.
fn split_metadata(text: &str) -> Result<(BTreeMap<String, String>, usize, usize)> {
    let mut metadata = BTreeMap::new();
    let mut offset = 0;

    for (idx, line) in text.split_inclusive('\n').enumerate() {
        if !line.trim().is_empty() {
            match metadata_entry(line) {
                Some((key, value)) => {
                    metadata.insert(key, value);
                }
                None => return Ok((metadata, offset, idx)),
            }
        }
        offset += line.len();
    }
    Err(ReaderError::MissingHeader)
}

/// Parse a complete recording from text.
///
/// # Errors
/// - `EmptyFile` for blank input, `MissingHeader` when only metadata is present
/// - `Csv` for rows whose cell count differs from the header or broken quoting
/// - `Parse` for a cell that is not a number
/// - `Table` when the columns lack a `time` axis or are inconsistent
pub fn parse_recording(text: &str) -> Result<Recording> {
    if text.trim().is_empty() {
        return Err(ReaderError::EmptyFile);
    }

    let (metadata, offset, header_line) = split_metadata(text)?;
    let file_line = |csv_line: u64| header_line + csv_line as usize;
    let csv_error = |source: csv::Error| ReaderError::Csv {
        line: file_line(source.position().map_or(1, |p| p.line())),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(Trim::All)
        .from_reader(text[offset..].as_bytes());

    let names: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let line = file_line(record.position().map_or(0, |p| p.line()));
        for ((name, cell), column) in names.iter().zip(record.iter()).zip(columns.iter_mut()) {
            let value = parse_cell(cell).map_err(|message| ReaderError::Parse {
                line,
                column: name.clone(),
                message,
            })?;
            column.push(value);
        }
    }

    let kept: Vec<(String, Vec<f64>)> = names
        .into_iter()
        .zip(columns)
        .filter(|(name, _)| !is_index_column(name))
        .collect();
    let table = SampleTable::from_columns(kept)?;
    debug!(
        samples = table.len(),
        columns = table.columns().len(),
        metadata = metadata.len(),
        "recording parsed"
    );

    Ok(Recording::new(metadata, table))
}

/// Read a recording file.
pub fn read_recording(path: impl AsRef<Path>) -> Result<Recording> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let recording = parse_recording(&text)?;
    info!(
        path = %path.display(),
        samples = recording.table.len(),
        serial = %recording.serial_number(),
        "recording loaded"
    );
    Ok(recording)
}

/// Read only the metadata block, without touching the samples.
pub fn read_metadata(path: impl AsRef<Path>) -> Result<BTreeMap<String, String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut metadata = BTreeMap::new();
    let mut seen_any = false;

    for line in reader.lines() {
        let line = line?;
        seen_any = true;
        if line.trim().is_empty() {
            continue;
        }
        match metadata_entry(&line) {
            Some((key, value)) => {
                metadata.insert(key, value);
            }
            None => return Ok(metadata),
        }
    }

    if seen_any {
        Err(ReaderError::MissingHeader)
    } else {
        Err(ReaderError::EmptyFile)
    }
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Write the metadata block and the sample table to `out`.
fn write_to<W: Write>(mut out: W, recording: &Recording) -> Result<W> {
    for (key, value) in &recording.metadata {
        writeln!(out, "{key} = {value}")?;
    }

    let table = &recording.table;
    let mut writer = WriterBuilder::new().from_writer(out);
    writer.write_record(std::iter::once(TIME_COLUMN).chain(table.column_names()))?;
    for (i, t) in table.time().iter().enumerate() {
        writer.write_record(
            std::iter::once(format_cell(*t))
                .chain(table.columns().iter().map(|c| format_cell(c.values[i]))),
        )?;
    }
    writer.into_inner().map_err(|e| ReaderError::Io(e.into_error()))
}

/// Render a recording in the probe CSV format. NaN samples become empty cells.
pub fn to_csv_string(recording: &Recording) -> Result<String> {
    let bytes = write_to(Vec::new(), recording)?;
    String::from_utf8(bytes)
        .map_err(|e| ReaderError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Write a recording in the probe CSV format.
pub fn write_recording(path: impl AsRef<Path>, recording: &Recording) -> Result<()> {
    let path = path.as_ref();
    let mut out = write_to(BufWriter::new(File::create(path)?), recording)?;
    out.flush()?;
    debug!(path = %path.display(), samples = recording.table.len(), "recording written");
    Ok(())
}
