//! CSV header record reading and in-place rewriting.
//!
//! Only the first record is parsed. The bytes after it are copied verbatim
//! during a rewrite, so every data row stays byte-for-byte what it was.

use std::fs;
use std::io::Write;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use tempfile::NamedTempFile;

use crate::error::{IngestError, Result};

const BOM: char = '\u{feff}';

/// The header record of a file and where its data rows begin.
#[derive(Debug)]
struct HeaderRecord {
    names: Vec<String>,
    /// Byte offset of the first data row.
    body_start: usize,
    /// Whether the header line carries a line terminator.
    terminated: bool,
    crlf: bool,
}

/// Reads the column names exactly as stored in the header record.
///
/// Repeated and empty names are returned as they are; callers own any
/// renaming.
pub fn read_header_record(path: &Path) -> Result<Vec<String>> {
    let bytes = read_source(path)?;
    Ok(parse_header(path, &bytes)?.names)
}

/// Replaces the header record of `path` with `names`.
///
/// The line terminator style of the header is kept. The new file is written
/// next to the old one and renamed over it.
pub fn rewrite_header_record(path: &Path, names: &[String]) -> Result<()> {
    let bytes = read_source(path)?;
    let header = parse_header(path, &bytes)?;
    if names.len() != header.names.len() {
        return Err(write_failed(
            path,
            format!(
                "header has {} columns, {} names given",
                header.names.len(),
                names.len()
            ),
        ));
    }

    let terminator = if header.crlf {
        Terminator::CRLF
    } else {
        Terminator::Any(b'\n')
    };
    let mut writer = WriterBuilder::new()
        .terminator(terminator)
        .from_writer(Vec::new());
    writer
        .write_record(names)
        .map_err(|e| write_failed(path, e.to_string()))?;
    let mut line = writer
        .into_inner()
        .map_err(|e| write_failed(path, e.to_string()))?;
    if !header.terminated {
        while line.last().is_some_and(|b| matches!(b, b'\r' | b'\n')) {
            line.pop();
        }
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| write_failed(path, e.to_string()))?;
    temp.write_all(&line)
        .and_then(|()| temp.write_all(&bytes[header.body_start..]))
        .and_then(|()| temp.flush())
        .map_err(|e| write_failed(path, e.to_string()))?;
    temp.persist(path)
        .map_err(|e| write_failed(path, e.error.to_string()))?;
    Ok(())
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| IngestError::UnreadableSource {
        path: path.to_path_buf(),
        source: e,
    })?;
    if bytes.is_empty() {
        return Err(IngestError::EmptySource {
            path: path.to_path_buf(),
        });
    }
    Ok(bytes)
}

fn parse_header(path: &Path, bytes: &[u8]) -> Result<HeaderRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut record = StringRecord::new();
    let found = reader
        .read_record(&mut record)
        .map_err(|e| IngestError::MalformedSource {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    if !found {
        return Err(IngestError::EmptySource {
            path: path.to_path_buf(),
        });
    }

    // The reader may stop on or after the terminator; skip whatever is left.
    let consumed = usize::try_from(reader.position().byte())
        .unwrap_or(bytes.len())
        .min(bytes.len());
    let body_start = consumed
        + bytes[consumed..]
            .iter()
            .take_while(|b| matches!(b, b'\r' | b'\n'))
            .count();
    let head = &bytes[..body_start];

    let names = record
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if i == 0 {
                name.trim_start_matches(BOM).to_string()
            } else {
                name.to_string()
            }
        })
        .collect();

    Ok(HeaderRecord {
        names,
        body_start,
        terminated: head.last().is_some_and(|b| matches!(b, b'\r' | b'\n')),
        crlf: head.ends_with(b"\r\n"),
    })
}

fn write_failed(path: &Path, message: String) -> IngestError {
    IngestError::WriteFailed {
        path: path.to_path_buf(),
        message,
    }
}
