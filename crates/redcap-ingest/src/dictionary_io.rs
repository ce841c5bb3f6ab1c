//! Flat dictionary file reading and writing.
//!
//! The flat format is a CSV with the column titles of
//! [`DICTIONARY_COLUMNS`], one row per metadata record. The same bytes are
//! what an uploader sends to the capture system's import endpoint.

use std::io::Write;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use redcap_model::{DICTIONARY_COLUMNS, Dictionary, DictionaryRow, MetadataRecord};

use crate::error::{IngestError, Result};

/// Writes the dictionary to `path`.
///
/// The header row is always written, so an empty dictionary still yields
/// a valid file.
pub fn write_dictionary_csv(dictionary: &Dictionary, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| IngestError::DictionaryCsv {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    write_dictionary(dictionary, file).map_err(|message| IngestError::DictionaryCsv {
        path: path.to_path_buf(),
        message,
    })
}

/// Serializes the dictionary into the flat CSV payload.
pub fn dictionary_to_csv_string(dictionary: &Dictionary) -> Result<String> {
    let mut buffer = Vec::new();
    write_dictionary(dictionary, &mut buffer).map_err(|message| IngestError::Serialize {
        message,
    })?;
    String::from_utf8(buffer).map_err(|e| IngestError::Serialize {
        message: e.to_string(),
    })
}

fn write_dictionary<W: Write>(dictionary: &Dictionary, sink: W) -> std::result::Result<(), String> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(sink);
    writer
        .write_record(DICTIONARY_COLUMNS)
        .map_err(|e| e.to_string())?;
    for record in dictionary {
        writer
            .serialize(DictionaryRow::from(record))
            .map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())
}

/// Reads a flat dictionary file back into a [`Dictionary`].
pub fn read_dictionary_csv(path: &Path) -> Result<Dictionary> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| IngestError::DictionaryCsv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let headers = reader
        .headers()
        .map_err(|e| IngestError::DictionaryCsv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .clone();

    let mut dictionary = Dictionary::new();
    for result in reader.records() {
        let record = result.map_err(|e| IngestError::DictionaryCsv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: DictionaryRow =
            record
                .deserialize(Some(&headers))
                .map_err(|e| IngestError::DictionaryCsv {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
        let entry = MetadataRecord::try_from(row).map_err(|source| IngestError::InvalidRecord {
            path: path.to_path_buf(),
            line,
            source,
        })?;
        dictionary.push(entry);
    }
    Ok(dictionary)
}
