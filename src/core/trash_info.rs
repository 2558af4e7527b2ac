use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::utils::{BinsweepError, Result};

const SECTION: &str = "Trash Info";
const KEY: &str = "DeletionDate";

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const FRACTION_UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Read the deletion timestamp out of a trashinfo file.
///
/// Returns `Ok(None)` when the file cannot be read at all or carries no
/// `DeletionDate` under `[Trash Info]`; a value that is present but
/// unparseable is an error so callers can tell garbage apart from a
/// merely incomplete entry.
pub fn read_deletion_date(info_path: &Path) -> Result<Option<NaiveDateTime>> {
    let contents = match fs::read_to_string(info_path) {
        Ok(contents) => contents,
        Err(_) => return Ok(None),
    };
    let Some(value) = deletion_date_value(&contents) else {
        return Ok(None);
    };
    match parse_datetime(value) {
        Ok(timestamp) => Ok(Some(timestamp)),
        Err(err) => Err(BinsweepError::trash_info(info_path, err.to_string())),
    }
}

/// Parse a DeletionDate value. The plain local format is tried first,
/// then the fractional-seconds variant with a `Z` suffix that some
/// desktop environments write. The suffix does not shift the value;
/// timestamps are compared naively against local time.
pub fn parse_datetime(value: &str) -> std::result::Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, LOCAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, FRACTION_UTC_FORMAT))
}

/// Pull the DeletionDate value out of trashinfo text, if present.
/// Section names match exactly, keys case-insensitively.
fn deletion_date_value(contents: &str) -> Option<&str> {
    let mut in_section = false;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_section = line[1..line.len() - 1].trim() == SECTION;
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim().eq_ignore_ascii_case(KEY) {
                return Some(value.trim());
            }
        }
    }
    None
}
