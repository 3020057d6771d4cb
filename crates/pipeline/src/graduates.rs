//! The graduating-cohort CSV: written by the promotion step, read back by
//! `ban-graduates`.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use cutover_core::error::{CutoverError, Result};

/// One graduating student. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraduateRecord {
    pub id: i64,
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: String,
}

/// `graduating_students_<YYYYMMDDTHHMMSS>.csv`
pub fn graduates_file_name(now: NaiveDateTime) -> String {
    format!("graduating_students_{}.csv", now.format("%Y%m%dT%H%M%S"))
}

/// Write `records` under `dir` (created if missing) and return the file path.
///
/// Fields containing a comma, quote, CR or LF are quoted with embedded quotes
/// doubled.
pub fn write_graduates_csv(
    dir: &Path,
    records: &[GraduateRecord],
    now: NaiveDateTime,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(graduates_file_name(now));

    let mut writer = csv::Writer::from_path(&path).map_err(csv_error)?;
    for record in records {
        writer.serialize(record).map_err(csv_error)?;
    }
    writer.flush()?;

    Ok(path)
}

/// Read a cohort file previously written by [`write_graduates_csv`].
pub fn read_graduates_csv(path: &Path) -> Result<Vec<GraduateRecord>> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    reader
        .deserialize()
        .map(|record| record.map_err(csv_error))
        .collect()
}

fn csv_error(err: csv::Error) -> CutoverError {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CutoverError::Io(io),
            other => CutoverError::Serialization(format!("csv: {other:?}")),
        }
    } else {
        CutoverError::Serialization(format!("csv: {err}"))
    }
}
