//! Historical dataset: per-column medians and the hourly power profile.
//!
//! The dataset is a CSV with a header row, usually an hourly resample of the
//! household consumption log. How the hour of each row is found, in order:
//! 1. an explicit `hour` column;
//! 2. a timestamp index in the first column;
//! 3. a `DateTime` column (cells that fail to parse count as missing).
//!
//! A derived hour is added as an `hour` column and takes part in the medians,
//! like any other numeric column. Timestamp columns never do.

use std::io;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use tracing::{debug, info, warn};

use wattcast_core::{DefaultTable, HOUR};

use crate::error::{InfraError, ProfileError};

/// Column averaged by the hourly profile.
pub const GLOBAL_ACTIVE_POWER: &str = "Global_active_power";
/// Timestamp column used when there is no timestamp index.
pub const DATETIME: &str = "DateTime";

const NA_VALUES: [&str; 12] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// How the hour of each row was obtained.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HourSource {
    Column,
    TimestampIndex,
    DateTimeColumn,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
struct NumericColumn {
    name: String,
    cells: Vec<Option<f64>>,
}

/// Numeric view of the historical CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalDataset {
    columns: Vec<NumericColumn>,
    hours: Option<Vec<Option<u8>>>,
    hour_source: HourSource,
    rows: usize,
}

/// Average of one column per hour of day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPoint {
    pub hour: u8,
    /// `None` when no row falls in this hour.
    pub mean: Option<f64>,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyProfile {
    pub column: String,
    /// Always 24 points, hours 0 through 23.
    pub points: Vec<HourlyPoint>,
}

impl HourlyProfile {
    pub fn max_mean(&self) -> Option<f64> {
        self.points
            .iter()
            .filter_map(|p| p.mean)
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }
}

impl HistoricalDataset {
    /// Load `path` if it exists.
    ///
    /// `Ok(None)` means there is no dataset; callers degrade to empty defaults.
    /// A file that exists but cannot be read as CSV is an error.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, InfraError> {
        if !path.exists() {
            warn!(
                path = %path.display(),
                "historical dataset not found; medians and hourly profile disabled"
            );
            return Ok(None);
        }

        let file = std::fs::File::open(path).map_err(|source| InfraError::Io {
            artifact: "dataset",
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_reader(file).map_err(|reason| InfraError::DatasetMalformed {
            path: path.to_path_buf(),
            reason,
        })?;

        info!(
            path = %path.display(),
            rows = dataset.rows,
            numeric_columns = dataset.columns.len(),
            hour_source = ?dataset.hour_source,
            "loaded historical dataset"
        );
        Ok(Some(dataset))
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, String> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| e.to_string())?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err("missing header row".to_string());
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| e.to_string())?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self::from_rows(&headers, &rows))
    }

    /// The first column is dropped only when it is unnamed or holds timestamps.
    /// A named numeric first column such as `id` stays a feature column and
    /// contributes a median, unlike a reader that always treats column 0 as
    /// the row index.
    fn from_rows(headers: &[String], rows: &[Vec<String>]) -> Self {
        let hour_col = headers.iter().position(|h| h == HOUR);
        let index_is_timestamp = hour_col.is_none() && {
            let mut cells = rows.iter().filter_map(|r| cell(r, 0)).peekable();
            cells.peek().is_some() && cells.all(|c| parse_timestamp(c).is_some())
        };
        let datetime_col = headers.iter().position(|h| h == DATETIME);

        let (hour_source, timestamp_col) = if hour_col.is_some() {
            (HourSource::Column, None)
        } else if index_is_timestamp {
            (HourSource::TimestampIndex, Some(0))
        } else if let Some(col) = datetime_col {
            (HourSource::DateTimeColumn, Some(col))
        } else {
            (HourSource::Unavailable, None)
        };

        let mut columns = Vec::new();
        for (col, name) in headers.iter().enumerate() {
            // An unnamed first column is a pandas row index.
            if Some(col) == timestamp_col || (col == 0 && name.is_empty()) {
                continue;
            }
            if let Some(cells) = numeric_cells(rows, col) {
                columns.push(NumericColumn {
                    name: name.clone(),
                    cells,
                });
            } else {
                debug!(column = %name, "skipping non-numeric column");
            }
        }

        let hours: Option<Vec<Option<u8>>> = match (hour_source, timestamp_col) {
            (HourSource::Column, _) => columns
                .iter()
                .find(|c| c.name == HOUR)
                .map(|c| c.cells.iter().copied().map(|v| v.and_then(hour_from_number)).collect()),
            (_, Some(col)) => {
                let derived: Vec<Option<u8>> = rows
                    .iter()
                    .map(|r| cell(r, col).and_then(parse_timestamp).map(|ts| ts.hour() as u8))
                    .collect();
                columns.push(NumericColumn {
                    name: HOUR.to_string(),
                    cells: derived.iter().map(|h| h.map(f64::from)).collect(),
                });
                Some(derived)
            }
            _ => None,
        };

        Self {
            columns,
            hours,
            hour_source,
            rows: rows.len(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn hour_source(&self) -> HourSource {
        self.hour_source
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Median of every numeric column. Columns without samples map to NaN.
    pub fn default_table(&self) -> DefaultTable {
        self.columns
            .iter()
            .map(|c| {
                let mut values: Vec<f64> = c.cells.iter().flatten().copied().collect();
                (c.name.clone(), median(&mut values).unwrap_or(f64::NAN))
            })
            .collect()
    }

    /// Mean `Global_active_power` per hour of day.
    pub fn hourly_profile(&self) -> Result<HourlyProfile, ProfileError> {
        let power = self
            .columns
            .iter()
            .find(|c| c.name == GLOBAL_ACTIVE_POWER)
            .ok_or_else(|| ProfileError::MissingColumn(GLOBAL_ACTIVE_POWER.to_string()))?;
        let hours = self.hours.as_ref().ok_or(ProfileError::HourUndeterminable)?;

        let mut sums = [0.0f64; 24];
        let mut counts = [0usize; 24];
        for (hour, value) in hours.iter().zip(&power.cells) {
            if let (Some(h), Some(v)) = (hour, value) {
                sums[*h as usize] += v;
                counts[*h as usize] += 1;
            }
        }

        if counts.iter().all(|c| *c == 0) {
            return Err(ProfileError::HourUndeterminable);
        }

        let points = (0u8..24)
            .map(|h| {
                let i = h as usize;
                HourlyPoint {
                    hour: h,
                    mean: (counts[i] > 0).then(|| sums[i] / counts[i] as f64),
                    samples: counts[i],
                }
            })
            .collect();

        Ok(HourlyProfile {
            column: GLOBAL_ACTIVE_POWER.to_string(),
            points,
        })
    }
}

fn cell(row: &[String], col: usize) -> Option<&str> {
    row.get(col).map(String::as_str).filter(|s| !is_na(s))
}

fn is_na(s: &str) -> bool {
    NA_VALUES.contains(&s)
}

/// `Some` when every present cell of `col` parses as a number.
fn numeric_cells(rows: &[Vec<String>], col: usize) -> Option<Vec<Option<f64>>> {
    rows.iter()
        .map(|r| match r.get(col).map(String::as_str) {
            None => Ok(None),
            Some(s) if is_na(s) => Ok(None),
            Some(s) => s.parse::<f64>().map(|v| (!v.is_nan()).then_some(v)),
        })
        .collect::<Result<Vec<_>, _>>()
        .ok()
}

fn hour_from_number(v: f64) -> Option<u8> {
    (v.fract() == 0.0 && (0.0..=23.0).contains(&v)).then_some(v as u8)
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Median of `values`; the mean of the two middle values for even counts.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}
