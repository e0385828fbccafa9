use crate::error::{DashboardError, Result};
use crate::record::{
    COL_ADDRESS, COL_CITY, COL_FIRST, COL_LAST, COL_LATITUDE, COL_LONGITUDE, COL_STATE,
    COL_VISITED_BY, COL_ZIP, Dataset, RawTable, Record,
};
use std::collections::HashSet;

/// How many rows each cleaning step dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub blank: usize,
    pub missing_fields: usize,
    pub duplicates: usize,
    pub bad_coordinates: usize,
}

impl CleanReport {
    pub fn dropped(&self) -> usize {
        self.blank + self.missing_fields + self.duplicates + self.bad_coordinates
    }
}

/// Result of cleaning one raw table.
#[derive(Debug, Clone)]
pub struct Cleaned {
    pub dataset: Dataset,
    pub report: CleanReport,
}

struct Columns {
    first: usize,
    last: usize,
    address: usize,
    city: usize,
    state: usize,
    zip: usize,
    latitude: usize,
    longitude: usize,
    visited_by: Option<usize>,
}

impl Columns {
    fn find(table: &RawTable) -> Result<Self> {
        let require = |name: &str| {
            table
                .column(name)
                .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
        };
        Ok(Columns {
            first: require(COL_FIRST)?,
            last: require(COL_LAST)?,
            address: require(COL_ADDRESS)?,
            city: require(COL_CITY)?,
            state: require(COL_STATE)?,
            zip: require(COL_ZIP)?,
            latitude: require(COL_LATITUDE)?,
            longitude: require(COL_LONGITUDE)?,
            visited_by: table.column(COL_VISITED_BY),
        })
    }
}

fn parse_coordinate(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalize a raw table into a dataset.
///
/// Steps run in order, each on the output of the previous one:
/// 1. trim every cell, padding short rows with empty cells
/// 2. drop rows whose cells are all empty
/// 3. drop rows with an empty Address, City, State or Zip
/// 4. drop rows repeating an earlier (Address, City, State, Zip); first wins
/// 5. drop rows whose Latitude or Longitude is not a finite number
///
/// Dropped rows are not errors. The counts are returned in the report and
/// logged at debug level only.
///
/// # Errors
/// * `DashboardError::MissingColumn` if a required header is absent
pub fn clean(table: &RawTable) -> Result<Cleaned> {
    let cols = Columns::find(table)?;
    let mut report = CleanReport::default();

    // Rows built by hand may be ragged; pad so every column index is valid.
    let width = table.headers.len();
    let trimmed = table.rows.iter().map(|row| {
        let mut cells: Vec<String> = row.iter().take(width).map(|cell| cell.trim().to_string()).collect();
        cells.resize(width, String::new());
        cells
    });

    let mut seen: HashSet<(String, String, String, String)> = HashSet::new();
    let mut records = Vec::new();

    for row in trimmed {
        if row.iter().all(String::is_empty) {
            report.blank += 1;
            continue;
        }

        if [cols.address, cols.city, cols.state, cols.zip]
            .iter()
            .any(|&i| row[i].is_empty())
        {
            report.missing_fields += 1;
            continue;
        }

        let key = (
            row[cols.address].clone(),
            row[cols.city].clone(),
            row[cols.state].clone(),
            row[cols.zip].clone(),
        );
        if !seen.insert(key) {
            report.duplicates += 1;
            continue;
        }

        let (Some(latitude), Some(longitude)) = (
            parse_coordinate(&row[cols.latitude]),
            parse_coordinate(&row[cols.longitude]),
        ) else {
            report.bad_coordinates += 1;
            continue;
        };

        let visited_by = cols
            .visited_by
            .map(|i| row[i].clone())
            .filter(|v| !v.is_empty());

        records.push(Record {
            first: row[cols.first].clone(),
            last: row[cols.last].clone(),
            address: row[cols.address].clone(),
            city: row[cols.city].clone(),
            state: row[cols.state].clone(),
            zip: row[cols.zip].clone(),
            latitude,
            longitude,
            visited_by,
        });
    }

    if report.dropped() > 0 {
        log::debug!(
            "cleaning dropped {} of {} rows: {:?}",
            report.dropped(),
            table.rows.len(),
            report
        );
    }

    Ok(Cleaned {
        dataset: Dataset::new(records),
        report,
    })
}
