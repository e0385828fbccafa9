use serde::Serialize;
use std::collections::BTreeSet;

/// Column headers the sheet is expected to carry.
pub const COL_FIRST: &str = "First";
pub const COL_LAST: &str = "Last";
pub const COL_ADDRESS: &str = "Address";
pub const COL_CITY: &str = "City";
pub const COL_STATE: &str = "State";
pub const COL_ZIP: &str = "Zip";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";
pub const COL_VISITED_BY: &str = "Visited By";

/// A sheet tab as fetched: named columns and untyped cells.
///
/// Every row has exactly `headers.len()` cells; missing cells are empty
/// strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// One address row after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub first: String,
    pub last: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Free text naming who visited; `None` when nobody has
    pub visited_by: Option<String>,
}

impl Record {
    pub fn is_visited(&self) -> bool {
        self.visited_by.is_some()
    }
}

/// Ordered collection of cleaned records for one month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct cities, sorted.
    pub fn cities(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.city.clone()).collect()
    }

    /// Distinct non-empty "Visited By" values, sorted.
    pub fn visitors(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .records
            .iter()
            .filter_map(|r| r.visited_by.as_deref())
            .collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Turn the dataset back into a raw table with the standard headers.
    pub fn to_raw(&self) -> RawTable {
        let headers = [
            COL_FIRST,
            COL_LAST,
            COL_ADDRESS,
            COL_CITY,
            COL_STATE,
            COL_ZIP,
            COL_LATITUDE,
            COL_LONGITUDE,
            COL_VISITED_BY,
        ]
        .iter()
        .map(|h| h.to_string())
        .collect();

        let rows = self
            .records
            .iter()
            .map(|r| {
                vec![
                    r.first.clone(),
                    r.last.clone(),
                    r.address.clone(),
                    r.city.clone(),
                    r.state.clone(),
                    r.zip.clone(),
                    r.latitude.to_string(),
                    r.longitude.to_string(),
                    r.visited_by.clone().unwrap_or_default(),
                ]
            })
            .collect();

        RawTable { headers, rows }
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Dataset {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
