use crate::config::MapOptions;
use crate::record::{Dataset, Record};
use serde::Serialize;

/// Notice shown instead of a map when the filters leave nothing.
pub const EMPTY_NOTICE: &str = "No addresses match your filters.";

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One pin on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: GeoPoint,

    /// Hover text (the last name)
    pub tooltip: String,

    /// Click popup, one entry per line
    pub popup: Vec<String>,
}

impl Marker {
    fn from_record(record: &Record) -> Self {
        Marker {
            position: GeoPoint {
                lat: record.latitude,
                lon: record.longitude,
            },
            tooltip: record.last.clone(),
            popup: popup_lines(record),
        }
    }
}

/// Everything the map widget needs to draw the filtered records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
    pub markers: Vec<Marker>,
}

/// Outcome of rendering one filtered dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rendered {
    Empty { notice: String },
    Map(MapView),
}

impl Rendered {
    pub fn map(&self) -> Option<&MapView> {
        match self {
            Rendered::Map(view) => Some(view),
            Rendered::Empty { .. } => None,
        }
    }
}

/// Popup text for a record: full name, street, then city line.
pub fn popup_lines(record: &Record) -> Vec<String> {
    vec![
        format!("{} {}", record.first, record.last),
        record.address.clone(),
        format!("{}, {} {}", record.city, record.state, record.zip),
    ]
}

/// Convert a filtered dataset into map parameters.
///
/// The map is centred on the mean latitude and mean longitude of the
/// records. An empty dataset yields the empty notice and no map.
pub fn render(dataset: &Dataset, options: &MapOptions) -> Rendered {
    if dataset.is_empty() {
        return Rendered::Empty {
            notice: EMPTY_NOTICE.to_string(),
        };
    }

    let n = dataset.len() as f64;
    let (lat_sum, lon_sum) = dataset
        .iter()
        .fold((0.0, 0.0), |(lat, lon), r| (lat + r.latitude, lon + r.longitude));

    Rendered::Map(MapView {
        center: GeoPoint {
            lat: lat_sum / n,
            lon: lon_sum / n,
        },
        zoom: options.zoom,
        width: options.width,
        height: options.height,
        markers: dataset.iter().map(Marker::from_record).collect(),
    })
}
