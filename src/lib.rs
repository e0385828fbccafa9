/*!
# Address Map Viewer

A password-protected dashboard that shows the addresses of one month's
spreadsheet tab as pins on an interactive map.

## Overview

Every page view runs the same linear cycle, with nothing cached between
cycles:

1. **Access gate** - the session must have entered the shared password
2. **Loader** - fetch the selected month's tab from the spreadsheet CSV export
3. **Cleaner** - trim cells, drop blank, incomplete, duplicate and
   unlocatable rows
4. **Filter** - keep the selected cities and visit status
5. **Renderer** - centre the map on the mean position and emit one marker per
   address

## Configuration

Read at startup by [`Config::from_env`](config::Config::from_env):

- `APP_PASSWORD` - shared secret for the gate
- `SPREADSHEET_ID` - spreadsheet holding one tab per month
- `MONTHS` - `Name=gid` pairs, e.g. `September=0,October=1547489573`
- `BIND` - listen address (default `127.0.0.1:3000`)
- `SHEET_EXPORT_BASE` - CSV export endpoint base
- `ADDRESS_MAP_CONFIG` - optional JSON file with the same settings

## Endpoints

- `/` - gate page or dashboard
- `/unlock` - password form target
- `/logout` - end the session
- `/api/map` - the dashboard view as JSON
- `/health` - liveness check

## Modules

- **record**: raw table, record and dataset types
- **loader**: export URL, CSV fetch and parse
- **cleaner**: dataset normalization
- **filter**: city and visit-status filters
- **render**: map view construction
- **dashboard**: one full render cycle
- **gate**: session-scoped password gate
- **app**: routing and handlers
*/

pub mod cleaner;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod gate;
pub mod loader;
pub mod record;
pub mod render;

#[cfg(feature = "web")]
pub mod app;

pub use cleaner::{CleanReport, Cleaned, clean};
pub use config::{Config, MapOptions, Month, MonthTable};
pub use dashboard::{DashboardView, Selection};
pub use error::{DashboardError, Result};
pub use filter::{CityFilter, VisitFilter, filter};
pub use gate::{AccessGate, GateState, SessionStore};
pub use record::{Dataset, RawTable, Record};
pub use render::{MapView, Marker, Rendered, render};
