//! One render cycle: load the month's tab, clean it, derive the selector
//! options, filter, and produce map parameters.

use crate::cleaner::{CleanReport, clean};
use crate::config::{Config, Month};
use crate::error::{DashboardError, Result};
use crate::filter::{CityFilter, VisitFilter, filter, visit_options};
use crate::record::RawTable;
use crate::render::{Rendered, render};
use serde::Serialize;

/// Current values of the three selectors.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Month name; `None` selects the first configured month
    pub month: Option<String>,

    /// Selected cities; `None` selects every city in the loaded data
    pub cities: Option<CityFilter>,

    pub visit: VisitFilter,

    /// Month whose options `cities` and `visit` were picked from. When it
    /// differs from the month being loaded the filters are stale and reset
    /// to their defaults; `None` means the filters are not tied to a month.
    pub filters_month: Option<String>,
}

impl Selection {
    /// Resolve the selected month against the configured table.
    ///
    /// # Errors
    /// * `DashboardError::UnknownMonth` for a name not in the table
    pub fn month<'a>(&self, config: &'a Config) -> Result<&'a Month> {
        match &self.month {
            Some(name) => config
                .months
                .get(name)
                .ok_or_else(|| DashboardError::UnknownMonth(name.clone())),
            None => config
                .months
                .first()
                .ok_or_else(|| DashboardError::Config("no months configured".into())),
        }
    }
}

/// Everything a page needs to draw the sidebar and the map.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub months: Vec<String>,
    pub month: String,
    pub cities: Vec<String>,
    pub selected_cities: Vec<String>,
    pub visit_options: Vec<String>,
    pub visit: String,
    pub total: usize,
    pub shown: usize,
    #[serde(skip)]
    pub report: CleanReport,
    pub rendered: Rendered,
}

/// Run clean → filter → render over an already loaded table.
///
/// Filters picked for another month are dropped: the new month starts with
/// every city selected and the visit filter on `All`.
pub fn build_view(config: &Config, month: &Month, table: &RawTable, selection: &Selection) -> Result<DashboardView> {
    let cleaned = clean(table)?;
    let dataset = cleaned.dataset;

    let fresh = selection
        .filters_month
        .as_deref()
        .is_none_or(|m| m == month.name);
    let visit = if fresh { selection.visit.clone() } else { VisitFilter::All };

    let cities = dataset.cities();
    let selected: CityFilter = match &selection.cities {
        Some(chosen) if fresh => chosen.clone(),
        _ => cities.clone(),
    };

    let filtered = filter(&dataset, &selected, &visit);
    let rendered = render(&filtered, &config.map);

    Ok(DashboardView {
        months: config.months.names(),
        month: month.name.clone(),
        cities: cities.into_iter().collect(),
        selected_cities: selected.into_iter().collect(),
        visit_options: visit_options(&dataset),
        visit: visit.label().to_string(),
        total: dataset.len(),
        shown: filtered.len(),
        report: cleaned.report,
        rendered,
    })
}

/// Run a full cycle, fetching the selected month's tab first.
///
/// Any fetch, CSV or column error aborts the cycle; nothing is cached
/// between cycles.
#[cfg(feature = "web")]
pub async fn run_cycle(config: &Config, client: &reqwest::Client, selection: &Selection) -> Result<DashboardView> {
    let month = selection.month(config)?;
    let table = crate::loader::load(client, config, month).await?;
    build_view(config, month, &table, selection)
}
