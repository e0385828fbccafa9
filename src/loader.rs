#[cfg(feature = "web")]
use crate::config::{Config, Month};
use crate::error::Result;
use crate::record::RawTable;
use csv::ReaderBuilder;

/// Build the CSV export URL for one tab of the spreadsheet.
///
/// # Arguments
/// * `export_base` - Base of the export endpoint, without a trailing slash
/// * `spreadsheet_id` - Spreadsheet identifier (percent-encoded here)
/// * `gid` - Tab identifier of the month
///
/// # Examples
/// ```
/// use address_map::loader::sheet_url;
///
/// assert_eq!(
///     sheet_url("https://docs.google.com/spreadsheets/d", "abc", 7),
///     "https://docs.google.com/spreadsheets/d/abc/gviz/tq?tqx=out:csv&gid=7"
/// );
/// ```
pub fn sheet_url(export_base: &str, spreadsheet_id: &str, gid: u64) -> String {
    format!(
        "{}/{}/gviz/tq?tqx=out:csv&gid={}",
        export_base.trim_end_matches('/'),
        urlencoding::encode(spreadsheet_id),
        gid
    )
}

/// Parse exported CSV text into a raw table.
///
/// The first record is the header row. Header names are trimmed; rows
/// shorter than the header are padded with empty cells and longer rows are
/// cut to the header width.
///
/// # Errors
/// * `DashboardError::Csv` if the text is not valid CSV
pub fn parse_csv(text: &str) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row: Vec<String> = record
            .iter()
            .take(headers.len())
            .map(str::to_string)
            .collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

/// Fetch the body of a CSV export URL.
///
/// No retry and no timeout beyond the client's defaults.
///
/// # Errors
/// * `DashboardError::Fetch` on network failure
/// * `DashboardError::Http` on a non-success status
#[cfg(feature = "web")]
pub async fn fetch_csv(client: &reqwest::Client, url: &str) -> Result<String> {
    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(crate::error::DashboardError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(resp.text().await?)
}

/// Fetch and parse the tab for `month`.
#[cfg(feature = "web")]
pub async fn load(client: &reqwest::Client, config: &Config, month: &Month) -> Result<RawTable> {
    let url = sheet_url(&config.export_base, &config.spreadsheet_id, month.gid);
    log::info!("fetching {} (gid {})", month.name, month.gid);
    let text = fetch_csv(client, &url).await?;
    let table = parse_csv(&text)?;
    log::debug!("{}: {} raw rows", month.name, table.rows.len());
    Ok(table)
}
