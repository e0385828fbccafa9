use thiserror::Error;

/// Errors that abort a render cycle or stop the server from starting.
///
/// Row-level defects in the sheet never show up here: the cleaner drops
/// those rows instead.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown month: {0}")]
    UnknownMonth(String),

    #[cfg(feature = "web")]
    #[error("failed to fetch sheet: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("sheet export returned HTTP {status} for {url}")]
    Http { status: u16, url: String },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("sheet is missing the \"{0}\" column")]
    MissingColumn(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("failed to encode map view: {0}")]
    Encode(serde_json::Error),

    #[cfg(feature = "web")]
    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(feature = "web")]
mod response {
    use super::DashboardError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};

    impl DashboardError {
        pub fn status_code(&self) -> StatusCode {
            match self {
                DashboardError::UnknownMonth(_) => StatusCode::BAD_REQUEST,
                DashboardError::Fetch(_)
                | DashboardError::Http { .. }
                | DashboardError::Csv(_)
                | DashboardError::MissingColumn(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for DashboardError {
        fn into_response(self) -> Response {
            let status = self.status_code();
            log::error!("render cycle aborted: {}", self);
            (status, self.to_string()).into_response()
        }
    }
}
