use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::{CookieJar, Query};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::dashboard::{DashboardView, Selection, run_cycle};
use crate::error::{DashboardError, Result};
use crate::filter::VisitFilter;
use crate::gate::{self, AccessGate, GateState, SessionStore};
use crate::render::Rendered;

const PAGE_TITLE: &str = "Address Map Viewer";

pub struct AppState {
    pub config: Config,
    pub client: reqwest::Client,
    pub gate: AccessGate,
    pub sessions: SessionStore,
    templates: Handlebars<'static>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let mut templates = Handlebars::new();
        templates
            .register_template_string("gate", include_str!("./static/gate.html"))
            .map_err(|e| DashboardError::Config(format!("gate template: {e}")))?;
        templates
            .register_template_string("dashboard", include_str!("./static/dashboard.html"))
            .map_err(|e| DashboardError::Config(format!("dashboard template: {e}")))?;

        let client = reqwest::Client::builder().build()?;

        Ok(AppState {
            gate: AccessGate::new(config.app_password.clone()),
            config,
            client,
            sessions: SessionStore::new(),
            templates,
        })
    }
}

/// Query string of the dashboard page.
///
/// `city` may repeat. `city_filter` is sent by the filter form so that an
/// empty city selection can be told apart from a first visit, and
/// `filters_month` names the month the form's options came from.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub month: Option<String>,
    #[serde(default)]
    pub city: Vec<String>,
    pub city_filter: Option<String>,
    pub filters_month: Option<String>,
    pub visited: Option<String>,
}

impl SelectionQuery {
    pub fn into_selection(self) -> Selection {
        let submitted = self.city_filter.is_some();
        let cities = if submitted || !self.city.is_empty() {
            Some(self.city.into_iter().collect())
        } else {
            None
        };
        // A filter form without its month cannot be trusted for any month.
        let filters_month = submitted.then(|| self.filters_month.unwrap_or_default());
        Selection {
            month: self.month.filter(|m| !m.is_empty()),
            cities,
            visit: self
                .visited
                .as_deref()
                .map(VisitFilter::parse)
                .unwrap_or_default(),
            filters_month,
        }
    }
}

#[derive(Serialize)]
struct Choice {
    value: String,
    selected: bool,
}

#[derive(Serialize)]
struct GatePage {
    title: &'static str,
    error: bool,
}

#[derive(Serialize)]
struct DashboardPage {
    title: &'static str,
    month: String,
    months: Vec<Choice>,
    cities: Vec<Choice>,
    visits: Vec<Choice>,
    total: usize,
    shown: usize,
    notice: Option<String>,
    width: u32,
    height: u32,
    map_json: Option<String>,
}

impl DashboardPage {
    fn from_view(view: &DashboardView) -> Result<Self> {
        let (notice, map_json) = match &view.rendered {
            Rendered::Empty { notice } => (Some(notice.clone()), None),
            // Escaped so the JSON cannot close the surrounding <script>.
            Rendered::Map(map) => (None, Some(
                serde_json::to_string(map)
                    .map_err(DashboardError::Encode)?
                    .replace("</", "<\\/"),
            )),
        };

        Ok(DashboardPage {
            title: PAGE_TITLE,
            month: view.month.clone(),
            months: choices(&view.months, |m| m == view.month),
            cities: choices(&view.cities, |c| view.selected_cities.iter().any(|s| s == c)),
            visits: choices(&view.visit_options, |v| v == view.visit),
            total: view.total,
            shown: view.shown,
            notice,
            width: view.rendered.map().map_or(0, |m| m.width),
            height: view.rendered.map().map_or(0, |m| m.height),
            map_json,
        })
    }
}

fn choices(values: &[String], is_selected: impl Fn(&str) -> bool) -> Vec<Choice> {
    values
        .iter()
        .map(|v| Choice {
            value: v.clone(),
            selected: is_selected(v),
        })
        .collect()
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_dashboard))
        .route("/unlock", post(gate::handle_unlock))
        .route("/logout", get(gate::handle_logout))
        .route("/api/map", get(get_map_data))
        .route("/health", get(|| async { "ok" }))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
}

pub async fn run(config: Config) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let bind = config.bind.clone();
    let state = Arc::new(AppState::new(config)?);
    let app = router(state);

    let listener = TcpListener::bind(&bind).await?;
    log::info!("Listening on http://{}", bind);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("shutting down");
        })
        .await?;

    Ok(())
}

async fn serve_dashboard(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<SelectionQuery>,
) -> Result<Response> {
    let gate_state = gate::session_state(&state.sessions, &jar);

    if gate_state != GateState::Unlocked {
        let page = state.templates.render(
            "gate",
            &GatePage {
                title: PAGE_TITLE,
                error: gate_state == GateState::Locked,
            },
        )?;
        return Ok(Html(page).into_response());
    }

    let view = run_cycle(&state.config, &state.client, &query.into_selection()).await?;
    let page = state
        .templates
        .render("dashboard", &DashboardPage::from_view(&view)?)?;
    Ok(Html(page).into_response())
}

async fn get_map_data(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<SelectionQuery>,
) -> Result<Response> {
    if gate::session_state(&state.sessions, &jar) != GateState::Unlocked {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "locked" })),
        )
            .into_response());
    }

    let view = run_cycle(&state.config, &state.client, &query.into_selection()).await?;
    Ok(Json(view).into_response())
}
