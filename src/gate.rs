#[cfg(feature = "web")]
use crate::app::AppState;
#[cfg(feature = "web")]
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
#[cfg(feature = "web")]
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
#[cfg(feature = "web")]
use std::sync::Arc;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, SystemTime};

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "session";

const SESSION_DURATION: u64 = 24 * 60 * 60; // 24 hours in seconds

/// Outcome of the access gate for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GateState {
    /// No password has been submitted yet
    #[default]
    Undecided,

    /// The correct password was entered
    Unlocked,

    /// The last password entered was wrong
    Locked,
}

/// Compares entered passwords against the configured secret.
///
/// Plain string equality: no hashing, retry limit or lockout.
#[derive(Clone)]
pub struct AccessGate {
    secret: String,
}

impl AccessGate {
    pub fn new(secret: impl Into<String>) -> Self {
        AccessGate {
            secret: secret.into(),
        }
    }

    /// Decide the gate state for an entered password.
    ///
    /// # Returns
    /// * `GateState::Unlocked` on an exact match, `GateState::Locked` otherwise
    pub fn check(&self, entered: &str) -> GateState {
        if entered == self.secret {
            GateState::Unlocked
        } else {
            GateState::Locked
        }
    }
}

/// Gate outcome of one browser session.
#[derive(Debug, Clone)]
pub struct Session {
    pub gate: GateState,

    /// Time when the session expires
    pub expires_at: SystemTime,
}

/// Session-scoped gate flags, owned by the application state.
///
/// A session starts `Undecided` and only changes when a password is
/// submitted. Ending the session forgets it.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new undecided session and return its id.
    #[cfg(feature = "web")]
    pub fn open(&self) -> String {
        let session_id = uuid::Uuid::new_v4().to_string();
        self.insert(&session_id, GateState::Undecided);
        session_id
    }

    fn insert(&self, session_id: &str, gate: GateState) {
        let session = Session {
            gate,
            expires_at: SystemTime::now() + Duration::from_secs(SESSION_DURATION),
        };
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, s| s.expires_at > SystemTime::now());
        sessions.insert(session_id.to_string(), session);
    }

    /// Gate state of a live session, `None` for unknown or expired ids.
    pub fn state(&self, session_id: &str) -> Option<GateState> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(session_id)
            .filter(|s| s.expires_at > SystemTime::now())
            .map(|s| s.gate)
    }

    /// Record the outcome of a password attempt for a session.
    pub fn record(&self, session_id: &str, gate: GateState) {
        self.insert(session_id, gate);
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.values().filter(|s| s.expires_at > SystemTime::now()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_unlocked(&self, session_id: &str) -> bool {
        self.state(session_id) == Some(GateState::Unlocked)
    }

    /// End a session, clearing its gate flag.
    pub fn end(&self, session_id: &str) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(session_id);
    }
}

/// Password form posted by the gate page.
#[derive(Deserialize)]
pub struct UnlockForm {
    pub password: String,
}

// Web handler functions below (only compiled with "web" feature)

/// Gate state of the session behind the request cookie.
///
/// Missing, unknown or expired cookies read as `Undecided`. Nothing is
/// stored: a session only exists once a password has been submitted.
#[cfg(feature = "web")]
pub fn session_state(store: &SessionStore, jar: &CookieJar) -> GateState {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| store.state(cookie.value()))
        .unwrap_or_default()
}

/// Look up the session behind the request cookie, opening a fresh one when
/// the cookie is missing, unknown or expired.
///
/// # Returns
/// * `(CookieJar, String)` - Jar carrying the session cookie and the
///   session id
#[cfg(feature = "web")]
pub fn resolve_session(store: &SessionStore, jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if store.state(cookie.value()).is_some() {
            let session_id = cookie.value().to_string();
            return (jar, session_id);
        }
    }

    let session_id = store.open();
    let cookie = Cookie::build((SESSION_COOKIE, session_id.clone()))
        .path("/")
        .http_only(true)
        .build();
    (jar.add(cookie), session_id)
}

/// Handle a submitted password
///
/// Records `Unlocked` or `Locked` for the session and sends the browser back
/// to the dashboard, which shows either the map or the gate with an error.
/// The entered value is dropped once compared.
#[cfg(feature = "web")]
pub async fn handle_unlock(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<UnlockForm>,
) -> Response {
    let (jar, session_id) = resolve_session(&state.sessions, jar);
    let outcome = state.gate.check(&form.password);
    drop(form);

    match outcome {
        GateState::Unlocked => log::info!("session unlocked"),
        _ => log::warn!("incorrect password submitted"),
    }
    state.sessions.record(&session_id, outcome);

    (jar, Redirect::to("/")).into_response()
}

/// Handle session end
///
/// Forgets the gate flag and clears the cookie, so the next visit prompts
/// again.
#[cfg(feature = "web")]
pub async fn handle_logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.end(cookie.value());
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    (jar, Redirect::to("/")).into_response()
}
