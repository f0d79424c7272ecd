//! Cookie-backed sessions and the identity extractors built on them.
//!
//! Every request passes through [`attach_session`], which resolves (or mints)
//! an opaque session id carried in an `HttpOnly` cookie. The session record
//! itself lives in an in-process table and holds at most two things: the
//! logged-in user id and a pending one-shot flash message.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use rand::{distributions::Alphanumeric, Rng};

use crate::auth::repo::User;
use crate::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE_NAME: &str = "rsessid";
const SESSION_ID_LEN: usize = 32;

/// One-shot, category-tagged message surfaced on the next rendered page.
#[derive(Debug, Clone)]
pub struct Flash {
    pub message: String,
    pub category: &'static str,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: "success",
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: "danger",
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: "info",
        }
    }

    /// Fallback category for notices that don't pick one.
    pub fn plain(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: "message",
        }
    }
}

#[derive(Debug, Clone, Default)]
struct SessionData {
    user_id: Option<i64>,
    flash: Option<Flash>,
}

/// In-process session table keyed by the opaque cookie value.
///
/// Sessions have no expiry; the table lives as long as the process.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl SessionStore {
    fn contains(&self, id: &str) -> bool {
        self.inner.read().unwrap().contains_key(id)
    }

    fn create(&self) -> String {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_ID_LEN)
            .map(char::from)
            .collect();
        self.inner
            .write()
            .unwrap()
            .insert(id.clone(), SessionData::default());
        id
    }

    fn user_id(&self, id: &str) -> Option<i64> {
        self.inner.read().unwrap().get(id).and_then(|d| d.user_id)
    }

    fn set_user_id(&self, id: &str, user_id: Option<i64>) {
        if let Some(data) = self.inner.write().unwrap().get_mut(id) {
            data.user_id = user_id;
        }
    }

    fn set_flash(&self, id: &str, flash: Flash) {
        if let Some(data) = self.inner.write().unwrap().get_mut(id) {
            data.flash = Some(flash);
        }
    }

    fn take_flash(&self, id: &str) -> Option<Flash> {
        self.inner
            .write()
            .unwrap()
            .get_mut(id)
            .and_then(|d| d.flash.take())
    }
}

#[derive(Debug, Clone)]
struct SessionId(String);

/// Resolves the session cookie to a live session, minting both on first
/// contact. The session id lands in request extensions for the extractors
/// below; the `Set-Cookie` header goes out with the response when the id is
/// newly minted.
pub async fn attach_session(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    let presented = jar
        .get(SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|id| state.sessions.contains(id));

    let (id, fresh) = match presented {
        Some(id) => (id, false),
        None => (state.sessions.create(), true),
    };

    req.extensions_mut().insert(SessionId(id.clone()));
    let mut res = next.run(req).await;

    if fresh {
        let cookie = Cookie::build((SESSION_COOKIE_NAME, id))
            .path("/")
            .http_only(true)
            .build();
        if let Ok(value) = cookie.to_string().parse() {
            res.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    res
}

/// Handle to the session bound to the current request.
pub struct Session {
    id: String,
    store: SessionStore,
}

impl Session {
    pub fn user_id(&self) -> Option<i64> {
        self.store.user_id(&self.id)
    }

    pub fn log_in(&self, user_id: i64) {
        self.store.set_user_id(&self.id, Some(user_id));
    }

    pub fn log_out(&self) {
        self.store.set_user_id(&self.id, None);
    }

    pub fn flash(&self, flash: Flash) {
        self.store.set_flash(&self.id, flash);
    }

    pub fn take_flash(&self) -> Option<Flash> {
        self.store.take_flash(&self.id)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionId(id) = parts
            .extensions
            .get::<SessionId>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "session middleware not installed",
                )
                    .into_response()
            })?;
        Ok(Session {
            id,
            store: state.sessions.clone(),
        })
    }
}

/// Who is making the request, as far as the session knows.
#[derive(Debug, Clone, Copy)]
pub enum Identity {
    Known(i64),
    Anonymous,
}

impl Identity {
    pub fn is_known(&self) -> bool {
        matches!(self, Identity::Known(_))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(match session.user_id() {
            Some(user_id) => Identity::Known(user_id),
            None => Identity::Anonymous,
        })
    }
}

/// Login guard: resolves the session to a full user row, or redirects to the
/// login page without invoking the handler.
pub struct RequireUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        let Some(user_id) = session.user_id() else {
            return Err(Redirect::to("/login").into_response());
        };
        match User::find_by_id(&state.db, user_id).await {
            Ok(Some(user)) => Ok(RequireUser(user)),
            Ok(None) => {
                // The bound user no longer exists; drop the stale binding.
                session.log_out();
                Err(Redirect::to("/login").into_response())
            }
            Err(e) => Err(AppError::from(e).into_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_unique() {
        let store = SessionStore::default();
        let a = store.create();
        let b = store.create();
        assert_ne!(a, b);
        assert_eq!(a.len(), SESSION_ID_LEN);
        assert!(store.contains(&a) && store.contains(&b));
    }

    #[test]
    fn login_and_logout_transition_the_session() {
        let store = SessionStore::default();
        let id = store.create();
        assert_eq!(store.user_id(&id), None);

        store.set_user_id(&id, Some(7));
        assert_eq!(store.user_id(&id), Some(7));

        store.set_user_id(&id, None);
        assert_eq!(store.user_id(&id), None);
    }

    #[test]
    fn flash_is_taken_exactly_once() {
        let store = SessionStore::default();
        let id = store.create();
        store.set_flash(&id, Flash::success("done"));

        let flash = store.take_flash(&id).unwrap();
        assert_eq!(flash.message, "done");
        assert_eq!(flash.category, "success");
        assert!(store.take_flash(&id).is_none());
    }

    #[test]
    fn unknown_session_id_holds_no_state() {
        let store = SessionStore::default();
        store.set_user_id("nope", Some(1));
        assert_eq!(store.user_id("nope"), None);
        assert!(store.take_flash("nope").is_none());
    }
}
