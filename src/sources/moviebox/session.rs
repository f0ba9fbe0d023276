use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::RwLock;
use reqwest::{
    Url,
    cookie::{CookieStore, Jar},
    header::{HeaderMap, HeaderValue, SET_COOKIE},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::common::GatewayResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Uninitialized,
    Initializing,
    Ready,
}

struct SessionState {
    status: SessionStatus,
    cookies: Arc<Jar>,
    app_info: Option<Value>,
}

/// Cookie jar and app-info blob shared by every upstream call.
///
/// Bootstraps are serialized behind `gate`: callers that arrive while one is
/// in flight wait for it and then observe `Ready` instead of issuing their
/// own. A failed bootstrap leaves the store `Uninitialized` so the next caller
/// starts over.
pub struct SessionStore {
    state: RwLock<SessionState>,
    gate: tokio::sync::Mutex<()>,
    bootstraps: AtomicU64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SessionState {
                status: SessionStatus::Uninitialized,
                cookies: Arc::new(Jar::default()),
                app_info: None,
            }),
            gate: tokio::sync::Mutex::new(()),
            bootstraps: AtomicU64::new(0),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.state.read().status
    }

    pub fn app_info(&self) -> Option<Value> {
        self.state.read().app_info.clone()
    }

    /// Number of bootstrap attempts started, successful or not.
    pub fn bootstrap_attempts(&self) -> u64 {
        self.bootstraps.load(Ordering::Relaxed)
    }

    /// `Cookie` header for `url` built from the current jar.
    pub fn cookie_header(&self, url: &Url) -> Option<HeaderValue> {
        self.state.read().cookies.cookies(url)
    }

    /// Records every `Set-Cookie` in `headers` into the current jar.
    pub fn store_cookies(&self, headers: &HeaderMap, url: &Url) {
        let jar = self.state.read().cookies.clone();
        store_into(&jar, headers, url);
    }

    /// Runs `bootstrap` unless the session is already `Ready`. With `force`,
    /// bootstrap always runs and its jar and app info replace the current
    /// ones once it succeeds.
    ///
    /// `bootstrap` receives the fresh jar the new session will own and
    /// returns the app-info payload.
    pub async fn ensure_ready<F, Fut>(&self, force: bool, bootstrap: F) -> GatewayResult<()>
    where
        F: FnOnce(Arc<Jar>) -> Fut,
        Fut: Future<Output = GatewayResult<Value>>,
    {
        if !force && self.status() == SessionStatus::Ready {
            return Ok(());
        }

        let _gate = self.gate.lock().await;
        if !force && self.status() == SessionStatus::Ready {
            debug!("Session became ready while waiting for in-flight bootstrap");
            return Ok(());
        }

        // The current jar keeps serving in-flight calls until the new
        // session replaces it.
        let jar = Arc::new(Jar::default());
        self.state.write().status = SessionStatus::Initializing;
        let attempt = self.bootstraps.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Starting session bootstrap (attempt {})", attempt);

        // Reverts to Uninitialized if this future is dropped mid-bootstrap
        let mut guard = InitializingGuard {
            store: self,
            armed: true,
        };

        match bootstrap(jar.clone()).await {
            Ok(app_info) => {
                let mut state = self.state.write();
                state.status = SessionStatus::Ready;
                state.cookies = jar;
                state.app_info = Some(app_info);
                guard.armed = false;
                debug!("Session ready after attempt {}", attempt);
                Ok(())
            }
            Err(e) => {
                warn!("Session bootstrap failed (attempt {}): {}", attempt, e);
                Err(e)
            }
        }
    }
}

pub(crate) fn store_into(jar: &Jar, headers: &HeaderMap, url: &Url) {
    let mut set_cookies = headers.get_all(SET_COOKIE).iter().peekable();
    if set_cookies.peek().is_some() {
        jar.set_cookies(&mut set_cookies, url);
    }
}

struct InitializingGuard<'a> {
    store: &'a SessionStore,
    armed: bool,
}

impl Drop for InitializingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.store.state.write().status = SessionStatus::Uninitialized;
        }
    }
}
