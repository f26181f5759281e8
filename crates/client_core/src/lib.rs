use std::sync::{Arc, Mutex, MutexGuard};

use shared::{
    domain::{CourseId, CourseSummary, User, UserType},
    protocol::{AuthResponse, LoginRequest, RegisterRequest},
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub mod error;
pub mod token_store;
pub mod transport;
pub mod types;

pub use error::{SessionError, TokenStoreError, TransportError};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use transport::{HttpPortalApi, PortalApi};
pub use types::{DashboardData, SessionEvent, SessionSnapshot, View};

pub const LOGIN_FAILED_MESSAGE: &str = "Erro ao fazer login";
pub const REGISTER_FAILED_MESSAGE: &str = "Erro ao registrar";
pub const CONNECTION_FAILED_MESSAGE: &str = "Erro de conexão. Tente novamente.";

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
    active_view: View,
    courses: Vec<CourseSummary>,
    dashboard: DashboardData,
    pending_request: bool,
    last_error: Option<String>,
    /// Bumped by logout and by every accepted login/register. Responses
    /// captured under an older value are dropped.
    generation: u64,
}

/// Owns the session (token, user), the active view and the catalog.
///
/// State is only mutated through the operations below; the view layer reads
/// it through [`SessionController::snapshot`] and [`SessionController::subscribe`].
/// The lock is never held across a network call.
pub struct SessionController {
    api: Arc<dyn PortalApi>,
    tokens: Arc<dyn TokenStore>,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

/// Clears the pending flag when a login/register attempt ends, including
/// when the caller drops the future mid-request.
struct PendingRequest<'a> {
    controller: &'a SessionController,
    generation: u64,
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        self.controller.state().pending_request = false;
        self.controller.emit(SessionEvent::PendingChanged(false));
    }
}

impl SessionController {
    pub fn new(api: Arc<dyn PortalApi>, tokens: Arc<dyn TokenStore>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            tokens,
            inner: Mutex::new(SessionState::default()),
            events,
        })
    }

    /// Silent re-authentication from the persisted token plus the catalog
    /// preload. The two reads run concurrently and never surface an error.
    pub async fn bootstrap(&self) {
        let generation = self.state().generation;
        let token = match self.tokens.load() {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "session: token store unreadable; starting signed out");
                if let Err(err) = self.tokens.clear() {
                    warn!(error = %err, "session: failed to reset token store");
                }
                None
            }
        };

        let restore = async {
            if let Some(token) = token {
                self.restore_session(generation, token).await;
            }
        };
        let (_, courses) = tokio::join!(restore, self.refresh_courses());
        if courses.is_err() {
            debug!("bootstrap: catalog left empty");
        }
    }

    async fn restore_session(&self, generation: u64, token: String) {
        let outcome = self.api.current_user(&token).await;
        let mut state = self.state();
        if state.generation != generation {
            debug!("session: ignoring stale verification result");
            return;
        }

        match outcome {
            Ok(user) => {
                info!(user_id = %user.id, user_type = %user.user_type, "session: restored persisted session");
                state.token = Some(token);
                state.user = Some(user.clone());
                drop(state);
                self.emit(SessionEvent::UserChanged(Some(user)));
            }
            Err(err) => {
                warn!(error = %err, "session: persisted token rejected; discarding");
                self.discard_token(&mut state);
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let pending = self.begin_request()?;
        let outcome = self.api.login(&request).await;
        self.finish_auth(pending.generation, outcome, LOGIN_FAILED_MESSAGE)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        user_type: UserType,
    ) -> Result<User, SessionError> {
        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            user_type,
        };
        let pending = self.begin_request()?;
        let outcome = self.api.register(&request).await;
        self.finish_auth(pending.generation, outcome, REGISTER_FAILED_MESSAGE)
    }

    fn begin_request(&self) -> Result<PendingRequest<'_>, SessionError> {
        let generation = {
            let mut state = self.state();
            if state.pending_request {
                debug!("session: rejecting auth request while another is in flight");
                return Err(SessionError::RequestInFlight);
            }
            state.pending_request = true;
            state.last_error = None;
            state.generation += 1;
            state.generation
        };
        self.emit(SessionEvent::PendingChanged(true));
        Ok(PendingRequest {
            controller: self,
            generation,
        })
    }

    fn finish_auth(
        &self,
        generation: u64,
        outcome: Result<AuthResponse, TransportError>,
        rejected_fallback: &str,
    ) -> Result<User, SessionError> {
        let mut state = self.state();
        if state.generation != generation {
            debug!("session: dropping auth response for a superseded session");
            return Err(SessionError::Superseded);
        }

        match outcome {
            Ok(AuthResponse { token, user, .. }) => {
                if let Err(err) = self.tokens.save(&token) {
                    warn!(error = %err, "session: failed to persist token; session ends with this process");
                }
                info!(user_id = %user.id, user_type = %user.user_type, "session: signed in");
                state.token = Some(token);
                state.user = Some(user.clone());
                state.dashboard = DashboardData::NotLoaded;
                state.active_view = View::Dashboard;
                drop(state);
                self.emit(SessionEvent::UserChanged(Some(user.clone())));
                self.emit(SessionEvent::ViewChanged(View::Dashboard));
                Ok(user)
            }
            Err(err) => {
                let message = err.user_message(rejected_fallback);
                warn!(error = %err, status = ?err.status(), "session: authentication failed");
                state.last_error = Some(message.clone());
                drop(state);
                self.emit(SessionEvent::Error(message));
                Err(err.into())
            }
        }
    }

    pub fn logout(&self) {
        let had_user = {
            let mut state = self.state();
            state.generation += 1;
            self.discard_token(&mut state);
            state.dashboard = DashboardData::NotLoaded;
            state.active_view = View::Home;
            state.user.take().is_some()
        };
        info!(had_user, "session: signed out");
        self.emit(SessionEvent::UserChanged(None));
        self.emit(SessionEvent::ViewChanged(View::Home));
    }

    /// Unconditional; rendering a dashboard without a user shows nothing.
    pub fn navigate(&self, view: View) {
        self.state().active_view = view;
        debug!(view = %view, "session: navigated");
        self.emit(SessionEvent::ViewChanged(view));
    }

    /// Replaces the catalog on success; on failure the current list is kept
    /// (empty before the first successful load) and the error is only logged.
    pub async fn refresh_courses(&self) -> Result<usize, TransportError> {
        let courses = self
            .api
            .list_courses()
            .await
            .inspect_err(|err| warn!(error = %err, "catalog: failed to load courses"))?;
        let count = courses.len();
        self.state().courses = courses;
        debug!(count, "catalog: courses loaded");
        self.emit(SessionEvent::CoursesLoaded { count });
        Ok(count)
    }

    pub async fn course_detail(&self, course_id: &CourseId) -> Result<CourseSummary, SessionError> {
        let course = self.api.course(course_id).await.inspect_err(|err| {
            warn!(course_id = %course_id, error = %err, "catalog: failed to load course")
        })?;
        Ok(course)
    }

    /// Loads the role-specific dashboard extras for the signed-in user.
    pub async fn load_dashboard(&self) -> Result<(), SessionError> {
        let (generation, user_type, token) = {
            let state = self.state();
            (
                state.generation,
                state.user.as_ref().map(|user| user.user_type),
                state.token.clone(),
            )
        };
        let (Some(user_type), Some(token)) = (user_type, token) else {
            return Err(SessionError::NotAuthenticated);
        };

        let data = match user_type {
            UserType::Admin => self.api.admin_stats(&token).await.map(DashboardData::Admin),
            UserType::Instructor => self
                .api
                .instructor_courses(&token)
                .await
                .map(DashboardData::Instructor),
            UserType::Student => Ok(DashboardData::Student),
        }
        .inspect_err(|err| warn!(error = %err, user_type = %user_type, "dashboard: failed to load"))?;

        {
            let mut state = self.state();
            if state.generation != generation {
                debug!("dashboard: session changed while loading; discarding");
                return Err(SessionError::Superseded);
            }
            state.dashboard = data;
        }
        self.emit(SessionEvent::DashboardLoaded);
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        SessionSnapshot {
            user: state.user.clone(),
            active_view: state.active_view,
            courses: state.courses.clone(),
            dashboard: state.dashboard.clone(),
            pending_request: state.pending_request,
            last_error: state.last_error.clone(),
            has_token: state.token.is_some(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn discard_token(&self, state: &mut SessionState) {
        state.token = None;
        if let Err(err) = self.tokens.clear() {
            warn!(error = %err, "session: failed to delete persisted token");
        }
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
