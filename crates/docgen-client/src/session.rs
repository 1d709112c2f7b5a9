//! Session lifecycle.
//!
//! [`SessionHandle`] is the shared cell holding the token and the current
//! [`AuthState`]; the HTTP client reads the token from it and clears it on 401.
//! [`SessionStore`] drives the state machine on top of it:
//!
//! ```text
//! Unknown -> Loading -> Authenticated
//!                   \-> Anonymous
//! ```
//!
//! The token is only ever persisted together with an authenticated user and
//! removed together with it. After [`SessionStore::dispose`] the state is
//! frozen and every subscriber sees its channel closed.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::api::auth::{AuthService, ChangePasswordRequest, ProfileUpdate, RegisterRequest};
use crate::error::{ApiError, Result};
use crate::http::ApiClient;
use crate::models::{Principal, Role, Session, User};
use crate::storage::{lock, StateStore, AUTH_TOKEN_KEY};
use crate::validate;

/// Authentication state observed by views and the route guard.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Nothing checked yet.
    Unknown,
    /// A persisted token is being validated.
    Loading,
    Authenticated(Session),
    Anonymous,
}

impl AuthState {
    /// Not yet settled; views should wait rather than redirect.
    pub fn is_pending(&self) -> bool {
        matches!(self, AuthState::Unknown | AuthState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(session) => Some(&session.user),
            _ => None,
        }
    }

    pub fn principal(&self) -> Principal {
        Principal::from_user(self.user())
    }
}

struct Shared {
    store: Arc<dyn StateStore>,
    /// `None` once closed.
    publisher: Mutex<Option<watch::Sender<AuthState>>>,
    state: watch::Receiver<AuthState>,
}

/// Shared token + state cell. Clones refer to the same session.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Shared>,
}

impl SessionHandle {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        let (publisher, state) = watch::channel(AuthState::Unknown);
        Self {
            inner: Arc::new(Shared {
                store,
                publisher: Mutex::new(Some(publisher)),
                state,
            }),
        }
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.inner.store
    }

    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Receiver of state changes. Already closed when the handle is.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        match &*lock(&self.inner.publisher) {
            Some(publisher) => publisher.subscribe(),
            None => {
                let mut closed = self.inner.state.clone();
                let _ = closed.borrow_and_update();
                closed
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner.publisher).is_none()
    }

    /// Publish `state`, returning the previous one. Ignored once closed.
    fn publish(&self, state: AuthState) -> Option<AuthState> {
        match &*lock(&self.inner.publisher) {
            Some(publisher) => Some(publisher.send_replace(state)),
            None => {
                tracing::debug!("Session closed, state change ignored");
                None
            }
        }
    }

    /// Freeze the current state and release every subscriber.
    pub(crate) fn close(&self) {
        if lock(&self.inner.publisher).take().is_some() {
            tracing::debug!("Session channel closed");
        }
    }

    /// Token to send: the live session's, or the persisted one while validating.
    pub fn token(&self) -> Option<String> {
        if let AuthState::Authenticated(session) = &*self.inner.state.borrow() {
            return Some(session.token.clone());
        }
        self.stored_token()
    }

    pub(crate) fn stored_token(&self) -> Option<String> {
        match self.inner.store.get(AUTH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted token");
                None
            }
        }
    }

    pub(crate) fn set_state(&self, state: AuthState) {
        self.publish(state);
    }

    /// Persist the token, then publish the session. Nothing changes if persisting fails.
    pub(crate) fn establish(&self, session: Session) -> Result<()> {
        self.inner.store.set(AUTH_TOKEN_KEY, &session.token)?;
        tracing::info!(user_id = %session.user.id, role = %session.user.role, "Session established");
        self.set_state(AuthState::Authenticated(session));
        Ok(())
    }

    /// Replace the user of the live session, keeping its token.
    pub(crate) fn replace_user(&self, user: User) {
        if let Some(publisher) = &*lock(&self.inner.publisher) {
            publisher.send_if_modified(|state| match state {
                AuthState::Authenticated(session) => {
                    session.user = user;
                    true
                }
                _ => false,
            });
        }
    }

    /// Drop token and user and become anonymous.
    pub fn clear(&self) {
        if let Err(e) = self.inner.store.remove(AUTH_TOKEN_KEY) {
            tracing::warn!(error = %e, "Failed to remove persisted token");
        }
        let previous = self.publish(AuthState::Anonymous);
        if previous.is_some_and(|state| state.is_authenticated()) {
            tracing::info!("Session cleared");
        }
    }
}

/// Session state machine plus the auth operations that feed it.
pub struct SessionStore {
    handle: SessionHandle,
    auth: AuthService,
    client: ApiClient,
    last_error: Mutex<Option<String>>,
}

impl SessionStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            handle: client.session().clone(),
            auth: AuthService::new(client.clone()),
            client,
            last_error: Mutex::new(None),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn state(&self) -> AuthState {
        self.handle.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.handle.subscribe()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state().user().cloned()
    }

    pub fn principal(&self) -> Principal {
        self.state().principal()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Listed permission, or the admin role.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.principal().has_permission(permission)
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.principal().has_role(role)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|e| e.clone())
    }

    pub fn clear_error(&self) {
        self.set_error(None);
    }

    fn set_error(&self, message: Option<String>) {
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = message;
        }
    }

    fn record<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.set_error(Some(e.user_message()));
        }
        result
    }

    /// Validate a persisted token, if any, by fetching the profile.
    pub async fn init(&self) -> AuthState {
        self.handle.set_state(AuthState::Loading);

        let Some(token) = self.handle.stored_token() else {
            tracing::debug!("No persisted token");
            self.handle.set_state(AuthState::Anonymous);
            return self.state();
        };

        match self.auth.profile().await {
            Ok(user) => {
                if let Err(e) = self.handle.establish(Session { token, user }) {
                    tracing::warn!(error = %e, "Could not persist validated session");
                    self.handle.clear();
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Persisted token rejected, continuing anonymously");
                self.handle.clear();
            }
        }
        self.state()
    }

    /// Password login. On failure the state is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.clear_error();
        let result = self.try_login(email, password).await;
        self.record(result)
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim().to_lowercase();
        validate::credentials(&email, password)?;

        let response = self.auth.login(&email, password).await.map_err(reject_as_auth_failure)?;
        let token = response.access_token().ok_or_else(|| {
            ApiError::Decode("login response did not include an access token".to_string())
        })?;
        let user = response.user;
        self.handle.establish(Session {
            token,
            user: user.clone(),
        })?;
        Ok(user)
    }

    /// Create an account and sign in with it.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        self.clear_error();
        let result = self.try_register(request).await;
        self.record(result)
    }

    async fn try_register(&self, request: &RegisterRequest) -> Result<User> {
        validate::registration(request)?;
        let response = self.auth.register(request).await.map_err(reject_as_auth_failure)?;
        let token = response.access_token().ok_or_else(|| {
            ApiError::Decode("register response did not include an access token".to_string())
        })?;
        let user = response.user;
        self.handle.establish(Session {
            token,
            user: user.clone(),
        })?;
        Ok(user)
    }

    /// Best-effort remote logout; local state is always cleared.
    pub async fn logout(&self) {
        if self.handle.token().is_some() {
            if let Err(e) = self.auth.logout().await {
                tracing::warn!(error = %e, "Remote logout failed, clearing local session anyway");
            }
        }
        self.handle.clear();
        self.clear_error();
        self.client.navigator().redirect_to_login();
    }

    /// Re-fetch the profile of the live session.
    pub async fn refresh(&self) -> Result<User> {
        let user = self.record(self.auth.profile().await)?;
        self.handle.replace_user(user.clone());
        Ok(user)
    }

    /// Exchange the current token for a fresh one.
    pub async fn refresh_token(&self) -> Result<()> {
        if !self.is_authenticated() {
            return Err(ApiError::SessionExpired);
        }
        let response = self.record(self.auth.refresh().await)?;
        let Some(token) = response.access_token() else {
            return Err(ApiError::Decode("refresh response did not include an access token".to_string()));
        };
        match self.state() {
            AuthState::Authenticated(session) => self.handle.establish(Session {
                token,
                user: session.user,
            }),
            _ => Err(ApiError::SessionExpired),
        }
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let user = self.record(self.auth.update_profile(update).await)?;
        self.handle.replace_user(user.clone());
        Ok(user)
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<()> {
        self.record(validate::new_password(&request.new_password))?;
        self.record(self.auth.change_password(request).await)
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        self.auth.request_password_reset(email).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        validate::new_password(new_password)?;
        self.auth.reset_password(token, new_password).await
    }

    pub async fn verify_email(&self, token: &str) -> Result<()> {
        self.auth.verify_email(token).await
    }

    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        self.auth.resend_verification(email).await
    }

    /// Release the store and close the state channel, waking every
    /// subscriber. Persisted state is left in place for the next run.
    pub fn dispose(self) {
        tracing::debug!(authenticated = self.is_authenticated(), "Session store disposed");
        self.handle.close();
    }
}

/// Server-side rejections of credentials become `AuthFailed`; transport
/// errors pass through unchanged.
fn reject_as_auth_failure(error: ApiError) -> ApiError {
    match error {
        ApiError::SessionExpired => ApiError::AuthFailed {
            reason: "Invalid email or password".to_string(),
        },
        ApiError::RequestFailed { message, .. } => ApiError::AuthFailed { reason: message },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn user(role: &str) -> User {
        serde_json::from_value(serde_json::json!({"id": "u1", "role": role})).unwrap()
    }

    #[test]
    fn test_establish_and_clear_move_token_with_user() {
        let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let handle = SessionHandle::new(store.clone());
        assert_eq!(handle.state(), AuthState::Unknown);

        handle
            .establish(Session {
                token: "t1".into(),
                user: user("sales"),
            })
            .unwrap();
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("t1"));
        assert_eq!(handle.token().as_deref(), Some("t1"));
        assert!(handle.state().is_authenticated());

        handle.clear();
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert_eq!(handle.state(), AuthState::Anonymous);
        assert_eq!(handle.token(), None);
    }

    struct FailingStore;

    impl StateStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(ApiError::Storage("read-only".into()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_establish_is_all_or_nothing() {
        let handle = SessionHandle::new(Arc::new(FailingStore));
        handle.set_state(AuthState::Anonymous);
        let result = handle.establish(Session {
            token: "t1".into(),
            user: user("admin"),
        });
        assert!(matches!(result, Err(ApiError::Storage(_))));
        assert_eq!(handle.state(), AuthState::Anonymous);
    }

    #[test]
    fn test_replace_user_ignored_when_anonymous() {
        let handle = SessionHandle::new(Arc::new(MemoryStore::new()));
        handle.set_state(AuthState::Anonymous);
        handle.replace_user(user("admin"));
        assert_eq!(handle.state(), AuthState::Anonymous);
    }

    #[tokio::test]
    async fn test_close_releases_subscribers_and_freezes_state() {
        let handle = SessionHandle::new(Arc::new(MemoryStore::new()));
        handle.set_state(AuthState::Loading);
        let mut early = handle.subscribe();

        handle.close();
        assert!(handle.is_closed());
        assert!(early.changed().await.is_err());

        handle.set_state(AuthState::Anonymous);
        assert_eq!(handle.state(), AuthState::Loading);

        let mut late = handle.subscribe();
        assert!(late.changed().await.is_err());
        assert_eq!(crate::guard::RouteGuard::settle(&mut late).await, AuthState::Anonymous);
    }

    #[test]
    fn test_pending_states() {
        assert!(AuthState::Unknown.is_pending());
        assert!(AuthState::Loading.is_pending());
        assert!(!AuthState::Anonymous.is_pending());
        assert_eq!(AuthState::Anonymous.principal(), Principal::Anonymous);
    }

    #[test]
    fn test_rejections_map_to_auth_failed() {
        let mapped = reject_as_auth_failure(ApiError::RequestFailed {
            status: reqwest::StatusCode::BAD_REQUEST,
            message: "Account is gedeactiveerd".into(),
        });
        assert!(matches!(mapped, ApiError::AuthFailed { reason } if reason == "Account is gedeactiveerd"));
        assert!(matches!(
            reject_as_auth_failure(ApiError::NetworkError("down".into())),
            ApiError::NetworkError(_)
        ));
    }
}
