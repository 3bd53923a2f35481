//! Firebase Authentication (email/password) over the Identity Toolkit REST API
//!
//! Holds the current session in memory, refreshes the short-lived id token
//! when it is about to expire, and hands the long-lived part of the session
//! to an optional persistence hook so the host can keep users signed in
//! across reloads.

use std::cell::RefCell;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use todo_core::domain::AuthUser;
use todo_core::repository::IdentityProvider;
use todo_core::session::{SessionBroadcaster, SessionListener, Subscription};
use todo_core::{PlatformError, PlatformResult};

use crate::config::FirebaseConfig;
use crate::error::{auth_error, FirebaseResult};
use crate::http::{endpoint, request_json};

/// Refresh this long before the id token actually expires
const REFRESH_MARGIN_SECS: i64 = 60;

/// The part of a session worth keeping across page loads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub uid: String,
    pub email: Option<String>,
    pub refresh_token: String,
}

/// Called with the session to keep, or `None` once it must be forgotten
pub type PersistHook = Box<dyn Fn(Option<&StoredSession>)>;

#[derive(Debug, Clone)]
struct Session {
    user: AuthUser,
    id_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl Session {
    fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }

    fn stored(&self) -> StoredSession {
        StoredSession {
            uid: self.user.uid.to_string(),
            email: self.user.email.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

fn expiry(now: DateTime<Utc>, expires_in: &str) -> DateTime<Utc> {
    // Tokens last an hour; a malformed value just forces an early refresh
    let secs = expires_in.trim().parse::<i64>().unwrap_or(0);
    now + Duration::seconds(secs)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

impl SignInResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        Session {
            user: AuthUser::new(self.local_id, self.email),
            expires_at: expiry(now, &self.expires_in),
            id_token: self.id_token,
            refresh_token: self.refresh_token,
        }
    }
}

/// The secure token endpoint answers in snake_case
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

impl RefreshResponse {
    fn into_session(self, email: Option<String>, now: DateTime<Utc>) -> Session {
        Session {
            user: AuthUser::new(self.user_id, email),
            expires_at: expiry(now, &self.expires_in),
            id_token: self.id_token,
            refresh_token: self.refresh_token,
        }
    }
}

pub struct FirebaseAuth {
    client: reqwest::Client,
    config: FirebaseConfig,
    session: RefCell<Option<Session>>,
    broadcaster: SessionBroadcaster,
    persist: RefCell<Option<PersistHook>>,
}

impl FirebaseAuth {
    pub fn new(config: FirebaseConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            session: RefCell::new(None),
            broadcaster: SessionBroadcaster::new(),
            persist: RefCell::new(None),
        }
    }

    /// Install the hook that stores or forgets the session
    pub fn on_persist(&self, hook: PersistHook) {
        *self.persist.borrow_mut() = Some(hook);
    }

    /// Determine the initial session.
    ///
    /// A stored session is exchanged for a fresh id token; if that fails the
    /// user starts signed out and the stored session is forgotten.
    pub async fn restore(&self, stored: Option<StoredSession>) {
        let Some(stored) = stored else {
            self.broadcaster.publish(None);
            return;
        };

        match self.refresh(&stored.refresh_token, stored.email.clone()).await {
            Ok(session) if session.user.uid.as_str() == stored.uid => {
                log::info!("Restored session for {}", stored.uid);
                self.establish(session);
            }
            Ok(_) => {
                log::warn!("Stored session belongs to another user; signing out");
                self.clear();
            }
            Err(err) => {
                log::warn!("Could not restore session: {err}");
                self.clear();
            }
        }
    }

    /// A valid id token for the current session, refreshing it if needed
    pub async fn id_token(&self) -> PlatformResult<Option<String>> {
        let Some(session) = self.session.borrow().clone() else {
            return Ok(None);
        };
        if !session.needs_refresh(Utc::now()) {
            return Ok(Some(session.id_token));
        }

        log::debug!("Refreshing id token for {}", session.user.uid);
        match self.refresh(&session.refresh_token, session.user.email.clone()).await {
            Ok(fresh) => {
                let token = fresh.id_token.clone();
                *self.session.borrow_mut() = Some(fresh.clone());
                self.persist(Some(&fresh.stored()));
                Ok(Some(token))
            }
            Err(PlatformError::NotAuthenticated) => {
                self.clear();
                Err(PlatformError::NotAuthenticated)
            }
            Err(err) => Err(err),
        }
    }

    fn persist(&self, stored: Option<&StoredSession>) {
        if let Some(hook) = self.persist.borrow().as_ref() {
            hook(stored);
        }
    }

    fn establish(&self, session: Session) -> AuthUser {
        let user = session.user.clone();
        self.persist(Some(&session.stored()));
        *self.session.borrow_mut() = Some(session);
        self.broadcaster.publish(Some(user.clone()));
        user
    }

    fn clear(&self) {
        self.session.borrow_mut().take();
        self.persist(None);
        self.broadcaster.publish(None);
    }

    fn accounts_url(&self, action: &str) -> String {
        let url = endpoint(&self.config.endpoints.identity_toolkit, &format!("accounts:{action}"));
        format!("{url}?key={}", self.config.api_key)
    }

    async fn password_call(&self, action: &str, email: &str, password: &str) -> FirebaseResult<Session> {
        let request = self.client.post(self.accounts_url(action)).json(&json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        }));
        let response: SignInResponse = request_json(request, auth_error).await?;
        Ok(response.into_session(Utc::now()))
    }

    async fn refresh(&self, refresh_token: &str, email: Option<String>) -> PlatformResult<Session> {
        let url = format!(
            "{}?key={}",
            endpoint(&self.config.endpoints.secure_token, "token"),
            self.config.api_key
        );
        let request = self.client.post(url).json(&json!({
            "grant_type": "refresh_token",
            "refresh_token": refresh_token,
        }));
        let response: RefreshResponse = request_json(request, auth_error).await?;
        Ok(response.into_session(email, Utc::now()))
    }
}

#[async_trait(?Send)]
impl IdentityProvider for FirebaseAuth {
    async fn create_account(&self, email: &str, password: &str) -> PlatformResult<AuthUser> {
        let session = self
            .password_call("signUp", email, password)
            .await
            .inspect_err(|e| log::warn!("Account creation failed: {e}"))?;
        log::info!("Created account {}", session.user.uid);
        Ok(self.establish(session))
    }

    async fn sign_in(&self, email: &str, password: &str) -> PlatformResult<AuthUser> {
        let session = self
            .password_call("signInWithPassword", email, password)
            .await
            .inspect_err(|e| log::warn!("Sign-in failed: {e}"))?;
        log::info!("Signed in {}", session.user.uid);
        Ok(self.establish(session))
    }

    async fn sign_out(&self) -> PlatformResult<()> {
        // Id tokens are stateless; forgetting them is all sign-out needs
        self.clear();
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.session.borrow().as_ref().map(|s| s.user.clone())
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        self.broadcaster.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn session_expiring_in(secs: i64) -> Session {
        Session {
            user: AuthUser::new("u1", Some("a@b.com".into())),
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc::now() + Duration::seconds(secs),
        }
    }

    #[test]
    fn test_sign_in_response_parses() {
        let raw = r#"{
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": "u1",
            "email": "a@b.com",
            "displayName": "",
            "idToken": "id-token",
            "registered": true,
            "refreshToken": "refresh-token",
            "expiresIn": "3600"
        }"#;
        let now = Utc::now();

        let session = serde_json::from_str::<SignInResponse>(raw)
            .unwrap()
            .into_session(now);

        assert_eq!(session.user, AuthUser::new("u1", Some("a@b.com".into())));
        assert_eq!(session.expires_at, now + Duration::seconds(3600));
        assert_eq!(session.stored().refresh_token, "refresh-token");
    }

    #[test]
    fn test_refresh_response_keeps_email() {
        let raw = r#"{
            "access_token": "id-token",
            "expires_in": "3600",
            "token_type": "Bearer",
            "refresh_token": "refresh-2",
            "id_token": "id-token",
            "user_id": "u1",
            "project_id": "42"
        }"#;

        let session = serde_json::from_str::<RefreshResponse>(raw)
            .unwrap()
            .into_session(Some("a@b.com".into()), Utc::now());

        assert_eq!(session.user.email.as_deref(), Some("a@b.com"));
        assert_eq!(session.refresh_token, "refresh-2");
    }

    #[test]
    fn test_refresh_margin() {
        assert!(!session_expiring_in(3600).needs_refresh(Utc::now()));
        assert!(session_expiring_in(30).needs_refresh(Utc::now()));
        assert!(session_expiring_in(-5).needs_refresh(Utc::now()));
    }

    #[test]
    fn test_malformed_expiry_forces_refresh() {
        let now = Utc::now();
        assert_eq!(expiry(now, "soon"), now);
    }

    #[tokio::test]
    async fn test_restore_without_stored_session_signs_out() {
        let auth = FirebaseAuth::new(FirebaseConfig::default());
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let _sub = auth.on_session_change(Box::new(move |user| {
            assert!(user.is_none());
            seen.set(seen.get() + 1);
        }));

        auth.restore(None).await;

        assert_eq!(calls.get(), 1);
        assert_eq!(auth.current_user(), None);
        assert_eq!(auth.id_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_out_forgets_session() {
        let auth = FirebaseAuth::new(FirebaseConfig::default());
        let forgotten = Rc::new(Cell::new(false));
        let flag = Rc::clone(&forgotten);
        auth.on_persist(Box::new(move |stored| flag.set(stored.is_none())));

        let user = auth.establish(session_expiring_in(3600));
        assert_eq!(auth.current_user(), Some(user));
        assert_eq!(auth.id_token().await.unwrap().as_deref(), Some("id"));

        auth.sign_out().await.unwrap();

        assert!(forgotten.get());
        assert_eq!(auth.current_user(), None);
    }
}
