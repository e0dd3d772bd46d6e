//! # Hosted backend client — auth API and row API over HTTP
//!
//! [`HostedClient`] is the production implementation of the [`SessionStore`] and
//! [`RecordStore`] contracts. It speaks the Supabase-compatible REST dialect:
//!
//! | Concern | Endpoint |
//! |---------|----------|
//! | Password sign-in | `POST /auth/v1/token?grant_type=password` |
//! | Token refresh | `POST /auth/v1/token?grant_type=refresh_token` |
//! | Sign-up | `POST /auth/v1/signup` |
//! | Sign-out | `POST /auth/v1/logout` |
//! | Rows | `/rest/v1/{table}` (see [`rest`]) |
//!
//! ## Session cache
//!
//! The client keeps the current [`Session`] in memory (and, in the browser, in
//! `localStorage` via [`persist`]) so `get_session` is usually answered without a
//! network round trip. A session that expires within [`REFRESH_MARGIN_SECS`] is
//! refreshed first, both in `get_session` and before every row request; if that
//! fails the cache is cleared and `SignedOut` is announced.
//!
//! ## Change stream
//!
//! Every transition of the cache is announced on a [`ChangeFeed`]: `SignedIn` after
//! password sign-in or a sign-up that opened a session, `TokenRefreshed` after a
//! refresh, `SignedOut` after sign-out (whether or not the logout request itself
//! succeeded) or a failed refresh.

mod persist;
mod rest;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use store::{
    AuthError, AuthEvent, ChangeFeed, Row, Session, SessionChanges, SessionStore, SignUp, User,
};

use crate::config::BackendConfig;
use crate::error::ApiError;

/// Sessions closer than this to expiry are refreshed before being handed out.
pub const REFRESH_MARGIN_SECS: i64 = 30;

/// HTTP client for the hosted auth and row APIs.
#[derive(Clone, Debug)]
pub struct HostedClient {
    config: BackendConfig,
    http: Client,
    session: Arc<Mutex<Option<Session>>>,
    feed: ChangeFeed,
}

impl PartialEq for HostedClient {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config && Arc::ptr_eq(&self.session, &other.session)
    }
}

/// Sign-up answers with a full session when accounts are auto-confirmed and with
/// the bare user when email confirmation is pending.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(Session),
    User(User),
}

impl HostedClient {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            http: Client::new(),
            session: Arc::new(Mutex::new(persist::load())),
            feed: ChangeFeed::new(),
        }
    }

    fn cache(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached_session(&self) -> Option<Session> {
        self.cache().clone()
    }

    fn store_session(&self, session: Option<Session>) {
        persist::save(session.as_ref());
        *self.cache() = session;
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.url)
    }

    /// The cached session, refreshed first when it is about to expire. A failed
    /// refresh signs the client out, unless a concurrent caller already
    /// replaced the session.
    async fn current_session(&self) -> Option<Session> {
        let session = self.cached_session()?;
        let now = chrono::Utc::now().timestamp();
        if !session.expires_within(now, REFRESH_MARGIN_SECS) {
            return Some(session);
        }
        match self.refresh(&session.refresh_token).await {
            Ok(fresh) => {
                tracing::info!("session refreshed");
                self.store_session(Some(fresh.clone()));
                self.feed.emit(AuthEvent::TokenRefreshed, Some(fresh.clone()));
                Some(fresh)
            }
            Err(e) => {
                let current = self.cached_session();
                if current.as_ref().map(|s| s.refresh_token.as_str())
                    != Some(session.refresh_token.as_str())
                {
                    return current;
                }
                tracing::warn!("Session refresh failed, treating as signed out: {e}");
                self.store_session(None);
                self.feed.emit(AuthEvent::SignedOut, None);
                None
            }
        }
    }

    /// Attach the project key and the caller's identity. Without a session the
    /// anon key doubles as bearer token, which is what row policies expect for
    /// anonymous requests.
    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .current_session()
            .await
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.config.anon_key.clone());
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::rejected(status.as_u16(), &body))
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(request).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn token_grant(&self, grant_type: &str, body: serde_json::Value) -> Result<Session, ApiError> {
        tracing::debug!(grant_type, "requesting token");
        let request = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.config.anon_key)
            .json(&body);
        Self::send_json(request).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, ApiError> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let token = self
            .cached_session()
            .map(|s| s.access_token)
            .ok_or(ApiError::NoSession)?;
        let request = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token);
        Self::send(request).await?;
        Ok(())
    }
}

impl SessionStore for HostedClient {
    async fn get_session(&self) -> Option<Session> {
        self.current_session().await
    }

    fn subscribe(&self) -> SessionChanges {
        self.feed.subscribe()
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self
            .token_grant("password", json!({ "email": email, "password": password }))
            .await?;
        tracing::info!(user_id = %session.user.id, "signed in");
        self.store_session(Some(session.clone()));
        self.feed.emit(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str, metadata: Row) -> Result<SignUp, AuthError> {
        let request = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password, "data": metadata }));
        let response: SignUpResponse = Self::send_json(request).await?;
        match response {
            SignUpResponse::Session(session) => {
                tracing::info!(user_id = %session.user.id, "account created and signed in");
                self.store_session(Some(session.clone()));
                self.feed.emit(AuthEvent::SignedIn, Some(session.clone()));
                Ok(SignUp {
                    user: Some(session.user.clone()),
                    session: Some(session),
                })
            }
            SignUpResponse::User(user) => {
                tracing::info!(user_id = %user.id, "account created, confirmation pending");
                Ok(SignUp {
                    user: Some(user),
                    session: None,
                })
            }
        }
    }

    async fn sign_out(&self) {
        if let Err(e) = self.logout().await {
            tracing::warn!("Logout request failed, clearing local session anyway: {e}");
        }
        self.store_session(None);
        tracing::info!("signed out");
        self.feed.emit(AuthEvent::SignedOut, None);
    }
}
