// Identity provider client (GoTrue-style REST endpoints).
//
// Sign-in returns only after the provider has handed back a confirmed
// session (token and user present); there is no optimistic redirect or
// retry-on-timer fallback. Every provider failure surfaces as an opaque
// `AuthFailure` message.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::{DashboardError, Result};

/// An authenticated user as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
}

/// A confirmed session: access token plus expiry bookkeeping.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Wire shape of the provider's token/signup responses.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    /// Seconds until the access token expires.
    expires_in: i64,
    user: User,
}

/// The provider reports errors under a few different field names depending
/// on the endpoint; take whichever is present.
#[derive(Debug, Deserialize, Default)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    fn into_message(self, fallback: &str) -> String {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Client for the identity provider. Holds the current session for the
/// lifetime of the app; route guarding itself is an upstream concern.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: Option<Session>,
}

impl AuthClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            session: None,
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    /// Sign in with email and password. The session is stored and returned
    /// only once the provider confirms it; callers transition exactly once
    /// after this resolves.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| DashboardError::AuthFailure(e.to_string()))?;

        let token: TokenResponse = Self::parse_or_fail(response, "sign-in rejected").await?;
        let session = Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
            user: token.user,
        };
        info!(user = %session.user.id, "signed in");
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Register a new user. `redirect_to` is where the provider sends the
    /// confirmation link.
    pub async fn sign_up(&self, email: &str, password: &str, redirect_to: &str) -> Result<User> {
        let response = self
            .http
            .post(self.auth_url("signup"))
            .query(&[("redirect_to", redirect_to)])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| DashboardError::AuthFailure(e.to_string()))?;

        Self::parse_or_fail(response, "sign-up rejected").await
    }

    /// The current confirmed session, if any. Expired sessions count as
    /// absent.
    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref().filter(|s| !s.is_expired())
    }

    /// The signed-in user, if a live session exists.
    pub fn current_user(&self) -> Option<&User> {
        self.current_session().map(|s| &s.user)
    }

    /// Update the signed-in user's email and/or password.
    pub async fn update_user(
        &mut self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<User> {
        let session = self
            .session
            .as_ref()
            .filter(|s| !s.is_expired())
            .ok_or_else(|| DashboardError::AuthFailure("no active session".to_string()))?;

        let mut body = serde_json::Map::new();
        if let Some(email) = email {
            body.insert("email".to_string(), json!(email));
        }
        if let Some(password) = password {
            body.insert("password".to_string(), json!(password));
        }

        let response = self
            .http
            .put(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DashboardError::AuthFailure(e.to_string()))?;

        let user: User = Self::parse_or_fail(response, "update rejected").await?;
        if let Some(session) = self.session.as_mut() {
            session.user = user.clone();
        }
        Ok(user)
    }

    /// End the session with the provider and drop it locally. The local
    /// session is dropped even if the provider call fails.
    pub async fn sign_out(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        self.http
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(|e| DashboardError::AuthFailure(e.to_string()))?;
        info!("signed out");
        Ok(())
    }

    /// Decode a success body, or turn an error body into `AuthFailure` with
    /// the provider's own message.
    async fn parse_or_fail<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| DashboardError::AuthFailure(e.to_string()))
        } else {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            Err(DashboardError::AuthFailure(
                body.into_message(&format!("{fallback} ({status})")),
            ))
        }
    }
}
