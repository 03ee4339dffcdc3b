//! Identity provider seam.
//!
//! Sign-in, account creation, password reset and the admin profile record
//! all go through [`AuthProvider`]. [`IdentityToolkitProvider`] speaks the
//! Firebase Identity Toolkit and Realtime Database REST protocols.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::constants::{ADMIN_ROLE, USER_AGENT};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    EmailExists,
    #[error("{0}")]
    Rejected(String),
    #[error("auth provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// An authenticated account as reported by the provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// Provider token used to read and write the profile record.
    pub id_token: Option<String>,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("id_token", &self.id_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Admin profile record stored in the profile database under `users/{uid}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl AdminProfile {
    #[must_use]
    pub fn new_admin(identity: &Identity, full_name: &str) -> Self {
        Self {
            id: identity.uid.clone(),
            full_name: Some(full_name.to_string()),
            email: identity.email.clone(),
            role: Some(ADMIN_ROLE.to_string()),
        }
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Verify an email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Create a new account.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Ask the provider to email a password-reset link.
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// Read the profile record of an identity, if one exists.
    async fn profile(&self, identity: &Identity) -> Result<Option<AdminProfile>, AuthError>;

    /// Write the profile record of an identity.
    async fn save_profile(
        &self,
        identity: &Identity,
        profile: &AdminProfile,
    ) -> Result<(), AuthError>;

    /// End the provider side of a session. Token-based providers have
    /// nothing to revoke.
    async fn sign_out(&self, _identity: &Identity) -> Result<(), AuthError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

impl From<AccountResponse> for Identity {
    fn from(account: AccountResponse) -> Self {
        Self {
            uid: account.local_id,
            email: account.email,
            display_name: account.display_name.filter(|n| !n.is_empty()),
            id_token: account.id_token,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Identity Toolkit + Realtime Database client.
#[derive(Clone)]
pub struct IdentityToolkitProvider {
    http: reqwest::Client,
    auth_url: String,
    api_key: String,
    profile_db_url: String,
}

impl IdentityToolkitProvider {
    /// Create a provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            auth_url: config.auth_api_url.trim_end_matches('/').to_string(),
            api_key: config.auth_api_key.clone(),
            profile_db_url: config.profile_db_url.trim_end_matches('/').to_string(),
        })
    }

    fn account_url(&self, method: &str) -> String {
        format!(
            "{}/accounts:{method}?key={}",
            self.auth_url,
            urlencoding::encode(&self.api_key)
        )
    }

    fn profile_url(&self, identity: &Identity) -> String {
        let mut url = format!(
            "{}/users/{}.json",
            self.profile_db_url,
            urlencoding::encode(&identity.uid)
        );
        if let Some(token) = &identity.id_token {
            url.push_str("?auth=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }

    async fn account_call(&self, method: &str, body: Value) -> Result<Value, AuthError> {
        debug!(method, "Identity provider request");
        let response = self
            .http
            .post(self.account_url(method))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let code = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("provider returned {status}"));
            warn!(method, status = status.as_u16(), code = %code, "Identity provider rejected request");
            return Err(map_error_code(&code));
        }

        Ok(response.json().await?)
    }

    async fn account(&self, method: &str, body: Value) -> Result<Identity, AuthError> {
        let value = self.account_call(method, body).await?;
        serde_json::from_value::<AccountResponse>(value)
            .map(Identity::from)
            .map_err(|e| AuthError::Rejected(format!("unexpected provider response: {e}")))
    }
}

/// Map a provider error code such as `INVALID_PASSWORD` to an [`AuthError`].
///
/// Codes may carry a detail suffix (`WEAK_PASSWORD : Password should be...`).
fn map_error_code(code: &str) -> AuthError {
    let head = code.split(':').next().unwrap_or(code).trim();
    match head {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
            AuthError::InvalidCredentials
        }
        "EMAIL_EXISTS" => AuthError::EmailExists,
        "USER_DISABLED" => AuthError::Rejected("this account has been disabled".to_string()),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => {
            AuthError::Rejected("too many attempts, try again later".to_string())
        }
        _ => AuthError::Rejected(code.to_lowercase().replace('_', " ")),
    }
}

#[async_trait]
impl AuthProvider for IdentityToolkitProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.account(
            "signInWithPassword",
            json!({ "email": email, "password": password, "returnSecureToken": true }),
        )
        .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.account(
            "signUp",
            json!({ "email": email, "password": password, "returnSecureToken": true }),
        )
        .await
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        self.account_call(
            "sendOobCode",
            json!({ "requestType": "PASSWORD_RESET", "email": email }),
        )
        .await
        .map(drop)
    }

    async fn profile(&self, identity: &Identity) -> Result<Option<AdminProfile>, AuthError> {
        let response = self.http.get(self.profile_url(identity)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Rejected(format!(
                "profile lookup returned {status}"
            )));
        }
        match response.json::<Value>().await? {
            Value::Null => Ok(None),
            value => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| AuthError::Rejected(format!("malformed profile record: {e}"))),
        }
    }

    async fn save_profile(
        &self,
        identity: &Identity,
        profile: &AdminProfile,
    ) -> Result<(), AuthError> {
        let mut record = serde_json::to_value(profile)
            .map_err(|e| AuthError::Rejected(format!("cannot encode profile: {e}")))?;
        if let Value::Object(map) = &mut record {
            map.insert("createdAt".to_string(), json!({ ".sv": "timestamp" }));
        }

        let response = self
            .http
            .put(self.profile_url(identity))
            .json(&record)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Rejected(format!(
                "profile write returned {status}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert!(matches!(
            map_error_code("INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            map_error_code("EMAIL_NOT_FOUND"),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(map_error_code("EMAIL_EXISTS"), AuthError::EmailExists));

        let weak = map_error_code("WEAK_PASSWORD : Password should be at least 6 characters");
        assert!(matches!(weak, AuthError::Rejected(_)));
    }

    #[test]
    fn test_identity_debug_redacts_token() {
        let identity = Identity {
            uid: "u1".to_string(),
            email: None,
            display_name: None,
            id_token: Some("secret-token".to_string()),
        };
        let debug = format!("{identity:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_new_admin_profile_role() {
        let identity = Identity {
            uid: "u1".to_string(),
            email: Some("a@b.com".to_string()),
            display_name: None,
            id_token: None,
        };
        let profile = AdminProfile::new_admin(&identity, "Ada Admin");
        assert_eq!(profile.role.as_deref(), Some("SUPER_ADMIN"));
        assert_eq!(profile.email.as_deref(), Some("a@b.com"));

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["fullName"], "Ada Admin");
    }
}
