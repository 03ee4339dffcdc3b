//! Server-side session table and the per-request session context.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use tokio::sync::watch;
use tracing::{info, warn};

use super::provider::{AdminProfile, AuthError, AuthProvider, Identity};
use crate::constants::{FALLBACK_ADMIN_EMAIL, FALLBACK_ADMIN_NAME, SESSION_MAX_AGE_SECS};

/// Generate a cryptographically secure random session token.
pub fn generate_session_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// The signed-in identity as a page sees it.
#[async_trait]
pub trait SessionContext: Send + Sync {
    /// The identity behind this session, or `None` once signed out.
    fn current_identity(&self) -> Option<Identity>;

    /// Watch the identity; the value becomes `None` on sign-out.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;

    /// End the session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Name and email shown in the dashboard header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellUser {
    pub name: String,
    pub email: String,
}

impl ShellUser {
    /// Profile full name, then identity display name, then a fixed fallback.
    #[must_use]
    pub fn resolve(identity: &Identity, profile: Option<&AdminProfile>) -> Self {
        let name = profile
            .and_then(|p| p.full_name.as_deref())
            .or(identity.display_name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_ADMIN_NAME);
        let email = identity
            .email
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(FALLBACK_ADMIN_EMAIL);
        Self {
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

struct SessionEntry {
    identity: Identity,
    profile: Option<AdminProfile>,
    expires_at: DateTime<Utc>,
    signal: watch::Sender<Option<Identity>>,
}

/// In-memory session table keyed by opaque token.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    provider: Arc<dyn AuthProvider>,
    max_age: Duration,
}

impl SessionStore {
    #[must_use]
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            provider,
            max_age: Duration::seconds(SESSION_MAX_AGE_SECS),
        }
    }

    #[must_use]
    pub fn provider(&self) -> &Arc<dyn AuthProvider> {
        &self.provider
    }

    /// Verify credentials with the provider and open a session.
    ///
    /// A failed profile lookup does not fail the sign-in; the header then
    /// falls back to the identity's own name.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the credentials are rejected.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<BrowserSession, AuthError> {
        let identity = self.provider.sign_in(email, password).await?;

        let profile = match self.provider.profile(&identity).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(uid = %identity.uid, error = %e, "Failed to load admin profile");
                None
            }
        };

        let token = generate_session_token();
        let (signal, _) = watch::channel(Some(identity.clone()));
        let entry = SessionEntry {
            identity,
            profile,
            expires_at: Utc::now() + self.max_age,
            signal,
        };

        info!(uid = %entry.identity.uid, "Admin signed in");
        self.write().insert(token.clone(), entry);

        Ok(BrowserSession {
            token,
            store: self.clone(),
        })
    }

    /// Look up a live session by token. Expired sessions are removed.
    #[must_use]
    pub fn open(&self, token: &str) -> Option<BrowserSession> {
        let expired = {
            let sessions = self.read();
            let entry = sessions.get(token)?;
            entry.expires_at <= Utc::now()
        };
        if expired {
            self.remove(token);
            return None;
        }
        Some(BrowserSession {
            token: token.to_string(),
            store: self.clone(),
        })
    }

    /// Drop every expired session, waking its subscribers. Returns how many
    /// were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, entry| {
            let live = entry.expires_at > now;
            if !live {
                entry.signal.send_replace(None);
            }
            live
        });
        before - sessions.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn remove(&self, token: &str) -> Option<SessionEntry> {
        let entry = self.write().remove(token)?;
        entry.signal.send_replace(None);
        Some(entry)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, SessionEntry>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, SessionEntry>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn expire(&self, token: &str) {
        if let Some(entry) = self.write().get_mut(token) {
            entry.expires_at = Utc::now() - Duration::seconds(1);
        }
    }
}

/// Session context bound to one browser's token.
#[derive(Clone)]
pub struct BrowserSession {
    token: String,
    store: SessionStore,
}

impl BrowserSession {
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Header identity for the layout, `None` once signed out.
    #[must_use]
    pub fn shell_user(&self) -> Option<ShellUser> {
        let sessions = self.store.read();
        let entry = sessions.get(&self.token)?;
        Some(ShellUser::resolve(&entry.identity, entry.profile.as_ref()))
    }

    /// Whether this was the last open session.
    #[must_use]
    pub fn store_is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl std::fmt::Debug for BrowserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserSession").finish_non_exhaustive()
    }
}

#[async_trait]
impl SessionContext for BrowserSession {
    fn current_identity(&self) -> Option<Identity> {
        self.store
            .read()
            .get(&self.token)
            .map(|e| e.identity.clone())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.store.read().get(&self.token).map_or_else(
            || watch::channel(None).1,
            |e| e.signal.subscribe(),
        )
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(entry) = self.store.remove(&self.token) else {
            return Ok(());
        };
        info!(uid = %entry.identity.uid, "Admin signed out");
        self.store.provider.sign_out(&entry.identity).await
    }
}
