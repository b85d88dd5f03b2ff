//! Development identity bypass.
//!
//! Issues session tokens for the four seed staff accounts without a real
//! identity provider. Only `ServiceBuilder` constructs it, and only when the
//! configuration selects development identity outside production. It is
//! never chained with an external provider: a service has exactly one
//! `IdentityProvider`.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};

use volunteerflow_contracts::{
    error::{FlowError, FlowResult},
    user::{Credentials, Identity, User},
};
use volunteerflow_core::traits::IdentityProvider;

use crate::{config::MAX_SESSION_TTL_SECS, seed};

#[derive(Debug, Clone)]
struct DevSession {
    subject: String,
    email: Option<String>,
    expires_at: DateTime<Utc>,
}

/// The result of a successful development login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevLogin {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

pub struct DevIdentityProvider {
    users: Vec<User>,
    ttl: Duration,
    sessions: Mutex<HashMap<String, DevSession>>,
}

impl DevIdentityProvider {
    /// A provider for the seed staff accounts with sessions lasting
    /// `ttl_secs` (capped at `MAX_SESSION_TTL_SECS`).
    pub(crate) fn new(ttl_secs: u64) -> Self {
        let secs = ttl_secs.min(MAX_SESSION_TTL_SECS) as i64;
        Self {
            users: seed::staff_users(),
            ttl: Duration::seconds(secs),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The identities a developer may sign in as.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn login(&self, user_id: &str) -> FlowResult<DevLogin> {
        self.login_at(user_id, Utc::now())
    }

    /// End the session behind `credentials`. Returns whether one existed.
    pub fn logout(&self, credentials: Option<&Credentials>) -> FlowResult<bool> {
        let Some(credentials) = credentials else {
            return Ok(false);
        };
        let mut sessions = self.lock()?;
        Ok(sessions.remove(&credentials.0).is_some())
    }

    pub(crate) fn login_at(&self, user_id: &str, now: DateTime<Utc>) -> FlowResult<DevLogin> {
        let user = self
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| FlowError::ValidationFailed { reason: "Invalid user ID".to_string() })?;

        let token = format!("dev-{}", uuid::Uuid::new_v4());
        let expires_at = now + self.ttl;

        let mut sessions = self.lock()?;
        let before = sessions.len();
        sessions.retain(|_, session| now <= session.expires_at);
        if sessions.len() < before {
            debug!(dropped = before - sessions.len(), "expired development sessions dropped");
        }
        sessions.insert(token.clone(), DevSession { subject: user.id.clone(), email: user.email.clone(), expires_at });
        drop(sessions);

        info!(subject = %user.id, %expires_at, "development login");
        Ok(DevLogin { token, expires_at, user })
    }

    /// Resolve `credentials` as of `now`. Expired sessions are dropped.
    pub(crate) fn resolve_at(
        &self,
        credentials: Option<&Credentials>,
        now: DateTime<Utc>,
    ) -> FlowResult<Option<Identity>> {
        let Some(credentials) = credentials else {
            return Ok(None);
        };

        let mut sessions = self.lock()?;
        match sessions.get(&credentials.0) {
            Some(session) if now <= session.expires_at => Ok(Some(Identity {
                subject: session.subject.clone(),
                email: session.email.clone(),
            })),
            Some(_) => {
                debug!("development session expired");
                sessions.remove(&credentials.0);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn lock(&self) -> FlowResult<std::sync::MutexGuard<'_, HashMap<String, DevSession>>> {
        self.sessions.lock().map_err(|e| FlowError::Collaborator {
            reason: format!("development session lock poisoned: {}", e),
        })
    }
}

impl IdentityProvider for DevIdentityProvider {
    fn resolve(&self, credentials: Option<&Credentials>) -> FlowResult<Option<Identity>> {
        self.resolve_at(credentials, Utc::now())
    }
}
