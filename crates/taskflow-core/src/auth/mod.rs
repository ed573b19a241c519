//! Auth context seam.
//!
//! Token management lives outside this crate; the repository only needs to
//! know who is signed in right now.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::models::UserId;
use crate::util::unix_millis_now;

/// Source of the currently authenticated user
pub trait AuthContext {
    /// The signed-in user, or `None` when signed out
    fn current_user_id(&self) -> Option<UserId>;
}

impl<T: AuthContext + ?Sized> AuthContext for Arc<T> {
    fn current_user_id(&self) -> Option<UserId> {
        (**self).current_user_id()
    }
}

/// Fixed identity, mainly for CLI use and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticAuth {
    user_id: Option<UserId>,
}

impl StaticAuth {
    #[must_use]
    pub fn signed_in(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    #[must_use]
    pub const fn signed_out() -> Self {
        Self { user_id: None }
    }
}

impl AuthContext for StaticAuth {
    fn current_user_id(&self) -> Option<UserId> {
        self.user_id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Option<String>,
}

/// A signed-in session handed over by the external auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    /// Expiry as Unix ms; `None` never expires
    pub expires_at: Option<i64>,
}

impl AuthSession {
    #[must_use]
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now_ms)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(unix_millis_now())
    }
}

/// Shared, switchable session holder.
///
/// Clones share the same slot, so signing out through one handle is seen by
/// every repository holding another.
#[derive(Debug, Clone, Default)]
pub struct SessionAuth {
    session: Arc<RwLock<Option<AuthSession>>>,
}

impl SessionAuth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, session: AuthSession) {
        tracing::info!("Signed in as {}", session.user.id);
        *self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    pub fn sign_out(&self) {
        let previous = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(session) = previous {
            tracing::info!("Signed out {}", session.user.id);
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<AuthSession> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuthContext for SessionAuth {
    fn current_user_id(&self) -> Option<UserId> {
        let session = self.session()?;
        if session.is_expired() {
            tracing::debug!("Session for {} has expired", session.user.id);
            return None;
        }
        Some(session.user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(user: &str, expires_at: Option<i64>) -> AuthSession {
        AuthSession {
            user: AuthUser {
                id: UserId::new(user),
                email: None,
            },
            expires_at,
        }
    }

    #[test]
    fn static_auth_reports_fixed_user() {
        assert_eq!(
            StaticAuth::signed_in("u1").current_user_id(),
            Some(UserId::new("u1"))
        );
        assert_eq!(StaticAuth::signed_out().current_user_id(), None);
    }

    #[test]
    fn session_auth_is_shared_between_clones() {
        let auth = SessionAuth::new();
        let other = auth.clone();
        auth.sign_in(session("u1", None));
        assert_eq!(other.current_user_id(), Some(UserId::new("u1")));
        other.sign_out();
        assert_eq!(auth.current_user_id(), None);
    }

    #[test]
    fn expired_session_reads_as_signed_out() {
        let auth = SessionAuth::new();
        auth.sign_in(session("u1", Some(1)));
        assert_eq!(auth.current_user_id(), None);
        assert!(auth.session().is_some());
    }

    #[test]
    fn expiry_boundary() {
        let session = session("u1", Some(100));
        assert!(!session.is_expired_at(99));
        assert!(session.is_expired_at(100));
    }
}
