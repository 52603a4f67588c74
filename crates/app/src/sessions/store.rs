//! Session store capability and the in-memory implementation.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;

use crate::sessions::errors::SessionStoreError;

/// Cookie carrying the opaque session token.
pub const GUEST_SESSION_COOKIE: &str = "guest_session_id";

/// Cookie carrying the session creation timestamp.
pub const CREATED_AT_COOKIE: &str = "guest_session_created_at";

/// Cookie carrying the last write-activity timestamp.
pub const LAST_ACTIVE_COOKIE: &str = "last_active";

/// Retention window enforced by the transport.
pub const SESSION_MAX_AGE_SECONDS: i64 = 60 * 60 * 24 * 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

/// Attributes a transport must apply when persisting a session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub max_age_seconds: i64,
}

impl CookieOptions {
    /// The attributes guest session cookies are issued with.
    #[must_use]
    pub const fn session_default(secure: bool) -> Self {
        Self {
            http_only: true,
            secure,
            same_site: SameSite::Lax,
            max_age_seconds: SESSION_MAX_AGE_SECONDS,
        }
    }
}

/// Transport-owned storage for session state.
///
/// HTTP embeddings back this with the response cookie jar; tests and workers
/// use [`InMemorySessionStore`]. The domain never touches a transport
/// mechanism directly.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Persist a value. A store living in a context that cannot emit
    /// outbound state fails with [`SessionStoreError::ReadOnly`].
    fn set(&self, key: &str, value: &str, options: &CookieOptions)
    -> Result<(), SessionStoreError>;
}

/// Session store for non-HTTP embeddings.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    values: Mutex<FxHashMap<String, String>>,
    read_only: bool,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that serves reads but rejects writes, mirroring a
    /// static-rendering context.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            values: Mutex::new(FxHashMap::default()),
            read_only: true,
        }
    }

    fn values(&self) -> MutexGuard<'_, FxHashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    fn set(
        &self,
        key: &str,
        value: &str,
        _options: &CookieOptions,
    ) -> Result<(), SessionStoreError> {
        if self.read_only {
            return Err(SessionStoreError::ReadOnly);
        }

        self.values().insert(key.to_string(), value.to_string());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let options = CookieOptions::session_default(true);

        assert!(options.http_only);
        assert!(options.secure);
        assert_eq!(options.same_site, SameSite::Lax);
        assert_eq!(options.max_age_seconds, 60 * 60 * 24 * 30);
    }

    #[test]
    fn in_memory_store_round_trips() {
        let store = InMemorySessionStore::new();
        let options = CookieOptions::session_default(false);

        store
            .set("key", "value", &options)
            .expect("write should succeed");

        assert_eq!(store.get("key").as_deref(), Some("value"));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn read_only_store_rejects_writes() {
        let store = InMemorySessionStore::read_only();
        let options = CookieOptions::session_default(false);

        let result = store.set("key", "value", &options);

        assert!(
            matches!(result, Err(SessionStoreError::ReadOnly)),
            "expected ReadOnly, got {result:?}"
        );
    }
}
