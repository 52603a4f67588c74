//! Session resolution.
//!
//! [`SessionReader`] is safe in any context and only ever observes;
//! [`SessionWriter`] can mint a session and is only constructible where the
//! transport allows outbound writes. Passing the right one into a component
//! makes the read/write distinction a compile-time property.

use std::sync::Arc;

use jiff::Timestamp;
use uuid::Uuid;

use crate::{
    sessions::{
        errors::SessionError,
        store::{
            CREATED_AT_COOKIE, CookieOptions, GUEST_SESSION_COOKIE, LAST_ACTIVE_COOKIE,
            SessionStore,
        },
    },
    uuids::TypedUuid,
};

/// Guest session UUID
pub type GuestSessionUuid = TypedUuid<GuestSession>;

/// A resolved guest session.
///
/// The timestamps live in companion cookies and may be absent for tokens
/// issued before they were introduced; a missing or malformed value degrades
/// to `None` rather than invalidating the session.
#[derive(Debug, Clone)]
pub struct GuestSession {
    pub uuid: GuestSessionUuid,
    pub created_at: Option<Timestamp>,
    pub last_active_at: Option<Timestamp>,
}

/// Read-only session access.
#[derive(Clone)]
pub struct SessionReader {
    store: Arc<dyn SessionStore>,
}

impl SessionReader {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// The caller's session token, if one exists. Malformed tokens are
    /// treated as absent.
    #[must_use]
    pub fn current(&self) -> Option<GuestSessionUuid> {
        let raw = self.store.get(GUEST_SESSION_COOKIE)?;

        Uuid::try_parse(&raw).ok().map(GuestSessionUuid::from_uuid)
    }

    /// The caller's session with its lifecycle timestamps.
    #[must_use]
    pub fn session(&self) -> Option<GuestSession> {
        let uuid = self.current()?;

        Some(GuestSession {
            uuid,
            created_at: self.timestamp(CREATED_AT_COOKIE),
            last_active_at: self.timestamp(LAST_ACTIVE_COOKIE),
        })
    }

    fn timestamp(&self, key: &str) -> Option<Timestamp> {
        self.store.get(key)?.parse().ok()
    }
}

/// Session access that may mint a new session.
#[derive(Clone)]
pub struct SessionWriter {
    store: Arc<dyn SessionStore>,
    options: CookieOptions,
}

impl SessionWriter {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, options: CookieOptions) -> Self {
        Self { store, options }
    }

    /// A reader over the same store.
    #[must_use]
    pub fn reader(&self) -> SessionReader {
        SessionReader::new(Arc::clone(&self.store))
    }

    /// Return the existing session, refreshing its last-active timestamp,
    /// or allocate and persist a new one.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::ReadOnlyContext`] when the store cannot
    /// accept writes; call sites that can hit this are wired incorrectly.
    pub fn resolve_or_create(&self) -> Result<GuestSessionUuid, SessionError> {
        let now = Timestamp::now();

        if let Some(existing) = self.reader().current() {
            self.store
                .set(LAST_ACTIVE_COOKIE, &now.to_string(), &self.options)?;

            return Ok(existing);
        }

        let uuid = GuestSessionUuid::new();

        self.store
            .set(GUEST_SESSION_COOKIE, &uuid.to_string(), &self.options)?;
        self.store
            .set(CREATED_AT_COOKIE, &now.to_string(), &self.options)?;
        self.store
            .set(LAST_ACTIVE_COOKIE, &now.to_string(), &self.options)?;

        Ok(uuid)
    }
}
