//! Session Storage
//!
//! Holds the credential and cached profile in memory and mirrors both to a
//! durable [`SettingsStore`].
//!
//! ## Consistency
//!
//! - Readers take a snapshot of token, profile and generation under one lock,
//!   so a logout is never observed half-applied.
//! - Writers are serialized by an async mutex. Storage writes happen before the
//!   in-memory commit on `set_*`, so a failed write never leaves memory ahead
//!   of storage.
//! - Teardown clears memory first and marks the entries as cleared. Lazy reads
//!   never rehydrate a cleared entry, so a failed erase cannot bring a
//!   rejected credential back. Only a new `set_*` or rotation lifts the mark.
//! - Every credential change bumps the generation. Gateways capture it when a
//!   request is built and pass it back to [`SessionStore::expire`] and
//!   [`SessionStore::rotate_token`]; a stale generation makes both no-ops.
//!
//! ## Example
//!
//! ```no_run
//! use core_session::{SessionStore, UserProfile};
//! use core_runtime::config::SessionKeys;
//! use std::sync::Arc;
//! # use bridge_traits::storage::SettingsStore;
//! # async fn example(storage: Arc<dyn SettingsStore>) -> core_session::Result<()> {
//! let session = SessionStore::load(storage, SessionKeys::default()).await?;
//!
//! session.set_token("abc123").await?;
//! session.set_user_info(UserProfile::new("alice").with_role("admin")).await?;
//! assert!(session.is_admin());
//!
//! session.logout().await?;
//! assert!(session.token().is_none());
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, SessionError};
use crate::types::UserProfile;
use bridge_traits::storage::SettingsStore;
use core_runtime::config::SessionKeys;
use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Point-in-time copy of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub profile: Option<UserProfile>,
    pub generation: u64,
}

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    profile: Option<UserProfile>,
    generation: u64,
    /// Set on teardown; storage may still hold the erased credential.
    token_cleared: bool,
    profile_cleared: bool,
}

impl SessionState {
    fn tear_down(&mut self) {
        self.token = None;
        self.profile = None;
        self.token_cleared = true;
        self.profile_cleared = true;
    }
}

/// Shared credential and profile store.
///
/// Construct once per process and share it as `Arc<SessionStore>` between
/// every gateway and the host.
pub struct SessionStore {
    storage: Arc<dyn SettingsStore>,
    keys: SessionKeys,
    state: RwLock<SessionState>,
    write_lock: Mutex<()>,
    event_bus: Option<EventBus>,
}

impl SessionStore {
    /// Create an empty store without touching storage.
    ///
    /// Values are still picked up lazily by [`get_token`](Self::get_token) and
    /// [`get_user_info`](Self::get_user_info).
    pub fn new(storage: Arc<dyn SettingsStore>, keys: SessionKeys) -> Self {
        Self {
            storage,
            keys,
            state: RwLock::new(SessionState::default()),
            write_lock: Mutex::new(()),
            event_bus: None,
        }
    }

    /// Create a store and rehydrate it from storage.
    ///
    /// A stored profile that fails to parse is logged, removed from storage and
    /// treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StorageUnavailable`] when storage cannot be read.
    pub async fn load(storage: Arc<dyn SettingsStore>, keys: SessionKeys) -> Result<Self> {
        let store = Self::new(storage, keys);

        let token = store
            .storage
            .get_string(&store.keys.token_key)
            .await?
            .filter(|token| !token.is_empty());
        let profile = store.read_stored_profile().await?;

        info!(
            has_token = token.is_some(),
            has_profile = profile.is_some(),
            "Session rehydrated from storage"
        );

        {
            let mut state = store.write_state();
            state.token = token;
            state.profile = profile;
        }

        Ok(store)
    }

    /// Publish session changes on `bus`.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    // ------------------------------------------------------------------
    // Synchronous reads
    // ------------------------------------------------------------------

    /// In-memory credential.
    pub fn token(&self) -> Option<String> {
        self.read_state().token.clone()
    }

    /// In-memory credential together with the generation it belongs to.
    pub fn credential(&self) -> (Option<String>, u64) {
        let state = self.read_state();
        (state.token.clone(), state.generation)
    }

    /// Credential and generation, rehydrating the credential from storage when
    /// memory holds none.
    ///
    /// Gateways read the credential through this so a store created with
    /// [`new`](Self::new) still authenticates its first request.
    pub async fn load_credential(&self) -> (Option<String>, u64) {
        let current = self.credential();
        if current.0.is_some() {
            return current;
        }
        self.get_token().await;
        self.credential()
    }

    pub fn generation(&self) -> u64 {
        self.read_state().generation
    }

    /// In-memory profile.
    pub fn user_info(&self) -> Option<UserProfile> {
        self.read_state().profile.clone()
    }

    /// `true` only when a cached profile carries the `admin` role key.
    pub fn is_admin(&self) -> bool {
        self.read_state()
            .profile
            .as_ref()
            .is_some_and(UserProfile::is_admin)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read_state();
        SessionSnapshot {
            token: state.token.clone(),
            profile: state.profile.clone(),
            generation: state.generation,
        }
    }

    // ------------------------------------------------------------------
    // Credential
    // ------------------------------------------------------------------

    /// Store `token` as the current credential.
    ///
    /// The value is not validated.
    pub async fn set_token(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        let _guard = self.write_lock.lock().await;

        self.storage
            .set_string(&self.keys.token_key, &token)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to persist session credential");
                SessionError::from(e)
            })?;

        let generation = {
            let mut state = self.write_state();
            state.token = Some(token);
            state.token_cleared = false;
            state.generation += 1;
            state.generation
        };

        info!(generation, "Session credential stored");
        self.emit(SessionEvent::SignedIn { generation });
        Ok(())
    }

    /// In-memory credential, falling back to one read from storage.
    ///
    /// Storage failures are logged and reported as no credential. After a
    /// logout or expiry storage is not consulted again until a new credential
    /// is stored.
    pub async fn get_token(&self) -> Option<String> {
        if let Some(token) = self.token() {
            return Some(token);
        }

        let _guard = self.write_lock.lock().await;
        {
            let state = self.read_state();
            if state.token.is_some() || state.token_cleared {
                return state.token.clone();
            }
        }

        match self.storage.get_string(&self.keys.token_key).await {
            Ok(Some(token)) if !token.is_empty() => {
                let generation = {
                    let mut state = self.write_state();
                    state.token = Some(token.clone());
                    state.generation += 1;
                    state.generation
                };
                debug!(generation, "Session credential rehydrated");
                Some(token)
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Failed to rehydrate session credential");
                None
            }
        }
    }

    /// Replace the credential with one handed out by the server.
    ///
    /// Applies only while the session is still at `observed_generation` and the
    /// value actually changed. Returns whether the credential was replaced.
    pub async fn rotate_token(
        &self,
        token: &str,
        observed_generation: u64,
        source: &str,
    ) -> Result<bool> {
        if token.is_empty() {
            return Ok(false);
        }

        let _guard = self.write_lock.lock().await;
        {
            let state = self.read_state();
            if state.generation != observed_generation {
                debug!(
                    gateway = source,
                    observed_generation,
                    current_generation = state.generation,
                    "Ignoring credential rotation from a superseded session"
                );
                return Ok(false);
            }
            if state.token.as_deref() == Some(token) {
                return Ok(false);
            }
        }

        self.storage.set_string(&self.keys.token_key, token).await?;

        let generation = {
            let mut state = self.write_state();
            state.token = Some(token.to_string());
            state.token_cleared = false;
            state.generation += 1;
            state.generation
        };

        debug!(gateway = source, generation, "Session credential rotated");
        self.emit(SessionEvent::TokenRotated {
            gateway: source.to_string(),
            generation,
        });
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------

    /// Store `profile` as JSON under the profile key.
    pub async fn set_user_info(&self, profile: UserProfile) -> Result<()> {
        let json = serde_json::to_string(&profile).map_err(|e| SessionError::SerializationFailed {
            context: "user profile".to_string(),
            source: e,
        })?;

        let _guard = self.write_lock.lock().await;
        self.storage
            .set_string(&self.keys.profile_key, &json)
            .await?;

        let username = profile.username.clone();
        {
            let mut state = self.write_state();
            state.profile = Some(profile);
            state.profile_cleared = false;
        }

        debug!(username = %username, "User profile stored");
        self.emit(SessionEvent::ProfileUpdated { username });
        Ok(())
    }

    /// In-memory profile, falling back to one read from storage.
    pub async fn get_user_info(&self) -> Option<UserProfile> {
        if let Some(profile) = self.user_info() {
            return Some(profile);
        }

        let _guard = self.write_lock.lock().await;
        {
            let state = self.read_state();
            if state.profile.is_some() || state.profile_cleared {
                return state.profile.clone();
            }
        }

        match self.read_stored_profile().await {
            Ok(Some(profile)) => {
                self.write_state().profile = Some(profile.clone());
                debug!("User profile rehydrated");
                Some(profile)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to rehydrate user profile");
                None
            }
        }
    }

    /// Drop the cached profile. It stays cleared in memory even when erasing
    /// storage fails.
    pub async fn clear_user_info(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        {
            let mut state = self.write_state();
            state.profile = None;
            state.profile_cleared = true;
        }
        self.storage.delete(&self.keys.profile_key).await?;
        debug!("User profile cleared");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Clear credential and profile and erase both storage keys.
    ///
    /// Idempotent. Memory is cleared even when erasing storage fails, and the
    /// leftover entries are never rehydrated; the storage error is still
    /// returned.
    pub async fn logout(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let changed = {
            let mut state = self.write_state();
            let changed = state.token.is_some() || state.profile.is_some();
            state.tear_down();
            if changed {
                state.generation += 1;
            }
            changed
        };

        let token_erased = self.storage.delete(&self.keys.token_key).await;
        let profile_erased = self.storage.delete(&self.keys.profile_key).await;

        if changed {
            info!("Session signed out");
            self.emit(SessionEvent::SignedOut);
        }

        token_erased?;
        profile_erased?;
        Ok(())
    }

    /// Tear the session down after a backend rejected the credential.
    ///
    /// Returns `true` for exactly one caller per generation: the one that
    /// should navigate to the login route. Storage erase failures are logged,
    /// not returned.
    pub async fn expire(&self, observed_generation: u64, source: &str) -> bool {
        let _guard = self.write_lock.lock().await;

        {
            let mut state = self.write_state();
            if state.generation != observed_generation {
                debug!(
                    gateway = source,
                    observed_generation,
                    current_generation = state.generation,
                    "Session already torn down or replaced"
                );
                return false;
            }
            state.tear_down();
            state.generation += 1;
        }

        for key in [&self.keys.token_key, &self.keys.profile_key] {
            if let Err(e) = self.storage.delete(key).await {
                warn!(key = %key, error = %e, "Failed to erase expired session entry");
            }
        }

        warn!(gateway = source, "Session expired, credential rejected by backend");
        self.emit(SessionEvent::Expired {
            gateway: source.to_string(),
        });
        true
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn read_stored_profile(&self) -> Result<Option<UserProfile>> {
        let key = &self.keys.profile_key;
        let Some(raw) = self.storage.get_string(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                warn!(key = %key, error = %e, "Stored user profile is corrupt, discarding");
                if let Err(delete_err) = self.storage.delete(key).await {
                    warn!(key = %key, error = %delete_err, "Failed to delete corrupt user profile");
                }
                Ok(None)
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Session(event)).ok();
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("SessionStore")
            .field("keys", &self.keys)
            .field("has_token", &state.token.is_some())
            .field("has_profile", &state.profile.is_some())
            .field("generation", &state.generation)
            .finish()
    }
}
