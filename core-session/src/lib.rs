//! # Session Module
//!
//! The signed-in operator's credential and cached profile.
//!
//! ## Overview
//!
//! [`SessionStore`] is the single shared mutable record of the admin core.
//! Every gateway reads the credential from it when building a request, and the
//! gateways tear it down when a backend rejects the credential. Both values are
//! mirrored to a durable [`SettingsStore`](bridge_traits::storage::SettingsStore)
//! so a restart resumes the session.
//!
//! ## Features
//!
//! - Rehydration at construction, with corrupt profiles discarded
//! - Lazy rehydration when a value is missing from memory
//! - Atomic logout observed as a unit by readers
//! - A generation counter that lets gateways tear down or rotate a credential
//!   exactly once, and never after a newer login
//! - Session event emission

pub mod error;
pub mod store;
pub mod types;

pub use error::{Result, SessionError};
pub use store::{SessionSnapshot, SessionStore};
pub use types::{UserProfile, ADMIN_ROLE_KEY};
