//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the admin core crates:
//! - Logging and tracing infrastructure
//! - Gateway and session configuration
//! - Event bus system
//!
//! Every other core crate depends on this one for its configuration types,
//! its logging conventions and the broadcast channel used to report session
//! and request outcomes.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
