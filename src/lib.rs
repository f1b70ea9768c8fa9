//! Workspace placeholder crate.
//!
//! Exposes feature flags that map onto the workspace crates so a host can
//! depend on `depot-admin-workspace` alone. With the default `desktop-shims`
//! feature the service façade is re-exported together with its desktop
//! storage and HTTP adapters.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;
