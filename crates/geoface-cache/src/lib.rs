//! # geoface-cache
//!
//! Cache provider implementations for Geoface:
//!
//! - **memory**: In-process cache using [moka](https://crates.io/crates/moka)
//!   with per-entry deadlines tracked in a `dashmap`
//!
//! The provider is selected at runtime based on configuration. Callers hold
//! a [`CacheManager`] explicitly; there is no process-wide cache.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;

pub use provider::CacheManager;
