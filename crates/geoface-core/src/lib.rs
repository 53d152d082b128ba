//! # geoface-core
//!
//! Core crate for Geoface. Contains the boundary traits for hierarchy
//! providers and caches, configuration schemas, hierarchy level tables,
//! the children-fetch wire types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Geoface crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
