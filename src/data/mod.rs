//! Data fetching and storage
//!
//! Handles:
//! - Provider traits for spot price and option chains
//! - Yahoo Finance API (free, delayed)
//! - Local snapshot caching

pub mod provider;
pub mod yahoo;
pub mod cache;

pub use provider::*;
pub use yahoo::*;
pub use cache::*;
