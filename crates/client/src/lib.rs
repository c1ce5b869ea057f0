//! Network side of offcache.
//!
//! This crate provides the reqwest-backed [`HttpFetcher`] the cache engine
//! fetches through, and the [`ConnectivityProbe`] that keeps the engine's
//! online/offline signal current.

pub mod fetch;
pub mod probe;

#[cfg(test)]
mod test_support;

pub use fetch::{FetchConfig, FetchError, HttpFetcher};
pub use probe::{ConnectivityProbe, ProbeHandle, spawn_probe};
