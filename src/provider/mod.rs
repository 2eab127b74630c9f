//! External Recipe Provider Module
//!
//! HTTP client for the third-party recipe search/information service.
//! Responses are memoized in the shared [`MemoryCache`] so identical calls
//! within the TTL never reach the network twice.
//!
//! [`MemoryCache`]: crate::cache::MemoryCache

mod client;

pub use client::{ProviderClient, REQUEST_TIMEOUT};
