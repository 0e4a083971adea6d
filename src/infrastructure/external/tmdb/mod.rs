//! TMDb API client (C5).

pub mod client;

pub use client::{RateLimiter, TmdbClient};
