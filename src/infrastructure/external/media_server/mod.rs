//! Media-server adapter (C4).

pub mod client;

pub use client::MediaServerClient;
