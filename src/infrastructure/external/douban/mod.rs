//! Douban adapter (C6).

pub mod client;

pub use client::DoubanClient;
