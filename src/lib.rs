//! castlinkd library
//!
//! Exposes the layered modules so integration tests under `tests/` can
//! exercise them directly, alongside the `castlinkd` binary.

#![recursion_limit = "16384"]

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod shared;

