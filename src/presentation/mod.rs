//! Presentation Layer
//!
//! Kept thin per spec.md §1: the webhook ingress and a minimal task-control
//! surface, not a full admin API.

pub mod http;
