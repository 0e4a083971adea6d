//! Download-automation adapter (used only by the auto-subscribe task, C14).

pub mod client;

pub use client::MoviePilotClient;
