//! Download-automation adapter interface, used only by the auto-subscribe
//! task (C14, spec.md §4.8: "invoke the external subscribe adapter").
//!
//! The core never downloads media itself; this port hands a missing title
//! off to whatever acquisition queue the deployment wires in.

use async_trait::async_trait;

use crate::domain::value_objects::ItemType;
use crate::shared::error::SubscribeError;

#[async_trait]
pub trait SubscribeService: Send + Sync {
    async fn subscribe(&self, tmdb_id: &str, item_type: ItemType, title: &str) -> Result<(), SubscribeError>;
}
