//! Domain Events - Events that represent significant state changes

pub mod task_events;
pub mod webhook_events;

pub use task_events::TaskCompletedEvent;
pub use webhook_events::{CastProcessedEvent, ImageUpdatedEvent, ItemAddedEvent};
