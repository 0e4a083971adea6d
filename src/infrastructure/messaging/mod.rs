// Messaging Infrastructure
//
// This module provides implementations for event-driven communication
// including the in-memory event bus and persistent event bus.

pub mod in_memory_event_bus;

pub use in_memory_event_bus::InMemoryEventBus;
