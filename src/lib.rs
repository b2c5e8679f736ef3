//! Fedmsg Relay — event-routing filter between the Fedora message bus
//! and the task queue.

pub mod classify;
pub mod config;
pub mod error;
pub mod liveness;
pub mod queue;
pub mod relay;
pub mod source;
