//! Topic classification — the decision logic of the relay.
//!
//! One pure callback per topic family decides whether an event is relevant
//! to our automation user and produces a one-line summary. The dispatch
//! table maps exact topic strings to callbacks; everything the table does
//! not know is suppressed by the router's fallback.

pub mod access;
pub mod callbacks;
pub mod dispatch;
pub mod specfile;

pub use callbacks::{Classification, ClassifyContext};
pub use dispatch::{SUPPORTED_TOPICS, lookup};
