//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - matching API for request inspection
//! - Driven Ports (outbound) - the trigger store

pub mod inbound;
pub mod outbound;

pub use inbound::TriggerMatcher;
pub use outbound::TriggerStore;
