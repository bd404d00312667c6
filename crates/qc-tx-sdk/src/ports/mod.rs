//! Ports layer for the transaction SDK.
//!
//! - Inbound (Driving) port: the signing API the service exposes
//! - Outbound (Driven) ports: chain lookups and remote key custody

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
