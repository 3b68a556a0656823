//! Adapters layer (Hexagonal Architecture)

mod event_bus;
mod staking_ledger;

pub use event_bus::*;
pub use staking_ledger::*;
