//! Domain layer for the validator lifecycle subsystem
//!
//! - slash_tracker: per-period unavailability counters
//! - penalty: misdemeanor / felony / double-sign tier selection
//! - jail: monotonic jail windows
//! - rotation: epoch clock and active-set selection
//! - validator: validator records and the active set

mod error;
mod jail;
mod penalty;
mod rotation;
mod slash_tracker;
mod types;
mod validator;

pub use error::*;
pub use jail::*;
pub use penalty::*;
pub use rotation::*;
pub use slash_tracker::*;
pub use types::*;
pub use validator::*;
