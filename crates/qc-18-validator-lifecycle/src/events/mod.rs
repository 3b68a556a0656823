//! Events layer (EDA)

mod published;

pub use published::*;
