//! # twap common
//!
//! Shared error type, logging setup, identifiers and helpers used by every
//! crate in the twap workspace.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{Result, TwapError};
pub use logging::{init_logging, LoggingConfig};
pub use types::*;
pub use utils::*;
