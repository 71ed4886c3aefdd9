//! # twap config
//!
//! Settings (file locations, tweet window, report sizes, API endpoint) loaded
//! from an optional YAML/TOML file with `TWAP_*` environment overrides, plus
//! the OAuth credential file.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod credentials;
pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use credentials::Credentials;
pub use defaults::*;
pub use loader::{ConfigError, ConfigLoader, CONFIG_PATH_VAR};
pub use schema::*;
