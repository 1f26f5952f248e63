//! Strategy-file loading and run-parameter validation, kept apart from
//! `sim-types`'s plain config structs so that parsing concerns (extension
//! dispatch, duplicate-id detection) and cross-field validation don't leak
//! into the shared vocabulary crate.

mod error;
mod loader;
mod validate;

pub use error::{ConfigError, ConfigWarning};
pub use loader::load_strategy_file;
pub use validate::validate_simulation_config;
