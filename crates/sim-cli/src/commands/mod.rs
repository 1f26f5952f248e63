//! Command handler modules for `simrun`.

pub mod run;
