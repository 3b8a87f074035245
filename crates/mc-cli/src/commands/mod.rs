//! CLI subcommand implementations.

pub mod estimate;
pub mod export;
pub mod roles;
pub mod run;
pub mod util;
