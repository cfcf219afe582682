//! Amadeus CLI: run the change-propagation pipeline against a repository,
//! list its change requests and merge them.

pub use cmd::{Cli, Command};

pub mod cmd;
pub mod config;
pub mod terminal;
