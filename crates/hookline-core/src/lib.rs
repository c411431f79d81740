pub mod check;
pub mod command;
pub mod context;
pub mod discovery;
pub mod error;
pub mod git;
pub mod types;

#[cfg(test)]
mod testing;

pub use command::{CommandOutput, CommandRunner, SystemRunner};
pub use context::HookContext;
pub use error::HooklineError;
pub use types::*;
