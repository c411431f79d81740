pub mod config;
pub mod event;

pub use config::{CheckDefinition, HookConfig, PreMergeRef};
pub use event::{HookEvent, InvocationContext};
