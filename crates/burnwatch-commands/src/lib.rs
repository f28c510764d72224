//! Privileged operator commands that read and mutate threshold state.
//!
//! Command text is parsed into a `CommandInvocation`, authorized against the
//! operator identity, resolved into a `BurnCommand`, and applied through the
//! injected `ConfigStore`. Every processed command yields a `CommandOutcome`
//! describing the reply, if any, and where it should be delivered.

pub mod command_parsing;
pub mod command_processor;
pub mod command_rendering;

pub use command_parsing::{
    parse_command_invocation, resolve_burn_command, BurnCommand, CommandInvocation,
    COMMAND_MARKER, UNBOUNDED_ARGUMENT,
};
pub use command_processor::{
    process_command, CommandOutcome, CommandReply, CommandStatus, ReplyTarget,
};
pub use command_rendering::command_usage;
