//! Authorization-gated command execution against the `ConfigStore`.

use burnwatch_access::{AccessDecision, ChatContext, OperatorGate};
use burnwatch_config::{ConfigField, ConfigStore, ConfigStoreError, ConfigValue};
use burnwatch_core::escape_markdown;
use tracing::{info, warn};

use crate::command_parsing::{resolve_burn_command, BurnCommand, CommandInvocation};
use crate::command_rendering::{
    command_usage, render_persist_warning, render_settings, render_status_toggled,
    render_threshold_updated, DENIED_MESSAGE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Destination for a command reply.
pub enum ReplyTarget {
    /// The operator's private chat.
    Operator,
    /// The chat the command arrived from.
    Sender,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub target: ReplyTarget,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates how a command invocation ended.
pub enum CommandStatus {
    /// Threshold state changed and was persisted.
    Applied,
    /// Threshold state changed in memory only.
    AppliedNotPersisted,
    /// Read-only command answered.
    Reported,
    /// Unknown command or bad argument; state untouched.
    Rejected,
    /// Sender is not the operator and got a denial.
    Denied,
    /// Sender is not the operator and was ignored.
    Ignored,
}

impl CommandStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::AppliedNotPersisted => "applied_not_persisted",
            Self::Reported => "reported",
            Self::Rejected => "rejected",
            Self::Denied => "denied",
            Self::Ignored => "ignored",
        }
    }

    pub fn mutated_state(self) -> bool {
        matches!(self, Self::Applied | Self::AppliedNotPersisted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: &'static str,
    pub status: CommandStatus,
    pub reply: Option<CommandReply>,
}

impl CommandOutcome {
    fn to_operator(command: &'static str, status: CommandStatus, text: String) -> Self {
        Self {
            command,
            status,
            reply: Some(CommandReply {
                target: ReplyTarget::Operator,
                text,
            }),
        }
    }
}

/// Runs one invocation: authorize, resolve, then mutate or read.
pub fn process_command(
    store: &mut ConfigStore,
    gate: &OperatorGate,
    invocation: &CommandInvocation,
    context: ChatContext,
) -> CommandOutcome {
    match gate.check(&invocation.sender_id, context) {
        AccessDecision::Allowed => {}
        AccessDecision::Denied => {
            warn!(
                sender_id = %invocation.sender_id,
                command = %invocation.name,
                "unauthorized command denied"
            );
            return CommandOutcome {
                command: "unauthorized",
                status: CommandStatus::Denied,
                reply: Some(CommandReply {
                    target: ReplyTarget::Sender,
                    text: DENIED_MESSAGE.to_string(),
                }),
            };
        }
        AccessDecision::Silent => {
            info!(
                sender_id = %invocation.sender_id,
                command = %invocation.name,
                "unauthorized broadcast command ignored"
            );
            return CommandOutcome {
                command: "unauthorized",
                status: CommandStatus::Ignored,
                reply: None,
            };
        }
    }

    let command = resolve_burn_command(invocation);
    let label = command.label();
    let outcome = match command {
        BurnCommand::Status => match store.toggle_enabled() {
            Ok(enabled) => CommandOutcome::to_operator(
                label,
                CommandStatus::Applied,
                render_status_toggled(enabled),
            ),
            Err(error) => mutation_failure(label, ConfigField::Enabled, error),
        },
        BurnCommand::SetThreshold { field, value } => {
            match store.set(field, ConfigValue::Number(value)) {
                Ok(config) => CommandOutcome::to_operator(
                    label,
                    CommandStatus::Applied,
                    render_threshold_updated(field, &config),
                ),
                Err(error) => mutation_failure(label, field, error),
            }
        }
        BurnCommand::Settings => CommandOutcome::to_operator(
            label,
            CommandStatus::Reported,
            render_settings(&store.get()),
        ),
        BurnCommand::Help => {
            CommandOutcome::to_operator(label, CommandStatus::Reported, command_usage())
        }
        BurnCommand::Invalid { message } => {
            CommandOutcome::to_operator(label, CommandStatus::Rejected, message)
        }
    };
    info!(
        command = outcome.command,
        status = outcome.status.as_str(),
        "operator command processed"
    );
    outcome
}

fn mutation_failure(
    label: &'static str,
    field: ConfigField,
    error: ConfigStoreError,
) -> CommandOutcome {
    match error {
        ConfigStoreError::Persist { applied, detail } => {
            let mut text = render_threshold_updated(field, &applied);
            text.push_str(&render_persist_warning(&detail));
            CommandOutcome::to_operator(label, CommandStatus::AppliedNotPersisted, text)
        }
        other => CommandOutcome::to_operator(
            label,
            CommandStatus::Rejected,
            format!("❌ {}", escape_markdown(&other.to_string())),
        ),
    }
}

#[cfg(test)]
mod tests;
