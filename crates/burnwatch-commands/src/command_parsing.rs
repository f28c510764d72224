//! Command text parsing and resolution into typed commands.

use burnwatch_config::ConfigField;

use crate::command_rendering::{command_usage, threshold_command_name};

pub const COMMAND_MARKER: char = '/';
/// Argument accepted by `/setmaxmcap` to remove the market-cap ceiling.
pub const UNBOUNDED_ARGUMENT: &str = "unlimited";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One command as typed by a chat participant.
pub struct CommandInvocation {
    pub sender_id: String,
    pub name: String,
    pub argument: Option<String>,
    /// Bot username from a `/name@bot` suffix, without the `@`.
    pub addressed_to: Option<String>,
}

impl CommandInvocation {
    /// True unless the command names a different bot. Usernames compare
    /// case-insensitively and a leading `@` on `bot_username` is ignored.
    pub fn is_addressed_to(&self, bot_username: &str) -> bool {
        let own = bot_username.trim().trim_start_matches('@');
        match self.addressed_to.as_deref() {
            Some(target) => target.eq_ignore_ascii_case(own),
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Enumerates resolved operator commands.
pub enum BurnCommand {
    Status,
    SetThreshold { field: ConfigField, value: f64 },
    Settings,
    Help,
    Invalid { message: String },
}

impl BurnCommand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::SetThreshold { field, .. } => threshold_command_name(*field),
            Self::Settings => "settings",
            Self::Help => "help",
            Self::Invalid { .. } => "invalid",
        }
    }
}

/// Splits `/name[@bot] [argument]` into its parts.
///
/// Returns `None` when the text does not start with the command marker.
pub fn parse_command_invocation(sender_id: &str, text: &str) -> Option<CommandInvocation> {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix(COMMAND_MARKER)?;
    let mut parts = body.splitn(2, char::is_whitespace);
    let raw_name = parts.next().unwrap_or_default();
    let (name, addressed_to) = match raw_name.split_once('@') {
        Some((name, bot)) => (name, Some(bot.to_string()).filter(|bot| !bot.is_empty())),
        None => (raw_name, None),
    };
    let name = name.to_ascii_lowercase();
    let argument = parts
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    Some(CommandInvocation {
        sender_id: sender_id.to_string(),
        name,
        argument,
        addressed_to,
    })
}

fn threshold_field_for_command(name: &str) -> Option<ConfigField> {
    match name {
        "setminsol" => Some(ConfigField::MinSol),
        "setmaxsol" => Some(ConfigField::MaxSol),
        "setminmcap" => Some(ConfigField::MinMcap),
        "setmaxmcap" => Some(ConfigField::MaxMcap),
        _ => None,
    }
}

fn parse_threshold_argument(field: ConfigField, argument: Option<&str>) -> BurnCommand {
    let command = threshold_command_name(field);
    let placeholder = if field == ConfigField::MaxMcap {
        "<number|unlimited>"
    } else {
        "<number>"
    };
    let Some(raw) = argument else {
        return BurnCommand::Invalid {
            message: format!("Usage: `/{command} {placeholder}`"),
        };
    };
    if field == ConfigField::MaxMcap && raw.eq_ignore_ascii_case(UNBOUNDED_ARGUMENT) {
        return BurnCommand::SetThreshold {
            field,
            value: f64::INFINITY,
        };
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => BurnCommand::SetThreshold { field, value },
        _ => BurnCommand::Invalid {
            message: format!(
                "`{}` is not a valid number.\nUsage: `/{command} {placeholder}`",
                raw.replace('`', "'")
            ),
        },
    }
}

fn reject_argument(name: &'static str, argument: Option<&str>, command: BurnCommand) -> BurnCommand {
    if argument.is_some() {
        BurnCommand::Invalid {
            message: format!("Usage: `/{name}`"),
        }
    } else {
        command
    }
}

/// Resolves an invocation into a typed command; never mutates anything.
pub fn resolve_burn_command(invocation: &CommandInvocation) -> BurnCommand {
    let argument = invocation.argument.as_deref();
    if let Some(field) = threshold_field_for_command(&invocation.name) {
        return parse_threshold_argument(field, argument);
    }
    match invocation.name.as_str() {
        "status" => reject_argument("status", argument, BurnCommand::Status),
        "settings" => reject_argument("settings", argument, BurnCommand::Settings),
        "help" => BurnCommand::Help,
        other => BurnCommand::Invalid {
            message: format!(
                "Unknown command `/{}`.\n\n{}",
                other.replace('`', "'"),
                command_usage()
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(text: &str) -> CommandInvocation {
        parse_command_invocation("42", text).expect("command")
    }

    #[test]
    fn unit_parse_command_invocation_splits_name_and_argument() {
        let parsed = invocation("/setmaxsol 50");
        assert_eq!(parsed.sender_id, "42");
        assert_eq!(parsed.name, "setmaxsol");
        assert_eq!(parsed.argument.as_deref(), Some("50"));

        let parsed = invocation("  /settings  ");
        assert_eq!(parsed.name, "settings");
        assert_eq!(parsed.argument, None);
    }

    #[test]
    fn unit_parse_command_invocation_strips_bot_suffix_and_case() {
        let parsed = invocation("/SetMinSol@BurnAlertBot 0.25");
        assert_eq!(parsed.name, "setminsol");
        assert_eq!(parsed.argument.as_deref(), Some("0.25"));
        assert_eq!(parsed.addressed_to.as_deref(), Some("BurnAlertBot"));
    }

    #[test]
    fn regression_bot_suffix_must_name_this_bot() {
        let own = invocation("/status@burnalertbot");
        assert!(own.is_addressed_to("BurnAlertBot"));
        assert!(own.is_addressed_to("@BurnAlertBot"));

        let other = invocation("/status@SomeOtherBot");
        assert!(!other.is_addressed_to("BurnAlertBot"));

        let bare = invocation("/status");
        assert_eq!(bare.addressed_to, None);
        assert!(bare.is_addressed_to("BurnAlertBot"));
    }

    #[test]
    fn unit_parse_command_invocation_ignores_plain_text() {
        assert_eq!(parse_command_invocation("42", "hello /status"), None);
        assert_eq!(parse_command_invocation("42", ""), None);
    }

    #[test]
    fn functional_resolve_maps_every_recognized_command() {
        assert_eq!(resolve_burn_command(&invocation("/status")), BurnCommand::Status);
        assert_eq!(
            resolve_burn_command(&invocation("/settings")),
            BurnCommand::Settings
        );
        assert_eq!(resolve_burn_command(&invocation("/help")), BurnCommand::Help);
        assert_eq!(
            resolve_burn_command(&invocation("/setminsol 0.5")),
            BurnCommand::SetThreshold {
                field: ConfigField::MinSol,
                value: 0.5
            }
        );
        assert_eq!(
            resolve_burn_command(&invocation("/setmaxsol 50")),
            BurnCommand::SetThreshold {
                field: ConfigField::MaxSol,
                value: 50.0
            }
        );
        assert_eq!(
            resolve_burn_command(&invocation("/setminmcap 1e4")),
            BurnCommand::SetThreshold {
                field: ConfigField::MinMcap,
                value: 10_000.0
            }
        );
        assert_eq!(
            resolve_burn_command(&invocation("/setmaxmcap 2500000")),
            BurnCommand::SetThreshold {
                field: ConfigField::MaxMcap,
                value: 2_500_000.0
            }
        );
    }

    #[test]
    fn regression_non_numeric_argument_is_rejected() {
        let resolved = resolve_burn_command(&invocation("/setminsol abc"));
        let BurnCommand::Invalid { message } = resolved else {
            panic!("expected invalid command");
        };
        assert!(message.contains("`abc` is not a valid number"));
        assert!(message.contains("/setminsol <number>"));
    }

    #[test]
    fn regression_setmaxmcap_unlimited_restores_unbounded_ceiling() {
        for text in ["/setmaxmcap unlimited", "/setmaxmcap Unlimited"] {
            assert_eq!(
                resolve_burn_command(&invocation(text)),
                BurnCommand::SetThreshold {
                    field: ConfigField::MaxMcap,
                    value: f64::INFINITY
                }
            );
        }
        assert!(matches!(
            resolve_burn_command(&invocation("/setmaxsol unlimited")),
            BurnCommand::Invalid { .. }
        ));
    }

    #[test]
    fn regression_non_finite_and_missing_arguments_are_rejected() {
        for text in ["/setmaxmcap inf", "/setmaxsol NaN", "/setmaxsol"] {
            assert!(
                matches!(
                    resolve_burn_command(&invocation(text)),
                    BurnCommand::Invalid { .. }
                ),
                "{text} should be invalid"
            );
        }
    }

    #[test]
    fn regression_unknown_command_returns_usage_hint() {
        let BurnCommand::Invalid { message } = resolve_burn_command(&invocation("/launch now"))
        else {
            panic!("expected invalid command");
        };
        assert!(message.starts_with("Unknown command `/launch`"));
        assert!(message.contains("/setmaxmcap"));
    }

    #[test]
    fn regression_status_with_argument_is_rejected() {
        assert_eq!(
            resolve_burn_command(&invocation("/status on")),
            BurnCommand::Invalid {
                message: "Usage: `/status`".to_string()
            }
        );
    }
}
