use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where a command was sent from.
pub enum ChatContext {
    /// One-to-one chat between the sender and the bot.
    Private,
    /// Group, supergroup, or channel shared with other members.
    Broadcast,
}

impl ChatContext {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Broadcast => "broadcast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Outcome of checking a command sender against the operator identity.
pub enum AccessDecision {
    Allowed,
    /// Reply with an explicit denial.
    Denied,
    /// Ignore without replying.
    Silent,
}

/// Matches command senders against the single configured operator identity.
#[derive(Debug, Clone)]
pub struct OperatorGate {
    operator_id: String,
}

impl OperatorGate {
    pub fn new(operator_id: impl Into<String>) -> Self {
        Self {
            operator_id: operator_id.into(),
        }
    }

    pub fn operator_id(&self) -> &str {
        &self.operator_id
    }

    /// Exact string equality; no trimming or case folding.
    pub fn is_authorized(&self, sender_id: &str) -> bool {
        !self.operator_id.is_empty() && sender_id == self.operator_id
    }

    pub fn check(&self, sender_id: &str, context: ChatContext) -> AccessDecision {
        if self.is_authorized(sender_id) {
            return AccessDecision::Allowed;
        }
        debug!(
            sender_id,
            context = context.as_str(),
            "command sender is not the operator"
        );
        match context {
            ChatContext::Private => AccessDecision::Denied,
            ChatContext::Broadcast => AccessDecision::Silent,
        }
    }
}
