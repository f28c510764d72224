//! Operator authorization for privileged chat commands.

pub mod operator_gate;

pub use operator_gate::{AccessDecision, ChatContext, OperatorGate};
