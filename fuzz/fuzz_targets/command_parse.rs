#![no_main]

use burnwatch_commands::{parse_command_invocation, resolve_burn_command, BurnCommand};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let Some(invocation) = parse_command_invocation("1001", &text) else {
        return;
    };
    assert_eq!(invocation.name, invocation.name.to_ascii_lowercase());
    assert!(!invocation.name.contains('@'));
    if let Some(bot) = invocation.addressed_to.as_deref() {
        assert!(!bot.is_empty());
        assert!(invocation.is_addressed_to(bot));
    }
    match resolve_burn_command(&invocation) {
        BurnCommand::SetThreshold { value, .. } => assert!(value.is_finite()),
        BurnCommand::Invalid { message } => assert!(!message.trim().is_empty()),
        BurnCommand::Status | BurnCommand::Settings | BurnCommand::Help => {}
    }
});
