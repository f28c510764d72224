//! Operator-facing response text. All output targets Telegram legacy Markdown.

use burnwatch_config::{ConfigField, ThresholdConfig};
use burnwatch_core::escape_markdown;

pub(crate) const DENIED_MESSAGE: &str = "⛔ You are not authorized to change burn alert settings.";

pub fn command_usage() -> String {
    [
        "Supported commands:",
        "- `/status` toggle alert posting on or off",
        "- `/setminsol <number>` minimum SOL burned",
        "- `/setmaxsol <number>` maximum SOL burned",
        "- `/setminmcap <number>` minimum market cap",
        "- `/setmaxmcap <number|unlimited>` maximum market cap",
        "- `/settings` show current settings",
    ]
    .join("\n")
}

pub(crate) fn threshold_command_name(field: ConfigField) -> &'static str {
    match field {
        ConfigField::Enabled => "status",
        ConfigField::MinSol => "setminsol",
        ConfigField::MaxSol => "setmaxsol",
        ConfigField::MinMcap => "setminmcap",
        ConfigField::MaxMcap => "setmaxmcap",
    }
}

pub(crate) fn field_label(field: ConfigField) -> &'static str {
    match field {
        ConfigField::Enabled => "Posting",
        ConfigField::MinSol => "Min SOL",
        ConfigField::MaxSol => "Max SOL",
        ConfigField::MinMcap => "Min MarketCap",
        ConfigField::MaxMcap => "Max MarketCap",
    }
}

pub(crate) fn render_bound(value: f64) -> String {
    if value == f64::INFINITY {
        "unlimited".to_string()
    } else {
        value.to_string()
    }
}

fn render_enabled(enabled: bool) -> &'static str {
    if enabled {
        "✅ ON"
    } else {
        "⛔ OFF"
    }
}

pub(crate) fn render_status_toggled(enabled: bool) -> String {
    format!("🔄 Posting: {}", render_enabled(enabled))
}

pub(crate) fn render_threshold_updated(field: ConfigField, config: &ThresholdConfig) -> String {
    let Some(value) = config.bound(field) else {
        return render_status_toggled(config.enabled);
    };
    let mut message = format!("🔹 {} set to: {}", field_label(field), render_bound(value));
    if let Some((lower, upper)) = config.inverted_range() {
        let lower_value = render_bound(config.bound(lower).unwrap_or_default());
        let upper_value = render_bound(config.bound(upper).unwrap_or_default());
        message.push_str(&format!(
            "\n⚠️ {} ({lower_value}) is above {} ({upper_value}); every burn event will be dropped until the range is fixed.",
            field_label(lower),
            field_label(upper),
        ));
    }
    message
}

pub(crate) fn render_persist_warning(detail: &str) -> String {
    format!(
        "\n⚠️ Not saved to disk ({}). The new value applies until restart.",
        escape_markdown(detail)
    )
}

pub(crate) fn render_settings(config: &ThresholdConfig) -> String {
    [
        "⚙️ *Burn alert settings*".to_string(),
        format!(
            "🔄 {}: {}",
            field_label(ConfigField::Enabled),
            render_enabled(config.enabled)
        ),
        format!(
            "💎 {}: {}",
            field_label(ConfigField::MinSol),
            render_bound(config.min_sol)
        ),
        format!(
            "💎 {}: {}",
            field_label(ConfigField::MaxSol),
            render_bound(config.max_sol)
        ),
        format!(
            "💰 {}: {}",
            field_label(ConfigField::MinMcap),
            render_bound(config.min_mcap)
        ),
        format!(
            "💰 {}: {}",
            field_label(ConfigField::MaxMcap),
            render_bound(config.max_mcap)
        ),
    ]
    .join("\n")
}
