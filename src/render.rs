use askama::Template;

use crate::models::ActionRecord;

#[derive(Template)]
#[template(path = "feed/card.html")]
struct ActionCardTemplate<'a> {
    timestamp: String,
    action_type: &'a str,
    details: String,
}

/// Render one action record as a self-contained HTML card.
pub fn render_card(record: &ActionRecord) -> String {
    let template = ActionCardTemplate {
        timestamp: record.timestamp.display(),
        action_type: &record.action_type,
        details: pretty_details(&record.details),
    };
    template.render().unwrap_or_default()
}

/// Two-space indented JSON, for display only.
pub fn pretty_details(details: &serde_json::Value) -> String {
    serde_json::to_string_pretty(details).unwrap_or_else(|_| details.to_string())
}
