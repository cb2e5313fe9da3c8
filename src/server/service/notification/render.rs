use chrono::NaiveDateTime;

use crate::server::model::message::MessageType;

/// Values substituted into message templates
pub struct TemplateVars<'a> {
    pub child_name: &'a str,
    pub guardian_name: &'a str,
    pub station_id: &'a str,
    pub time: NaiveDateTime,
}

/// Renders the body of a guardian notification for a message type.
pub fn render_message_body(message_type: MessageType, vars: &TemplateVars<'_>) -> String {
    match message_type {
        MessageType::Checkin => format!(
            "Hi {}, {} was checked in at {} at {}.",
            vars.guardian_name,
            vars.child_name,
            vars.station_id,
            vars.time.format("%-I:%M %p"),
        ),
        MessageType::RequestInfo => format!(
            "Hi {}, thanks for visiting again with {}! Reply YES to get a text each time {} \
             is checked in, and let us know about any allergies or notes we should keep on file.",
            vars.guardian_name, vars.child_name, vars.child_name,
        ),
    }
}
