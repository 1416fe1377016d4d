//! Markup for the activity list. Every string that came from the backend or
//! the user goes through [`escape_html`] before it lands in the output.

use std::fmt::Write;

use crate::model::{Activity, Catalog};

pub const LOAD_FAILURE_NOTICE: &str = "Failed to load activities. Please try again later.";
pub const NO_PARTICIPANTS: &str = "No participants yet";
pub const SELECT_PLACEHOLDER: &str = "-- Select an activity --";

pub const DELETE_BUTTON_CLASS: &str = "delete-btn";
pub const DATA_ACTIVITY: &str = "data-activity";
pub const DATA_EMAIL: &str = "data-email";

pub fn escape_html(unsafe_text: &str) -> String {
    let mut out = String::with_capacity(unsafe_text.len());
    html_escape::encode_quoted_attribute_to_string(unsafe_text, &mut out);
    out
}

/// One `activity-card` per activity, in catalog order.
pub fn catalog_markup(catalog: &Catalog) -> String {
    let mut out = String::new();
    for (name, activity) in catalog.iter() {
        out.push_str(&activity_card(name, activity));
    }
    out
}

pub fn load_failure_markup() -> String {
    format!("<p>{LOAD_FAILURE_NOTICE}</p>")
}

pub fn activity_card(name: &str, activity: &Activity) -> String {
    let name_html = escape_html(name);
    let mut card = String::new();

    let _ = write!(
        card,
        "<div class=\"activity-card\">\
         <h4>{name_html}</h4>\
         <p>{}</p>\
         <p><strong>Schedule:</strong> {}</p>\
         <p><strong>Availability:</strong> {} spots left</p>\
         <div class=\"participants\">\
         <p class=\"participants-header\"><strong>Participants:</strong></p>\
         <ul class=\"participants-list\">",
        escape_html(&activity.description),
        escape_html(&activity.schedule),
        activity.spots_left(),
    );

    if activity.participants.is_empty() {
        let _ = write!(card, "<li class=\"participant-none\">{NO_PARTICIPANTS}</li>");
    } else {
        for email in &activity.participants {
            card.push_str(&participant_item(&name_html, &escape_html(email)));
        }
    }

    card.push_str("</ul></div></div>");
    card
}

// Both arguments are already escaped.
fn participant_item(name_html: &str, email_html: &str) -> String {
    format!(
        "<li class=\"participant-item\">\
         <span class=\"participant-badge\">{email_html}</span>\
         <button type=\"button\" class=\"{DELETE_BUTTON_CLASS}\" aria-label=\"Unregister {email_html}\" \
         {DATA_ACTIVITY}=\"{name_html}\" {DATA_EMAIL}=\"{email_html}\">&times;</button>\
         </li>"
    )
}

/// `(value, label)` pairs for the activity `<select>`: the empty placeholder
/// first, then every activity in catalog order.
pub fn select_options(catalog: &Catalog) -> Vec<(String, String)> {
    std::iter::once((String::new(), SELECT_PLACEHOLDER.to_string()))
        .chain(catalog.names().map(|n| (n.to_string(), n.to_string())))
        .collect()
}
