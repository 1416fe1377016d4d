//! The board controller: user action → request → full re-fetch → full
//! re-render. It never holds the catalog between renders and never patches
//! the view in place; the latest server state always wins.

use crate::api::ActivityApi;
use crate::config::BoardConfig;
use crate::model::Catalog;

pub const SIGNUP_FALLBACK: &str = "An error occurred";
pub const SIGNUP_FAILED: &str = "Failed to sign up. Please try again.";
pub const UNREGISTER_FALLBACK: &str = "Failed to unregister participant";
pub const UNREGISTER_FAILED: &str = "Failed to unregister. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn class(self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
    /// How long the message stays up before the view hides it.
    pub hide_after_ms: u32,
}

/// Everything the user can ask the board to do.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    Load,
    Signup { email: String, activity: String },
    Unregister { activity: String, email: String },
}

/// What the controller needs from the page.
pub trait BoardView {
    /// Replace the list and the activity select with this catalog.
    fn render_catalog(&self, catalog: &Catalog);
    fn render_load_failure(&self);
    fn show_message(&self, message: Message);
    fn reset_signup_form(&self);
    /// Ask the user to confirm a destructive action.
    fn confirm(&self, prompt: &str) -> bool;
}

pub struct ActivityBoard<A, V> {
    api: A,
    view: V,
    config: BoardConfig,
}

impl<A: ActivityApi, V: BoardView> ActivityBoard<A, V> {
    pub fn new(api: A, view: V, config: BoardConfig) -> Self {
        Self { api, view, config }
    }

    #[cfg(test)]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[cfg(test)]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub async fn handle(&self, event: BoardEvent) {
        match event {
            BoardEvent::Load => self.load_and_render().await,
            BoardEvent::Signup { email, activity } => self.submit_signup(&email, &activity).await,
            BoardEvent::Unregister { activity, email } => {
                self.submit_unregister(&activity, &email).await
            }
        }
    }

    pub async fn load_and_render(&self) {
        match self.api.fetch_catalog().await {
            Ok(catalog) => {
                if catalog.is_empty() {
                    log::warn!("backend returned no activities");
                } else {
                    log::debug!("loaded {} activities", catalog.len());
                }
                self.view.render_catalog(&catalog);
            }
            Err(e) => {
                log::error!("Error fetching activities: {e}");
                self.view.render_load_failure();
            }
        }
    }

    pub async fn submit_signup(&self, email: &str, activity: &str) {
        let hide_after_ms = self.config.signup_message_ms;
        match self.api.signup(activity, email).await {
            Ok(confirmation) => {
                self.view.show_message(Message {
                    kind: MessageKind::Success,
                    text: confirmation,
                    hide_after_ms,
                });
                self.view.reset_signup_form();
                self.load_and_render().await;
            }
            Err(e) if e.is_rejection() => {
                let text = e.user_detail().unwrap_or(SIGNUP_FALLBACK).to_string();
                self.view.show_message(Message { kind: MessageKind::Error, text, hide_after_ms });
            }
            Err(e) => {
                log::error!("Error signing up: {e}");
                self.view.show_message(Message {
                    kind: MessageKind::Error,
                    text: SIGNUP_FAILED.to_string(),
                    hide_after_ms,
                });
            }
        }
    }

    pub async fn submit_unregister(&self, activity: &str, email: &str) {
        if !self.view.confirm(&format!("Unregister {email} from {activity}?")) {
            return;
        }

        let hide_after_ms = self.config.unregister_message_ms;
        let message = match self.api.unregister(activity, email).await {
            Ok(()) => {
                self.load_and_render().await;
                Message {
                    kind: MessageKind::Success,
                    text: format!("{email} was unregistered from {activity}"),
                    hide_after_ms,
                }
            }
            Err(e) if e.is_rejection() => Message {
                kind: MessageKind::Error,
                text: e.user_detail().unwrap_or(UNREGISTER_FALLBACK).to_string(),
                hide_after_ms,
            },
            Err(e) => {
                log::error!("Error unregistering: {e}");
                Message {
                    kind: MessageKind::Error,
                    text: UNREGISTER_FAILED.to_string(),
                    hide_after_ms,
                }
            }
        };
        self.view.show_message(message);
    }
}
