use serde::Deserialize;

use crate::error::ConfigError;

/// Id of the optional `<script type="application/json">` block the host page
/// can use to configure the board.
pub const CONFIG_ELEMENT_ID: &str = "board-config";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    /// Prefix for every backend URL. Empty means same origin.
    pub api_base: String,
    pub signup_message_ms: u32,
    pub unregister_message_ms: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            signup_message_ms: 5000,
            unregister_message_ms: 4000,
        }
    }
}

impl BoardConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut cfg: BoardConfig = serde_json::from_str(json)?;
        cfg.api_base = cfg.api_base.trim().trim_end_matches('/').to_string();
        Ok(cfg)
    }

    /// Reads the config block from the host page. Falls back to defaults when
    /// the block is absent or unreadable.
    pub fn from_dom() -> Self {
        let Some(json) = config_json_from_dom() else {
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }
}

fn config_json_from_dom() -> Option<String> {
    let doc = web_sys::window()?.document()?;
    let el = doc.get_element_by_id(CONFIG_ELEMENT_ID)?;
    el.text_content()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_object_is_defaults() {
        assert_eq!(BoardConfig::from_json("{}").unwrap(), BoardConfig::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let cfg = BoardConfig::from_json(r#"{"api_base": "https://school.example/api/"}"#).unwrap();
        assert_eq!(cfg.api_base, "https://school.example/api");
        assert_eq!(cfg.signup_message_ms, 5000);
        assert_eq!(cfg.unregister_message_ms, 4000);
    }

    #[test]
    fn unknown_fields_ignored() {
        let cfg = BoardConfig::from_json(r#"{"theme": "dark", "signup_message_ms": 100}"#).unwrap();
        assert_eq!(cfg.signup_message_ms, 100);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(BoardConfig::from_json("{not json").is_err());
        assert!(BoardConfig::from_json(r#"{"signup_message_ms": "soon"}"#).is_err());
    }
}
