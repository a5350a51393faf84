use serde::Serialize;
use utoipa::ToSchema;

pub const MIN_QUERY_HINT: &str = "Enter at least 3 characters to search.";
pub const NO_RESULTS: &str = "No satellites found.";
pub const AI_KEY_MISSING: &str =
    "Gemini API key is not set. Enter and save a key in the header first.";
pub const AI_REQUEST_FAILED: &str =
    "Failed to fetch the AI description. Check that the API key is valid or try again later.";
pub const AI_KEY_INIT_FAILED: &str =
    "Failed to initialize the API key. Check that the key is valid.";

/// What the AI section of the info panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display)]
#[serde(tag = "status", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AiPanel {
    Error { message: String },
    NoApiKey,
    Disabled,
    Loading,
    Ready { text: String },
    /// A satellite is loaded but no description has been requested yet.
    Waiting,
    Idle,
}

impl AiPanel {
    /// Text shown in the panel for this state.
    pub fn message(&self) -> &str {
        match self {
            AiPanel::Error { message } => message,
            AiPanel::NoApiKey => "Enter a Gemini API key in the header to use the AI features.",
            AiPanel::Disabled => "AI descriptions are turned off. Enable Gemini in the header.",
            AiPanel::Loading => "AI is generating satellite information...",
            AiPanel::Ready { text } => text,
            AiPanel::Waiting => "Waiting for the AI description...",
            AiPanel::Idle => "Select a satellite and the AI will describe it.",
        }
    }
}

pub struct AiPanelInputs<'a> {
    pub error: Option<&'a str>,
    pub api_key_provided: bool,
    pub enabled: bool,
    pub loading: bool,
    pub description: Option<&'a str>,
    pub has_tle: bool,
}

/// First matching state wins, in the order the variants are declared.
pub fn ai_panel(inputs: AiPanelInputs<'_>) -> AiPanel {
    if let Some(message) = inputs.error {
        return AiPanel::Error {
            message: message.to_string(),
        };
    }
    if !inputs.api_key_provided {
        return AiPanel::NoApiKey;
    }
    if !inputs.enabled {
        return AiPanel::Disabled;
    }
    if inputs.loading {
        return AiPanel::Loading;
    }
    if let Some(text) = inputs.description {
        return AiPanel::Ready {
            text: text.to_string(),
        };
    }
    if inputs.has_tle {
        AiPanel::Waiting
    } else {
        AiPanel::Idle
    }
}

/// Placeholder shown in place of an empty result list.
pub fn list_message(term: &str, min_len: usize, result_count: usize, loading: bool) -> Option<&'static str> {
    if loading || result_count > 0 {
        None
    } else if term.chars().count() < min_len {
        Some(MIN_QUERY_HINT)
    } else {
        Some(NO_RESULTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> AiPanelInputs<'static> {
        AiPanelInputs {
            error: None,
            api_key_provided: true,
            enabled: true,
            loading: false,
            description: None,
            has_tle: false,
        }
    }

    #[test]
    fn error_takes_priority() {
        let panel = ai_panel(AiPanelInputs {
            error: Some("boom"),
            api_key_provided: false,
            loading: true,
            ..inputs()
        });
        assert_eq!(panel, AiPanel::Error { message: "boom".into() });
    }

    #[test]
    fn key_then_toggle_then_loading() {
        assert_eq!(
            ai_panel(AiPanelInputs { api_key_provided: false, enabled: false, ..inputs() }),
            AiPanel::NoApiKey
        );
        assert_eq!(
            ai_panel(AiPanelInputs { enabled: false, loading: true, ..inputs() }),
            AiPanel::Disabled
        );
        assert_eq!(
            ai_panel(AiPanelInputs { loading: true, description: Some("old"), ..inputs() }),
            AiPanel::Loading
        );
    }

    #[test]
    fn description_waiting_idle() {
        assert_eq!(
            ai_panel(AiPanelInputs { description: Some("text"), ..inputs() }),
            AiPanel::Ready { text: "text".into() }
        );
        assert_eq!(ai_panel(AiPanelInputs { has_tle: true, ..inputs() }), AiPanel::Waiting);
        assert_eq!(ai_panel(inputs()), AiPanel::Idle);
        assert_eq!(AiPanel::NoApiKey.to_string(), "no_api_key");
        assert_eq!(AiPanel::Ready { text: "hello".into() }.message(), "hello");
    }

    #[test]
    fn list_placeholder() {
        assert_eq!(list_message("is", 3, 0, false), Some(MIN_QUERY_HINT));
        assert_eq!(list_message("zzzz", 3, 0, false), Some(NO_RESULTS));
        assert_eq!(list_message("zzzz", 3, 0, true), None);
        assert_eq!(list_message("iss", 3, 4, false), None);
    }
}
