//! Slash-command integration.
//!
//! A command is acknowledged right away; the chart is rendered afterwards by
//! [`dispatcher::CallbackDispatcher`], which posts a link back to the
//! command's `response_url` once the image is cached.

pub mod dispatcher;
pub mod handlers;

use serde::{Deserialize, Serialize};
use url::Url;

pub const HELP_TEXT: &str = "Usage: /epigraph <TV series title>\n\
Renders the IMDb rating of every episode, one line per season.\n\
Use `/epigraph top250` for a random pick from the top rated TV chart.";

/// Parameters a chat platform sends with a slash command.
///
/// Both fields are optional so a malformed command can be answered with
/// [`HELP_TEXT`] rather than a rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlackCommand {
    pub text: Option<String>,
    pub response_url: Option<String>,
}

impl SlackCommand {
    /// The trimmed command text and a usable callback URL, if both exist.
    pub fn validate(&self) -> Option<(String, Url)> {
        let text = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        let response_url = self
            .response_url
            .as_deref()
            .and_then(|raw| Url::parse(raw.trim()).ok())
            .filter(|url| matches!(url.scheme(), "http" | "https"))?;
        Some((text.to_string(), response_url))
    }
}

/// Immediate reply to a slash command.
#[derive(Debug, Clone, Serialize)]
pub struct Acknowledgment {
    pub response_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Acknowledgment {
    pub fn in_channel(text: impl Into<String>) -> Self {
        Self {
            response_type: "in_channel",
            text: Some(text.into()),
        }
    }
}

/// Follow-up message carrying the chart link.
#[derive(Debug, Clone, Serialize)]
pub struct ChartCallback {
    pub response_type: &'static str,
    pub replace_original: bool,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub image_url: String,
}

impl ChartCallback {
    pub fn new(image_url: &Url) -> Self {
        Self {
            response_type: "in_channel",
            replace_original: true,
            attachments: vec![Attachment {
                image_url: image_url.to_string(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn command(text: Option<&str>, response_url: Option<&str>) -> SlackCommand {
        SlackCommand {
            text: text.map(String::from),
            response_url: response_url.map(String::from),
        }
    }

    #[test]
    fn complete_command_is_accepted() {
        let (text, url) = command(
            Some("  Breaking Bad "),
            Some("https://hooks.slack.com/commands/T1/B2"),
        )
        .validate()
        .unwrap();

        assert_eq!(text, "Breaking Bad");
        assert_eq!(url.host_str(), Some("hooks.slack.com"));
    }

    #[test]
    fn incomplete_commands_fall_back_to_help() {
        let hook = Some("https://hooks.slack.com/commands/T1/B2");
        assert!(command(None, hook).validate().is_none());
        assert!(command(Some("   "), hook).validate().is_none());
        assert!(command(Some("Dark"), None).validate().is_none());
        assert!(command(Some("Dark"), Some("not a url")).validate().is_none());
        assert!(
            command(Some("Dark"), Some("ftp://hooks.example.com/x"))
                .validate()
                .is_none()
        );
    }

    #[test]
    fn callback_payload_shape() {
        let link = Url::parse(
            "https://graphs.example.com/graph?title=Dark&uuid=7b0e9a56-5f38-4c39-a7c6-1f3c7e0d2b51",
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(ChartCallback::new(&link)).unwrap(),
            json!({
                "response_type": "in_channel",
                "replace_original": true,
                "attachments": [{ "image_url": link.as_str() }],
            })
        );
    }

    #[test]
    fn acknowledgment_omits_missing_text() {
        let ack = Acknowledgment {
            response_type: "in_channel",
            text: None,
        };
        assert_eq!(
            serde_json::to_value(ack).unwrap(),
            json!({ "response_type": "in_channel" })
        );
    }
}
