//! Slack message types returned from the slash-command and interactive
//! endpoints.
//!
//! These serialize to the legacy message-attachment format, which is what
//! interactive buttons and menus are built from.

use serde::Serialize;

use crate::domain::models::MinutesOfDay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    InChannel,
    Ephemeral,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlackMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub replace_original: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl SlackMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Visible to the whole channel, replacing the prompt it answers.
    pub fn in_channel(text: impl Into<String>) -> Self {
        Self {
            response_type: Some(ResponseType::InChannel),
            replace_original: true,
            ..Self::text(text)
        }
    }

    /// Visible only to the requesting user. The prompt stays in place.
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: Some(ResponseType::Ephemeral),
            ..Self::text(text)
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub callback_id: String,
    pub actions: Vec<AttachmentAction>,
}

impl Attachment {
    pub fn new(callback_id: impl Into<String>) -> Self {
        Self {
            callback_id: callback_id.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_action(mut self, action: AttachmentAction) -> Self {
        self.actions.push(action);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Button,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStyle {
    Default,
    Primary,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentAction {
    pub name: String,
    pub text: String,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ActionStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ActionOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm: Option<Confirmation>,
}

impl AttachmentAction {
    fn new(name: &str, text: &str, action_type: ActionType) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
            action_type,
            value: name.to_string(),
            style: None,
            url: None,
            data_source: None,
            options: Vec::new(),
            confirm: None,
        }
    }

    pub fn button(name: &str, text: &str) -> Self {
        Self::new(name, text, ActionType::Button)
    }

    pub fn select(name: &str, text: &str, options: Vec<ActionOption>) -> Self {
        Self {
            options,
            ..Self::new(name, text, ActionType::Select)
        }
    }

    /// A menu filled by Slack itself, e.g. `channels`.
    pub fn dynamic_select(name: &str, text: &str, data_source: &str) -> Self {
        Self {
            data_source: Some(data_source.to_string()),
            ..Self::new(name, text, ActionType::Select)
        }
    }

    pub fn with_style(mut self, style: ActionStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_confirm(mut self, text: impl Into<String>) -> Self {
        self.confirm = Some(Confirmation::yes_no(text));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOption {
    pub text: String,
    pub value: String,
}

impl ActionOption {
    /// `HH:MM` options from `first` to `last` inclusive.
    pub fn times(first: MinutesOfDay, last: MinutesOfDay, step_minutes: u16) -> Vec<Self> {
        (first.get()..=last.get())
            .step_by(usize::from(step_minutes.max(1)))
            .filter_map(|m| MinutesOfDay::new(i64::from(m)).ok())
            .map(|m| {
                let label = format!("{:02}:{:02}", m.hour(), m.minute());
                Self {
                    text: label.clone(),
                    value: label,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub text: String,
    pub ok_text: String,
    pub dismiss_text: String,
}

impl Confirmation {
    pub fn yes_no(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ok_text: "はい".to_string(),
            dismiss_text: "いいえ".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn time_options_are_zero_padded() {
        let options = ActionOption::times(
            MinutesOfDay::from_hm(8, 30).unwrap(),
            MinutesOfDay::from_hm(11, 0).unwrap(),
            30,
        );
        let values: Vec<_> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(
            values,
            ["08:30", "09:00", "09:30", "10:00", "10:30", "11:00"]
        );
    }

    #[test]
    fn message_serializes_to_attachment_format() {
        let message = SlackMessage::default().with_attachment(
            Attachment::new("attendance_button").with_action(
                AttachmentAction::button("reset", "リセットする")
                    .with_style(ActionStyle::Danger)
                    .with_confirm("本当に本日の勤怠をリセットしますか？"),
            ),
        );

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "attachments": [{
                    "callback_id": "attendance_button",
                    "actions": [{
                        "name": "reset",
                        "text": "リセットする",
                        "type": "button",
                        "value": "reset",
                        "style": "danger",
                        "confirm": {
                            "text": "本当に本日の勤怠をリセットしますか？",
                            "ok_text": "はい",
                            "dismiss_text": "いいえ"
                        }
                    }]
                }]
            })
        );
    }

    #[test]
    fn ephemeral_keeps_original() {
        let value = serde_json::to_value(SlackMessage::ephemeral("失敗")).unwrap();
        assert_eq!(
            value,
            json!({ "response_type": "ephemeral", "text": "失敗" })
        );

        let value = serde_json::to_value(SlackMessage::in_channel("成功")).unwrap();
        assert_eq!(value["replace_original"], json!(true));
        assert_eq!(value["response_type"], json!("in_channel"));
    }
}
