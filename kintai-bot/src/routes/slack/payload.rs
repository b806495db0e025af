//! Form bodies Slack posts to the bot.

use serde::Deserialize;

/// Slash command, posted form-encoded.
#[derive(Debug, Clone, Deserialize)]
pub struct SlashCommand {
    pub token: String,
    pub team_id: String,
    pub user_id: String,
    #[serde(default)]
    pub text: String,
    pub response_url: String,
}

/// Interactive callbacks arrive as a single `payload` form field holding
/// JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionForm {
    pub payload: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionCallback {
    pub token: String,
    pub team: IdRef,
    pub user: IdRef,
    pub response_url: String,
    #[serde(default)]
    pub actions: Vec<CallbackAction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackAction {
    pub name: String,
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

impl CallbackAction {
    /// The picked menu value. Only select menus carry one.
    pub fn selected(&self) -> Option<&str> {
        if self.action_type != "select" {
            return None;
        }
        self.selected_options.first().map(|o| o.value.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOption {
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_menu_callback() {
        let callback: ActionCallback = serde_json::from_str(
            r#"{
                "type": "interactive_message",
                "token": "verify",
                "callback_id": "attendance_button",
                "team": {"id": "T1", "domain": "acme"},
                "user": {"id": "U1", "name": "taro"},
                "response_url": "https://hooks.slack.com/actions/T1/1/abc",
                "actions": [{
                    "name": "attend",
                    "type": "select",
                    "selected_options": [{"value": "09:30"}]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(callback.user.id, "U1");
        assert_eq!(callback.actions[0].name, "attend");
        assert_eq!(callback.actions[0].selected(), Some("09:30"));
    }

    #[test]
    fn button_has_no_selection() {
        let action: CallbackAction =
            serde_json::from_str(r#"{"name":"reset","type":"button","value":"reset"}"#).unwrap();
        assert_eq!(action.action_type, "button");
        assert_eq!(action.selected(), None);
    }

    #[test]
    fn options_on_a_button_are_ignored() {
        let action: CallbackAction = serde_json::from_str(
            r#"{"name":"attend","type":"button","selected_options":[{"value":"09:30"}]}"#,
        )
        .unwrap();
        assert_eq!(action.selected(), None);
    }
}
