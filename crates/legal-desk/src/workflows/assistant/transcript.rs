use serde::{Deserialize, Serialize};

use super::responder::respond;
use crate::render::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatSender {
    User,
    Bot,
}

impl ChatSender {
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: ChatSender,
}

impl ChatMessage {
    pub fn render_html(&self) -> String {
        format!(
            "<div class=\"chat-message {}\"><p>{}</p></div>",
            self.sender.css_class(),
            escape_html(&self.text)
        )
    }
}

/// One visitor message and the assistant reply it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatExchange {
    pub user: ChatMessage,
    pub bot: ChatMessage,
}

/// Ordered, append-only conversation for one visitor session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    /// Records the trimmed message and the scripted reply. Blank input is ignored.
    pub fn send(&mut self, raw: &str) -> Option<ChatExchange> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        let user = ChatMessage {
            text: text.to_string(),
            sender: ChatSender::User,
        };
        let bot = ChatMessage {
            text: respond(text).to_string(),
            sender: ChatSender::Bot,
        };
        self.messages.push(user.clone());
        self.messages.push(bot.clone());

        Some(ChatExchange { user, bot })
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
