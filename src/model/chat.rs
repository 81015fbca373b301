use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One line of the companion conversation, persisted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, sender: Sender, timestamp: DateTime<Utc>) -> Self {
        ChatMessage {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            timestamp,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage::new(text, Sender::User, Utc::now())
    }

    pub fn bot(text: impl Into<String>) -> Self {
        ChatMessage::new(text, Sender::Bot, Utc::now())
    }
}

/// Which companion the user is talking to. Stored as `"male"` / `"female"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Male,
    #[default]
    Female,
}

impl Persona {
    pub fn toggled(self) -> Persona {
        match self {
            Persona::Male => Persona::Female,
            Persona::Female => Persona::Male,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Persona::Male => "male",
            Persona::Female => "female",
        }
    }

    pub fn from_flag(flag: &str) -> Option<Persona> {
        match flag.trim() {
            "male" => Some(Persona::Male),
            "female" => Some(Persona::Female),
            _ => None,
        }
    }

    /// Companion display name
    pub fn name(self) -> &'static str {
        match self {
            Persona::Male => "Max",
            Persona::Female => "Luna",
        }
    }

    /// Opening line of a fresh conversation
    pub fn greeting(self) -> &'static str {
        match self {
            Persona::Male => {
                "Hey there! I'm Max, your time-bending sidekick. Ready to bend some minutes?"
            }
            Persona::Female => {
                "Hi! I'm Luna, your focus companion. Time is weird today, but we've got this."
            }
        }
    }
}
