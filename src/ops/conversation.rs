use crate::io::store::{PreferenceStore, keys};
use crate::model::chat::{ChatMessage, Persona};

/// The companion chat: persona flag plus message history, both persisted.
///
/// Storage failures are logged by the store and otherwise ignored; the
/// in-memory history always reflects what the user saw.
pub struct Conversation {
    store: PreferenceStore,
    persona: Persona,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Load the persona and history. An empty history starts with the
    /// persona's greeting.
    pub fn load(store: PreferenceStore) -> Self {
        let persona = match store.read::<Persona>(keys::COMPANION_GENDER) {
            Ok(Some(p)) => p,
            Ok(None) => Persona::default(),
            Err(e) => {
                log::warn!("unreadable companion flag, using default: {}", e);
                Persona::default()
            }
        };
        let messages = store.load_or_default::<Vec<ChatMessage>>(keys::CHAT_MESSAGES);
        let mut conversation = Conversation {
            store,
            persona,
            messages,
        };
        if conversation.messages.is_empty() {
            conversation.greet();
        }
        conversation
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.persist();
    }

    /// Flip the persona. The history is cleared and restarted with the new
    /// persona's greeting.
    pub fn switch_persona(&mut self) -> Persona {
        self.persona = self.persona.toggled();
        self.store.save_or_log(keys::COMPANION_GENDER, &self.persona);
        log::info!("companion persona is now {}", self.persona.as_str());
        self.messages.clear();
        self.greet();
        self.persona
    }

    /// Wipe the history, keeping the persona.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.greet();
    }

    fn greet(&mut self) {
        self.push(ChatMessage::bot(self.persona.greeting()));
    }

    fn persist(&self) {
        self.store.save_or_log(keys::CHAT_MESSAGES, &self.messages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::chat::Sender;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn fresh_store_greets_with_default_persona() {
        let dir = TempDir::new().unwrap();
        let convo = Conversation::load(PreferenceStore::new(dir.path()));
        assert_eq!(convo.persona(), Persona::Female);
        assert_eq!(convo.messages().len(), 1);
        assert_eq!(convo.messages()[0].text, Persona::Female.greeting());
        assert_eq!(convo.messages()[0].sender, Sender::Bot);
    }

    #[test]
    fn switching_persona_clears_and_persists() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::new(dir.path());
        let mut convo = Conversation::load(store.clone());
        convo.push(ChatMessage::user("hello"));
        convo.push(ChatMessage::bot("hi!"));
        assert_eq!(convo.messages().len(), 3);

        assert_eq!(convo.switch_persona(), Persona::Male);
        assert_eq!(convo.messages().len(), 1);

        let flag = fs::read_to_string(dir.path().join("companion_gender.json")).unwrap();
        assert_eq!(flag.trim(), "\"male\"");

        let reloaded = Conversation::load(store);
        assert_eq!(reloaded.persona(), Persona::Male);
        assert_eq!(reloaded.messages().len(), 1);
        assert_eq!(reloaded.messages()[0].text, Persona::Male.greeting());
    }

    #[test]
    fn history_survives_reload() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::new(dir.path());
        let mut convo = Conversation::load(store.clone());
        convo.push(ChatMessage::user("how are you?"));
        let reloaded = Conversation::load(store);
        assert_eq!(reloaded.messages(), convo.messages());
    }

    #[test]
    fn malformed_history_falls_back_to_greeting() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("chat_messages.json"), "[{oops").unwrap();
        fs::write(dir.path().join("companion_gender.json"), "42").unwrap();
        let convo = Conversation::load(PreferenceStore::new(dir.path()));
        assert_eq!(convo.persona(), Persona::Female);
        assert_eq!(convo.messages().len(), 1);
    }

    #[test]
    fn clear_keeps_persona() {
        let dir = TempDir::new().unwrap();
        let mut convo = Conversation::load(PreferenceStore::new(dir.path()));
        convo.switch_persona();
        convo.push(ChatMessage::user("yo"));
        convo.clear();
        assert_eq!(convo.persona(), Persona::Male);
        assert_eq!(convo.messages().len(), 1);
    }
}
