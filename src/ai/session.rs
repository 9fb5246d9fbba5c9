use super::{ChatError, ChatMessage, ChatTransport, Role, SystemProfile};

pub const SYSTEM_PROMPT: &str = "You are SysSKY, an AI assistant developed by Team SysSKY.\n\
Your purpose is to help users understand, optimize, and troubleshoot their systems.\n\
You have access to real-time system information such as CPU usage, RAM, Disk, Processes, and more.\n\
Use this data to give clear, actionable advice.\n\
Always respond in a helpful, professional tone.\n\
Do not make up data; only use what's provided in the system profile or user input.\n\
Start by welcoming the user and offering assistance.";

/// A conversation that remembers its turns. Transport failures come back as
/// `"Error: ..."` text rather than as errors.
pub struct ChatSession<T> {
    transport: T,
    profile_text: String,
    history: Vec<ChatMessage>,
}

impl<T: ChatTransport> ChatSession<T> {
    /// Starts the conversation by sending the role prompt. A failure here is
    /// logged and the session stays usable.
    pub fn new(transport: T, profile: &SystemProfile) -> Self {
        let mut session = Self {
            transport,
            profile_text: profile.to_prompt_text(),
            history: Vec::new(),
        };
        session.introduce();
        session
    }

    pub fn send(&mut self, prompt: &str) -> String {
        let augmented = format!(
            "System Info: {}. User Question: {}",
            self.profile_text, prompt
        );
        match self.exchange(augmented) {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("Chat request failed: {}", e);
                format!("Error: {}", e)
            }
        }
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.introduce();
    }

    /// The reply to the role prompt, if the model produced one.
    pub fn greeting(&self) -> Option<&str> {
        match self.history.get(1) {
            Some(msg) if msg.role == Role::Model => Some(&msg.text),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn history_for_display(&self) -> String {
        let mut history_text = String::new();
        for message in &self.history {
            let role = match message.role {
                Role::User => "User",
                Role::Model => "SysSKY",
            };
            history_text.push_str(&format!("{}: {}\n", role, message.text));
        }
        history_text
    }

    fn introduce(&mut self) {
        if let Err(e) = self.exchange(SYSTEM_PROMPT.to_string()) {
            log::error!("Error initializing chat with role: {}", e);
        }
    }

    /// Failed turns are not kept.
    fn exchange(&mut self, text: String) -> Result<String, ChatError> {
        self.history.push(ChatMessage::user(text));
        match self.transport.complete(&self.history) {
            Ok(reply) => {
                self.history.push(ChatMessage::model(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                self.history.pop();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct ScriptedTransport {
        replies: VecDeque<Result<String, ChatError>>,
        seen: Vec<Vec<ChatMessage>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<&str, ChatError>>) -> Self {
            Self {
                replies: replies.into_iter().map(|r| r.map(String::from)).collect(),
                seen: Vec::new(),
            }
        }
    }

    impl ChatTransport for ScriptedTransport {
        fn complete(&mut self, history: &[ChatMessage]) -> Result<String, ChatError> {
            self.seen.push(history.to_vec());
            self.replies.pop_front().unwrap_or(Err(ChatError::EmptyReply))
        }
    }

    fn profile() -> SystemProfile {
        SystemProfile {
            os: "Linux".into(),
            ..Default::default()
        }
    }

    #[test]
    fn opens_with_role_prompt_and_keeps_greeting() {
        let session = ChatSession::new(ScriptedTransport::new(vec![Ok("Welcome!")]), &profile());

        assert_eq!(session.greeting(), Some("Welcome!"));
        assert_eq!(session.history()[0], ChatMessage::user(SYSTEM_PROMPT));
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn prompts_carry_profile_and_full_history() {
        let transport = ScriptedTransport::new(vec![Ok("Welcome!"), Ok("Close some tabs.")]);
        let mut session = ChatSession::new(transport, &profile());

        let reply = session.send("Why is my RAM full?");

        assert_eq!(reply, "Close some tabs.");
        let last_request = session.transport.seen.last().unwrap();
        assert_eq!(last_request.len(), 3);
        assert!(last_request[2].text.starts_with("System Info: {\"os\":\"Linux\""));
        assert!(last_request[2].text.ends_with(". User Question: Why is my RAM full?"));
        assert_eq!(session.history().len(), 4);
    }

    #[test]
    fn failures_come_back_as_text_and_are_not_remembered() {
        let transport = ScriptedTransport::new(vec![
            Ok("Welcome!"),
            Err(ChatError::Status {
                status: 403,
                body: "API key invalid".into(),
            }),
        ]);
        let mut session = ChatSession::new(transport, &profile());

        let reply = session.send("hello?");

        assert_eq!(reply, "Error: API returned status 403: API key invalid");
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn failed_role_prompt_leaves_usable_session() {
        let transport = ScriptedTransport::new(vec![Err(ChatError::MissingApiKey), Ok("Hi")]);
        let mut session = ChatSession::new(transport, &profile());

        assert_eq!(session.greeting(), None);
        assert!(session.history().is_empty());
        assert_eq!(session.send("ping"), "Hi");
    }

    #[test]
    fn reset_starts_over_with_role_prompt() {
        let transport = ScriptedTransport::new(vec![Ok("Welcome!"), Ok("Sure."), Ok("Welcome back!")]);
        let mut session = ChatSession::new(transport, &profile());
        session.send("help");

        session.reset();

        assert_eq!(session.history().len(), 2);
        assert_eq!(session.greeting(), Some("Welcome back!"));
        assert_eq!(session.transport.seen.last().unwrap().len(), 1);
    }

    #[test]
    fn display_history_labels_assistant_turns() {
        let transport = ScriptedTransport::new(vec![Ok("Welcome!")]);
        let session = ChatSession::new(transport, &profile());

        let text = session.history_for_display();
        assert!(text.starts_with("User: You are SysSKY"));
        assert!(text.ends_with("SysSKY: Welcome!\n"));
    }
}
