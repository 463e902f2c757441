use serde::Serialize;

/// Opening user line of every fresh conversation.
pub const SEED_USER_GREETING: &str = "Hello!";
/// Assistant reply seeded after the opening line.
pub const SEED_ASSISTANT_GREETING: &str = "Hello! What topic would you like to talk about?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    pub sequence: u64,
}

/// Framing applied to the assistant's replies without showing up in the
/// transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationMode {
    /// Dig into sources and evidence.
    Research,
    /// Argue the opposing side to sharpen the learner's position.
    Debate,
    Custom(String),
}

impl ConversationMode {
    /// Instruction handed to the model while this mode is active.
    #[must_use]
    pub fn instruction(&self) -> &str {
        match self {
            ConversationMode::Research => {
                "Act as a research partner: explain the evidence behind each claim and suggest sources or search queries to follow up."
            }
            ConversationMode::Debate => {
                "Act as a debate partner: take a reasoned opposing position, challenge the learner's arguments, and ask them to defend their view."
            }
            ConversationMode::Custom(text) => text,
        }
    }
}

/// Ordered chat transcript plus the active mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    turns: Vec<ConversationTurn>,
    mode: Option<ConversationMode>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    /// A conversation holding only the two seeded greeting turns.
    #[must_use]
    pub fn new() -> Self {
        let mut state = Self {
            turns: Vec::new(),
            mode: None,
        };
        state.seed();
        state
    }

    fn seed(&mut self) {
        self.append_turn(Role::User, SEED_USER_GREETING);
        self.append_turn(Role::Assistant, SEED_ASSISTANT_GREETING);
    }

    /// Append a visible turn and return it.
    pub fn append_turn(&mut self, role: Role, text: impl Into<String>) -> &ConversationTurn {
        let sequence = self.turns.len() as u64 + 1;
        self.turns.push(ConversationTurn {
            role,
            text: text.into(),
            sequence,
        });
        &self.turns[self.turns.len() - 1]
    }

    #[must_use]
    pub fn history(&self) -> &[ConversationTurn] {
        &self.turns
    }

    #[must_use]
    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    #[must_use]
    pub fn mode(&self) -> Option<&ConversationMode> {
        self.mode.as_ref()
    }

    pub fn set_mode(&mut self, mode: ConversationMode) {
        self.mode = Some(mode);
    }

    pub fn clear_mode(&mut self) {
        self.mode = None;
    }

    /// Drop every turn and the mode, returning to the seeded state.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.mode = None;
        self.seed();
    }
}
