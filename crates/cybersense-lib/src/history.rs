use std::fmt::Write as _;

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn label(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Assistant => "ASSISTANT",
        }
    }
}

/// One prior conversation turn. The pipeline treats history as opaque
/// text to append to a prompt; it owns no dialogue state.
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Flatten prior turns into a plain-text block for prompt injection.
///
/// Returns an empty string for empty history. Deliberately flat text
/// rather than the provider's structured multi-turn format; swapping in a
/// structured API only requires replacing this function.
#[must_use]
pub fn format_history(turns: &[Turn]) -> String {
    if turns.is_empty() {
        return String::new();
    }

    let mut out = String::from("\n\nPrevious conversation:");
    for turn in turns {
        let _ = write!(out, "\n{}: {}", turn.role.label(), turn.content);
    }
    out
}
