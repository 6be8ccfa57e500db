use thiserror::Error;

/// Fatal engine errors. Any of these aborts the current turn and ends the battle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("unknown participant #{0}")]
    UnknownParticipant(usize),

    #[error("unknown side #{0}")]
    UnknownSide(usize),

    #[error("unknown effect '{0}'")]
    UnknownEffect(String),

    #[error("effect '{id}' is a {actual}, expected a {expected}")]
    WrongEffectKind {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("unknown species or form '{0}'")]
    UnknownForm(String),

    #[error("volatile list of participant #{participant} is corrupt: {detail}")]
    CorruptVolatiles { participant: usize, detail: String },

    #[error("battle is over")]
    BattleOver,

    #[error("battle was aborted: {0}")]
    Aborted(String),

    #[error("invalid battle setup: {0}")]
    InvalidSetup(String),

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Errors raised while loading content into a catalog. Each one rejects a single
/// descriptor; loading carries on with the rest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("invalid effect id '{0}' (expected a lowercase alphanumeric key)")]
    InvalidId(String),

    #[error("duplicate effect id '{0}'")]
    DuplicateId(String),

    #[error("effect '{id}': unknown event '{event}'")]
    UnknownEvent { id: String, event: String },

    #[error("effect '{id}': unknown flag '{flag}'")]
    UnknownFlag { id: String, flag: String },

    #[error("effect '{id}': priority declared for '{event}' but no hook is bound")]
    OrphanPriority { id: String, event: String },

    #[error("hook bound to unknown effect '{id}' for '{event}'")]
    UnboundHook { id: String, event: String },

    #[error("malformed content entry: {0}")]
    Malformed(String),
}

/// What a handler reports when it cannot finish.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// Transient computation failure. The dispatcher logs it and treats the
    /// handler as having declined.
    #[error("handler fault: {0}")]
    Fault(String),

    /// Failure while mutating shared battle state.
    #[error(transparent)]
    Fatal(#[from] BattleError),
}

impl HookError {
    pub fn fault(message: impl Into<String>) -> Self {
        HookError::Fault(message.into())
    }
}
