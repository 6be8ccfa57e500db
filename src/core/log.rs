//! Display-facing battle log.
//!
//! Messages produced while a turn resolves are staged and only reach the sink
//! once the turn completes. An aborted turn throws its staged messages away.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Turn { number: u32 },
    Switch { who: String, species: String, hp: i32, max_hp: i32 },
    Move { who: String, name: String, target: Option<String> },
    Cant { who: String, reason: String },
    Damage { who: String, hp: i32, max_hp: i32, from: Option<String> },
    Heal { who: String, hp: i32, max_hp: i32, from: Option<String> },
    Boost { who: String, stat: String, amount: i32, from: Option<String> },
    Unboost { who: String, stat: String, amount: i32, from: Option<String> },
    BoostCapped { who: String, stat: String, rising: bool },
    Immune { who: String, from: Option<String> },
    Effectiveness { who: String, super_effective: bool },
    Ability { who: String, ability: String },
    Item { who: String, item: String, from: Option<String> },
    EndItem { who: String, item: String, note: Option<String> },
    FormeChange { who: String, form: String, from: Option<String> },
    Replace { who: String, details: String },
    Start { who: String, effect: String },
    Activate { who: String, effect: String },
    End { who: String, effect: String },
    Weather { id: String, upkeep: bool },
    FieldStart { id: String },
    FieldEnd { id: String },
    SideStart { side: String, condition: String },
    SideEnd { side: String, condition: String },
    Faint { who: String },
    Fail { who: String },
    Miss { who: String, target: String },
    Win { side: String },
    Debug { text: String },
}

fn from_suffix(from: &Option<String>) -> String {
    from.as_ref()
        .map(|f| format!("|[from] {}", f))
        .unwrap_or_default()
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Turn { number } => write!(f, "|turn|{}", number),
            Message::Switch { who, species, hp, max_hp } => {
                write!(f, "|switch|{}|{}|{}/{}", who, species, hp, max_hp)
            }
            Message::Move { who, name, target } => write!(
                f,
                "|move|{}|{}|{}",
                who,
                name,
                target.as_deref().unwrap_or("")
            ),
            Message::Cant { who, reason } => write!(f, "|cant|{}|{}", who, reason),
            Message::Damage { who, hp, max_hp, from } => {
                write!(f, "|-damage|{}|{}/{}{}", who, hp, max_hp, from_suffix(from))
            }
            Message::Heal { who, hp, max_hp, from } => {
                write!(f, "|-heal|{}|{}/{}{}", who, hp, max_hp, from_suffix(from))
            }
            Message::Boost { who, stat, amount, from } => {
                write!(f, "|-boost|{}|{}|{}{}", who, stat, amount, from_suffix(from))
            }
            Message::Unboost { who, stat, amount, from } => {
                write!(f, "|-unboost|{}|{}|{}{}", who, stat, amount, from_suffix(from))
            }
            Message::BoostCapped { who, stat, rising } => write!(
                f,
                "|-{}|{}|{}|0",
                if *rising { "boost" } else { "unboost" },
                who,
                stat
            ),
            Message::Immune { who, from } => write!(f, "|-immune|{}{}", who, from_suffix(from)),
            Message::Effectiveness { who, super_effective } => write!(
                f,
                "|-{}|{}",
                if *super_effective { "supereffective" } else { "resisted" },
                who
            ),
            Message::Ability { who, ability } => write!(f, "|-ability|{}|{}", who, ability),
            Message::Item { who, item, from } => {
                write!(f, "|-item|{}|{}{}", who, item, from_suffix(from))
            }
            Message::EndItem { who, item, note } => write!(
                f,
                "|-enditem|{}|{}{}",
                who,
                item,
                note.as_ref().map(|n| format!("|[{}]", n)).unwrap_or_default()
            ),
            Message::FormeChange { who, form, from } => {
                write!(f, "|-formechange|{}|{}{}", who, form, from_suffix(from))
            }
            Message::Replace { who, details } => write!(f, "|replace|{}|{}", who, details),
            Message::Start { who, effect } => write!(f, "|-start|{}|{}", who, effect),
            Message::Activate { who, effect } => write!(f, "|-activate|{}|{}", who, effect),
            Message::End { who, effect } => write!(f, "|-end|{}|{}", who, effect),
            Message::Weather { id, upkeep } => write!(
                f,
                "|-weather|{}{}",
                id,
                if *upkeep { "|[upkeep]" } else { "" }
            ),
            Message::FieldStart { id } => write!(f, "|-fieldstart|{}", id),
            Message::FieldEnd { id } => write!(f, "|-fieldend|{}", id),
            Message::SideStart { side, condition } => write!(f, "|-sidestart|{}|{}", side, condition),
            Message::SideEnd { side, condition } => write!(f, "|-sideend|{}|{}", side, condition),
            Message::Faint { who } => write!(f, "|faint|{}", who),
            Message::Fail { who } => write!(f, "|-fail|{}", who),
            Message::Miss { who, target } => write!(f, "|-miss|{}|{}", who, target),
            Message::Win { side } => write!(f, "|win|{}", side),
            Message::Debug { text } => write!(f, "|debug|{}", text),
        }
    }
}

/// Write-only consumer of committed messages.
pub trait DisplaySink {
    fn emit(&mut self, message: &Message);
}

/// Forwards committed messages to `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DisplaySink for TracingSink {
    fn emit(&mut self, message: &Message) {
        tracing::info!(target: "battle_hooks::display", "{}", message);
    }
}

#[derive(Default)]
pub struct BattleLog {
    committed: Vec<Message>,
    pending: Vec<Message>,
    sink: Option<Box<dyn DisplaySink>>,
}

impl fmt::Debug for BattleLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleLog")
            .field("committed", &self.committed.len())
            .field("pending", &self.pending.len())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sink(&mut self, sink: Box<dyn DisplaySink>) {
        self.sink = Some(sink);
    }

    pub fn push(&mut self, message: Message) {
        self.pending.push(message);
    }

    pub fn commit(&mut self) {
        for message in self.pending.drain(..) {
            if let Some(sink) = self.sink.as_mut() {
                sink.emit(&message);
            }
            self.committed.push(message);
        }
    }

    /// Drops everything staged since the last commit. Returns how many messages were discarded.
    pub fn rollback(&mut self) -> usize {
        let discarded = self.pending.len();
        self.pending.clear();
        discarded
    }

    pub fn committed(&self) -> &[Message] {
        &self.committed
    }

    pub fn pending(&self) -> &[Message] {
        &self.pending
    }

    /// Committed messages followed by staged ones.
    pub fn entries(&self) -> impl Iterator<Item = &Message> {
        self.committed.iter().chain(self.pending.iter())
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries().map(|m| m.to_string()).collect()
    }
}
