use crate::core::state::ParticipantId;
use crate::data::moves::ActiveMove;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the dispatcher aggregates handler results for an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventShape {
    Value,
    Check,
    Notify,
}

/// Every event a hook can be registered for.
///
/// For the stat and damage events the target is the participant whose value is
/// being computed (the attacker for `ModifyAtk` and `ModifyDamage`), and the source
/// is the other side of the exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    BeforeSwitchIn,
    SwitchIn,
    SwitchOut,
    Start,
    End,
    Faint,
    ModifyPriority,
    BeforeMove,
    ModifyMove,
    TryHit,
    Immunity,
    BasePower,
    ModifyAtk,
    ModifyDef,
    ModifySpA,
    ModifySpD,
    ModifySpe,
    ModifyDamage,
    ModifyWeight,
    SourceModifyAtk,
    SourceModifyDef,
    SourceModifySpA,
    SourceModifySpD,
    SourceModifyDamage,
    Damage,
    AfterDamage,
    Residual,
    Terrain,
    TakeItem,
}

impl EventKind {
    pub const ALL: [EventKind; 29] = [
        EventKind::BeforeSwitchIn,
        EventKind::SwitchIn,
        EventKind::SwitchOut,
        EventKind::Start,
        EventKind::End,
        EventKind::Faint,
        EventKind::ModifyPriority,
        EventKind::BeforeMove,
        EventKind::ModifyMove,
        EventKind::TryHit,
        EventKind::Immunity,
        EventKind::BasePower,
        EventKind::ModifyAtk,
        EventKind::ModifyDef,
        EventKind::ModifySpA,
        EventKind::ModifySpD,
        EventKind::ModifySpe,
        EventKind::ModifyDamage,
        EventKind::ModifyWeight,
        EventKind::SourceModifyAtk,
        EventKind::SourceModifyDef,
        EventKind::SourceModifySpA,
        EventKind::SourceModifySpD,
        EventKind::SourceModifyDamage,
        EventKind::Damage,
        EventKind::AfterDamage,
        EventKind::Residual,
        EventKind::Terrain,
        EventKind::TakeItem,
    ];

    pub fn shape(self) -> EventShape {
        match self {
            EventKind::ModifyPriority
            | EventKind::BasePower
            | EventKind::ModifyAtk
            | EventKind::ModifyDef
            | EventKind::ModifySpA
            | EventKind::ModifySpD
            | EventKind::ModifySpe
            | EventKind::ModifyDamage
            | EventKind::ModifyWeight
            | EventKind::SourceModifyAtk
            | EventKind::SourceModifyDef
            | EventKind::SourceModifySpA
            | EventKind::SourceModifySpD
            | EventKind::SourceModifyDamage
            | EventKind::Damage => EventShape::Value,
            EventKind::Start
            | EventKind::BeforeMove
            | EventKind::TryHit
            | EventKind::Immunity
            | EventKind::TakeItem => EventShape::Check,
            EventKind::BeforeSwitchIn
            | EventKind::SwitchIn
            | EventKind::SwitchOut
            | EventKind::End
            | EventKind::Faint
            | EventKind::ModifyMove
            | EventKind::AfterDamage
            | EventKind::Residual
            | EventKind::Terrain => EventShape::Notify,
        }
    }

    /// The variant the source participant's effects answer to, for source-relative events.
    pub fn source_variant(self) -> Option<EventKind> {
        match self {
            EventKind::ModifyAtk => Some(EventKind::SourceModifyAtk),
            EventKind::ModifyDef => Some(EventKind::SourceModifyDef),
            EventKind::ModifySpA => Some(EventKind::SourceModifySpA),
            EventKind::ModifySpD => Some(EventKind::SourceModifySpD),
            EventKind::ModifyDamage => Some(EventKind::SourceModifyDamage),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EventKind::BeforeSwitchIn => "BeforeSwitchIn",
            EventKind::SwitchIn => "SwitchIn",
            EventKind::SwitchOut => "SwitchOut",
            EventKind::Start => "Start",
            EventKind::End => "End",
            EventKind::Faint => "Faint",
            EventKind::ModifyPriority => "ModifyPriority",
            EventKind::BeforeMove => "BeforeMove",
            EventKind::ModifyMove => "ModifyMove",
            EventKind::TryHit => "TryHit",
            EventKind::Immunity => "Immunity",
            EventKind::BasePower => "BasePower",
            EventKind::ModifyAtk => "ModifyAtk",
            EventKind::ModifyDef => "ModifyDef",
            EventKind::ModifySpA => "ModifySpA",
            EventKind::ModifySpD => "ModifySpD",
            EventKind::ModifySpe => "ModifySpe",
            EventKind::ModifyDamage => "ModifyDamage",
            EventKind::ModifyWeight => "ModifyWeight",
            EventKind::SourceModifyAtk => "SourceModifyAtk",
            EventKind::SourceModifyDef => "SourceModifyDef",
            EventKind::SourceModifySpA => "SourceModifySpA",
            EventKind::SourceModifySpD => "SourceModifySpD",
            EventKind::SourceModifyDamage => "SourceModifyDamage",
            EventKind::Damage => "Damage",
            EventKind::AfterDamage => "AfterDamage",
            EventKind::Residual => "Residual",
            EventKind::Terrain => "Terrain",
            EventKind::TakeItem => "TakeItem",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownEvent(pub String);

impl FromStr for EventKind {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed
            .strip_prefix("on")
            .filter(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
            .unwrap_or(trimmed);
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| UnknownEvent(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Cause {
    Effect(String),
    Move(ActiveMove),
}

impl Cause {
    pub fn effect_id(&self) -> Option<&str> {
        match self {
            Cause::Effect(id) => Some(id.as_str()),
            Cause::Move(_) => None,
        }
    }

    pub fn as_move(&self) -> Option<&ActiveMove> {
        match self {
            Cause::Move(active) => Some(active),
            Cause::Effect(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventContext {
    pub target: Option<ParticipantId>,
    pub source: Option<ParticipantId>,
    pub cause: Option<Cause>,
}

impl EventContext {
    pub fn on(target: ParticipantId) -> Self {
        Self {
            target: Some(target),
            source: None,
            cause: None,
        }
    }

    pub fn field() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: ParticipantId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_source_opt(mut self, source: Option<ParticipantId>) -> Self {
        self.source = source;
        self
    }

    pub fn caused_by_effect(mut self, id: impl Into<String>) -> Self {
        self.cause = Some(Cause::Effect(id.into()));
        self
    }

    pub fn caused_by_move(mut self, active: ActiveMove) -> Self {
        self.cause = Some(Cause::Move(active));
        self
    }

    pub fn active_move(&self) -> Option<&ActiveMove> {
        self.cause.as_ref().and_then(Cause::as_move)
    }

    pub fn active_move_mut(&mut self) -> Option<&mut ActiveMove> {
        match self.cause.as_mut() {
            Some(Cause::Move(active)) => Some(active),
            _ => None,
        }
    }

    pub fn cause_effect_id(&self) -> Option<&str> {
        self.cause.as_ref().and_then(Cause::effect_id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventResult {
    Value(i64),
    Allowed,
    Denied,
}

impl EventResult {
    pub fn is_denied(self) -> bool {
        matches!(self, EventResult::Denied)
    }

    pub fn is_allowed(self) -> bool {
        !self.is_denied()
    }

    pub fn value(self) -> Option<i64> {
        match self {
            EventResult::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn value_or(self, fallback: i64) -> i64 {
        self.value().unwrap_or(fallback)
    }
}
