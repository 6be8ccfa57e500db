use crate::core::battle::Battle;
use crate::core::dispatch::HookEvent;
use crate::core::events::EventKind;
use crate::core::modifier::Modifier;
use crate::error::HookError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Ability,
    Item,
    VolatileCondition,
    FieldCondition,
}

impl EffectKind {
    pub fn label(self) -> &'static str {
        match self {
            EffectKind::Ability => "ability",
            EffectKind::Item => "item",
            EffectKind::VolatileCondition => "volatile condition",
            EffectKind::FieldCondition => "field condition",
        }
    }
}

/// Where a field condition lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSlot {
    Weather,
    Terrain,
    Side,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectFlag {
    Unbreakable,
    Nonstandard,
    Nontransferable,
    Stackable,
    Persistent,
    Berry,
    Identity,
}

impl FromStr for EffectFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unbreakable" => Ok(EffectFlag::Unbreakable),
            "nonstandard" => Ok(EffectFlag::Nonstandard),
            "nontransferable" => Ok(EffectFlag::Nontransferable),
            "stackable" => Ok(EffectFlag::Stackable),
            "persistent" => Ok(EffectFlag::Persistent),
            "berry" => Ok(EffectFlag::Berry),
            "identity" => Ok(EffectFlag::Identity),
            _ => Err(s.to_string()),
        }
    }
}

/// A numeric adjustment proposed by a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjust {
    Chain(Modifier),
    Set(i64),
}

/// Handler result.
///
/// `Continue(None)` means no opinion. `Override` replaces the value and closes the
/// chain. `Deny` stops the dispatch outright.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue(Option<Adjust>),
    Override(i64),
    Deny,
}

impl Outcome {
    pub const PASS: Outcome = Outcome::Continue(None);

    pub fn chain(modifier: Modifier) -> Self {
        Outcome::Continue(Some(Adjust::Chain(modifier)))
    }

    pub fn set(value: i64) -> Self {
        Outcome::Continue(Some(Adjust::Set(value)))
    }
}

pub type HookResult = Result<Outcome, HookError>;

pub type HookFn = fn(&mut Battle, &mut HookEvent<'_>) -> HookResult;

#[derive(Clone, Copy)]
pub struct Hook {
    pub callback: HookFn,
    pub priority: i32,
    pub sub_order: i32,
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("priority", &self.priority)
            .field("sub_order", &self.sub_order)
            .finish_non_exhaustive()
    }
}

/// Immutable description of an ability, item or condition.
#[derive(Clone, Debug)]
pub struct EffectDescriptor {
    pub id: String,
    pub name: String,
    pub kind: EffectKind,
    pub slot: Option<FieldSlot>,
    pub flags: BTreeSet<EffectFlag>,
    pub hooks: BTreeMap<EventKind, Hook>,
    pub duration: Option<u32>,
    pub desc: Option<String>,
    pub extra: BTreeMap<String, Value>,
}

impl EffectDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: EffectKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            slot: None,
            flags: BTreeSet::new(),
            hooks: BTreeMap::new(),
            duration: None,
            desc: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn ability(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, EffectKind::Ability)
    }

    pub fn item(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, EffectKind::Item)
    }

    pub fn volatile(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, EffectKind::VolatileCondition)
    }

    pub fn weather(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, EffectKind::FieldCondition).in_slot(FieldSlot::Weather)
    }

    pub fn terrain(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, EffectKind::FieldCondition).in_slot(FieldSlot::Terrain)
    }

    pub fn side_condition(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, EffectKind::FieldCondition).in_slot(FieldSlot::Side)
    }

    pub fn in_slot(mut self, slot: FieldSlot) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn flag(mut self, flag: EffectFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn on(self, event: EventKind, callback: HookFn) -> Self {
        self.on_with_priority(event, 0, callback)
    }

    pub fn on_with_priority(mut self, event: EventKind, priority: i32, callback: HookFn) -> Self {
        self.hooks.insert(
            event,
            Hook {
                callback,
                priority,
                sub_order: 0,
            },
        );
        self
    }

    pub fn sub_order(mut self, event: EventKind, sub_order: i32) -> Self {
        if let Some(hook) = self.hooks.get_mut(&event) {
            hook.sub_order = sub_order;
        }
        self
    }

    pub fn duration(mut self, turns: u32) -> Self {
        self.duration = Some(turns);
        self
    }

    pub fn describe(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn has_flag(&self, flag: EffectFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn hook(&self, event: EventKind) -> Option<&Hook> {
        self.hooks.get(&event)
    }

    pub fn priority(&self, event: EventKind) -> i32 {
        self.hooks.get(&event).map(|h| h.priority).unwrap_or(0)
    }

    pub fn is_nonstandard(&self) -> bool {
        self.has_flag(EffectFlag::Nonstandard)
    }
}
