use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

pub type ParticipantId = usize;

/// Condition-private scratch space.
pub type DataBag = HashMap<String, Value>;

pub const MAX_STAGE: i32 = 6;
pub const MIN_STAGE: i32 = -6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoostId {
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
    Accuracy,
    Evasion,
}

impl BoostId {
    pub const ALL: [BoostId; 7] = [
        BoostId::Atk,
        BoostId::Def,
        BoostId::Spa,
        BoostId::Spd,
        BoostId::Spe,
        BoostId::Accuracy,
        BoostId::Evasion,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BoostId::Atk => "atk",
            BoostId::Def => "def",
            BoostId::Spa => "spa",
            BoostId::Spd => "spd",
            BoostId::Spe => "spe",
            BoostId::Accuracy => "accuracy",
            BoostId::Evasion => "evasion",
        }
    }
}

impl From<Stat> for BoostId {
    fn from(stat: Stat) -> Self {
        match stat {
            Stat::Atk => BoostId::Atk,
            Stat::Def => BoostId::Def,
            Stat::Spa => BoostId::Spa,
            Stat::Spd => BoostId::Spd,
            Stat::Spe => BoostId::Spe,
        }
    }
}

/// Stat stages. Every entry stays within [-6, +6].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostTable {
    pub atk: i32,
    pub def: i32,
    pub spa: i32,
    pub spd: i32,
    pub spe: i32,
    pub accuracy: i32,
    pub evasion: i32,
}

impl BoostTable {
    pub fn get(&self, id: BoostId) -> i32 {
        match id {
            BoostId::Atk => self.atk,
            BoostId::Def => self.def,
            BoostId::Spa => self.spa,
            BoostId::Spd => self.spd,
            BoostId::Spe => self.spe,
            BoostId::Accuracy => self.accuracy,
            BoostId::Evasion => self.evasion,
        }
    }

    fn slot_mut(&mut self, id: BoostId) -> &mut i32 {
        match id {
            BoostId::Atk => &mut self.atk,
            BoostId::Def => &mut self.def,
            BoostId::Spa => &mut self.spa,
            BoostId::Spd => &mut self.spd,
            BoostId::Spe => &mut self.spe,
            BoostId::Accuracy => &mut self.accuracy,
            BoostId::Evasion => &mut self.evasion,
        }
    }

    /// Adds `delta` to a stage, clamped. Returns the change actually applied.
    pub fn add(&mut self, id: BoostId, delta: i32) -> i32 {
        let slot = self.slot_mut(id);
        let before = *slot;
        *slot = (before + delta).clamp(MIN_STAGE, MAX_STAGE);
        *slot - before
    }

    pub fn clear(&mut self) {
        *self = BoostTable::default();
    }
}

/// A request to change several stages at once, applied in `BoostId` order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoostChange(pub Vec<(BoostId, i32)>);

impl BoostChange {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with(mut self, id: BoostId, delta: i32) -> Self {
        self.0.push((id, delta));
        self
    }

    pub fn single(id: BoostId, delta: i32) -> Self {
        Self::new().with(id, delta)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatTable {
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spa: i32,
    pub spd: i32,
    pub spe: i32,
}

impl StatTable {
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub species: String,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Which slot of a holder an effect sits in. The declaration order is the
/// category order the dispatcher walks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectSlot {
    Ability,
    Item,
    Volatile,
    SideCondition,
    Weather,
    Terrain,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Disguise {
    pub participant: ParticipantId,
    pub identity: Identity,
    pub level: u32,
    pub established_by: Option<(EffectSlot, String)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VolatileInstance {
    pub id: String,
    pub owner: ParticipantId,
    pub source: Option<ParticipantId>,
    pub remaining_turns: Option<u32>,
    pub data: DataBag,
}

/// Weather, terrain or a side condition in play.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldEffect {
    pub id: String,
    pub source: Option<ParticipantId>,
    pub remaining_turns: Option<u32>,
    pub data: DataBag,
}

impl FieldEffect {
    pub fn new(id: impl Into<String>, source: Option<ParticipantId>, remaining_turns: Option<u32>) -> Self {
        Self {
            id: id.into(),
            source,
            remaining_turns,
            data: DataBag::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldState {
    pub weather: Option<FieldEffect>,
    pub terrain: Option<FieldEffect>,
}

impl FieldState {
    pub fn is_weather(&self, ids: &[&str]) -> bool {
        self.weather
            .as_ref()
            .map(|w| ids.contains(&w.id.as_str()))
            .unwrap_or(false)
    }

    pub fn is_terrain(&self, id: &str) -> bool {
        self.terrain.as_ref().map(|t| t.id == id).unwrap_or(false)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Side {
    pub index: usize,
    pub name: String,
    pub team: Vec<ParticipantId>,
    pub active: Option<ParticipantId>,
    pub conditions: Vec<FieldEffect>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Participant {
    pub id: ParticipantId,
    pub side: usize,
    pub position: usize,
    pub identity: Identity,
    pub level: u32,
    pub base_form: String,
    pub current_form: String,
    pub types: Vec<String>,
    pub stats: StatTable,
    pub evs: StatTable,
    pub hp: i32,
    pub max_hp: i32,
    pub moves: Vec<String>,
    pub ability: Option<String>,
    pub ability_data: DataBag,
    pub item: Option<String>,
    pub item_data: DataBag,
    pub last_item: Option<String>,
    pub volatiles: Vec<VolatileInstance>,
    pub boosts: BoostTable,
    pub disguise: Option<Disguise>,
    pub fainted: bool,
    pub active: bool,
    pub active_turns: u32,
    pub transformed: bool,
    pub happiness: u8,
    pub weight_hg: i64,
    /// Effective speed as of the last refresh; used for handler and action ordering.
    pub speed: i64,
    pub will_move: bool,
    pub moved_this_turn: bool,
}

impl Participant {
    pub fn has_volatile(&self, id: &str) -> bool {
        self.volatiles.iter().any(|v| v.id == id)
    }

    pub fn volatile(&self, id: &str) -> Option<&VolatileInstance> {
        self.volatiles.iter().find(|v| v.id == id)
    }

    pub fn volatile_mut(&mut self, id: &str) -> Option<&mut VolatileInstance> {
        self.volatiles.iter_mut().find(|v| v.id == id)
    }

    pub fn has_ability(&self, id: &str) -> bool {
        self.ability.as_deref() == Some(id)
    }

    pub fn has_item(&self, id: &str) -> bool {
        self.item.as_deref() == Some(id)
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(type_name))
    }

    /// The identity shown to the other side.
    pub fn displayed_identity(&self) -> &Identity {
        self.disguise
            .as_ref()
            .map(|d| &d.identity)
            .unwrap_or(&self.identity)
    }

    pub fn is_alive(&self) -> bool {
        !self.fainted && self.hp > 0
    }
}
