use crate::core::descriptor::EffectKind;
use crate::core::state::{BoostTable, Identity, Participant, ParticipantId, Side, StatTable};
use crate::core::utils::to_id;
use crate::data::catalog::Catalog;
use crate::data::species::SpeciesData;
use crate::data::Dex;
use crate::error::BattleError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_level() -> u32 {
    100
}

/// One team member as written in a setup file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParticipantSet {
    #[serde(default)]
    pub name: Option<String>,
    pub species: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub ability: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub moves: Vec<String>,
    /// Effort values; zero unless given.
    #[serde(default)]
    pub evs: StatTable,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TeamSet {
    pub name: String,
    pub members: Vec<ParticipantSet>,
}

/// Both teams of a singles battle.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BattleSetup {
    pub sides: Vec<TeamSet>,
}

impl BattleSetup {
    pub fn new(first: TeamSet, second: TeamSet) -> Self {
        Self {
            sides: vec![first, second],
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

pub fn calc_stat(base: i32, is_hp: bool, level: i32, iv: i32, ev: i32) -> i32 {
    if is_hp {
        ((base * 2 + iv + (ev / 4)) * level) / 100 + level + 10
    } else {
        ((base * 2 + iv + (ev / 4)) * level) / 100 + 5
    }
}

/// Full stat table for a form at a level, with perfect IVs.
pub fn stats_for(species: &SpeciesData, level: u32, evs: &StatTable) -> StatTable {
    let iv = 31;
    let level = level as i32;
    let base = &species.base_stats;
    StatTable {
        hp: calc_stat(base.hp, true, level, iv, evs.hp),
        atk: calc_stat(base.atk, false, level, iv, evs.atk),
        def: calc_stat(base.def, false, level, iv, evs.def),
        spa: calc_stat(base.spa, false, level, iv, evs.spa),
        spd: calc_stat(base.spd, false, level, iv, evs.spd),
        spe: calc_stat(base.spe, false, level, iv, evs.spe),
    }
}

fn check_effect(catalog: &Catalog, id: &str, expected: EffectKind) -> Result<String, BattleError> {
    let id = to_id(id);
    let effect = catalog.require(&id)?;
    if effect.kind != expected {
        return Err(BattleError::WrongEffectKind {
            id,
            expected: expected.label(),
            actual: effect.kind.label(),
        });
    }
    Ok(id)
}

pub fn build_participant(
    dex: &Dex,
    catalog: &Catalog,
    set: &ParticipantSet,
    id: ParticipantId,
    side: usize,
    position: usize,
) -> Result<Participant, BattleError> {
    let species = dex
        .species
        .get(&set.species)
        .ok_or_else(|| BattleError::UnknownForm(set.species.clone()))?;
    let level = set.level.clamp(1, 100);
    let stats = stats_for(species, level, &set.evs);

    let unknown: Vec<&str> = set
        .moves
        .iter()
        .filter(|m| dex.moves.get(&to_id(m)).is_none())
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(BattleError::InvalidSetup(format!(
            "unknown move id(s) for '{}': {}",
            species.name,
            unknown.join(", ")
        )));
    }

    let ability = set
        .ability
        .as_deref()
        .or_else(|| {
            species
                .abilities
                .first()
                .map(String::as_str)
                .filter(|a| catalog.contains(a))
        })
        .map(|a| check_effect(catalog, a, EffectKind::Ability))
        .transpose()?;
    let item = set
        .item
        .as_deref()
        .map(|i| check_effect(catalog, i, EffectKind::Item))
        .transpose()?;

    Ok(Participant {
        id,
        side,
        position,
        identity: Identity {
            name: set.name.clone().unwrap_or_else(|| species.name.clone()),
            species: species.name.clone(),
        },
        level,
        base_form: species.id.clone(),
        current_form: species.id.clone(),
        types: species.types.iter().map(|t| t.to_ascii_lowercase()).collect(),
        stats,
        evs: set.evs,
        hp: stats.hp,
        max_hp: stats.hp,
        moves: set.moves.iter().map(|m| to_id(m)).collect(),
        ability,
        ability_data: HashMap::new(),
        item,
        item_data: HashMap::new(),
        last_item: None,
        volatiles: Vec::new(),
        boosts: BoostTable::default(),
        disguise: None,
        fainted: false,
        active: false,
        active_turns: 0,
        transformed: false,
        happiness: 255,
        weight_hg: (species.weight_kg * 10.0).round() as i64,
        speed: stats.spe as i64,
        will_move: false,
        moved_this_turn: false,
    })
}

/// Builds every participant and both sides. Participant ids are assigned in setup order.
pub fn build_teams(dex: &Dex, catalog: &Catalog, setup: &BattleSetup) -> Result<(Vec<Participant>, Vec<Side>), BattleError> {
    if setup.sides.len() != 2 {
        return Err(BattleError::InvalidSetup(format!(
            "expected two sides, got {}",
            setup.sides.len()
        )));
    }
    let mut participants = Vec::new();
    let mut sides = Vec::new();
    for (side_index, team) in setup.sides.iter().enumerate() {
        if team.members.is_empty() {
            return Err(BattleError::InvalidSetup(format!("team '{}' is empty", team.name)));
        }
        let mut roster = Vec::new();
        for (position, set) in team.members.iter().enumerate() {
            let id = participants.len();
            participants.push(build_participant(dex, catalog, set, id, side_index, position)?);
            roster.push(id);
        }
        sides.push(Side {
            index: side_index,
            name: team.name.clone(),
            team: roster,
            active: None,
            conditions: Vec::new(),
        });
    }
    Ok((participants, sides))
}
