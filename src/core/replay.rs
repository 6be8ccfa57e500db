use crate::config::BattleOptions;
use crate::core::battle::{Action, Battle};
use crate::core::factory::BattleSetup;
use crate::data::catalog::Catalog;
use crate::data::Dex;
use crate::error::BattleError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleTurn {
    pub turn: u32,
    pub actions: Vec<Action>,
}

/// Everything needed to reproduce a battle: the setup, the options (seed included)
/// and the actions chosen each turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleHistory {
    pub setup: BattleSetup,
    pub options: BattleOptions,
    pub turns: Vec<BattleTurn>,
}

impl BattleHistory {
    pub fn new(setup: BattleSetup, options: BattleOptions) -> Self {
        Self {
            setup,
            options,
            turns: Vec::new(),
        }
    }
}

pub fn replay_battle(catalog: Arc<Catalog>, dex: Arc<Dex>, history: &BattleHistory) -> Result<Battle, BattleError> {
    let options = BattleOptions {
        record_history: false,
        ..history.options.clone()
    };
    let mut battle = Battle::new(catalog, dex, history.setup.clone(), options)?;
    battle.start()?;
    for turn in &history.turns {
        if battle.is_over() {
            break;
        }
        battle.run_turn(&turn.actions)?;
    }
    Ok(battle)
}
