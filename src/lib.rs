pub mod config;
pub mod core;
pub mod data;
pub mod error;

pub use config::BattleOptions;
pub use core::{
    battle::{Action, Battle},
    descriptor::{EffectDescriptor, EffectFlag, EffectKind, FieldSlot, HookFn, HookResult, Outcome},
    dispatch::{HookEvent, HookHolder},
    events::{Cause, EventContext, EventKind, EventResult},
    factory::{calc_stat, BattleSetup, ParticipantSet, TeamSet},
    modifier::{Modifier, ModifierChain},
    replay::{replay_battle, BattleHistory, BattleTurn},
    state::{BoostChange, BoostId, FieldState, Participant, ParticipantId, Side, Stat},
};
pub use data::{catalog::Catalog, Dex};
pub use error::{BattleError, ContentError, HookError};
