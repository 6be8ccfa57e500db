use crate::config::BattleOptions;
use crate::core::descriptor::EffectFlag;
use crate::core::dispatch::HookHolder;
use crate::core::events::{Cause, EventContext, EventKind};
use crate::core::factory::{build_teams, BattleSetup};
use crate::core::log::{BattleLog, Message};
use crate::core::modifier::Modifier;
use crate::core::replay::{BattleHistory, BattleTurn};
use crate::core::state::{BoostChange, EffectSlot, FieldState, Participant, ParticipantId, Side, Stat};
use crate::core::utils::{apply_stage, to_id};
use crate::data::catalog::Catalog;
use crate::data::moves::{ActiveMove, MoveCategory};
use crate::data::Dex;
use crate::error::BattleError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Move { side: usize, move_id: String },
    Switch { side: usize, slot: usize },
}

impl Action {
    pub fn side(&self) -> usize {
        match self {
            Action::Move { side, .. } | Action::Switch { side, .. } => *side,
        }
    }

    pub fn use_move(side: usize, move_id: &str) -> Self {
        Action::Move {
            side,
            move_id: to_id(move_id),
        }
    }

    pub fn switch(side: usize, slot: usize) -> Self {
        Action::Switch { side, slot }
    }
}

#[derive(Clone, Debug)]
enum Queued {
    Move { user: ParticipantId, active: ActiveMove },
    Switch { side: usize, slot: usize },
}

#[derive(Clone, Debug)]
struct OrderedAction {
    queued: Queued,
    is_switch: bool,
    priority: i64,
    speed: i64,
    rand: u32,
}

struct Snapshot {
    participants: Vec<Participant>,
    sides: Vec<Side>,
    field: FieldState,
    turn: u32,
    winner: Option<usize>,
    ended: bool,
}

/// One singles battle: the participants, the field, and the reference turn driver.
#[derive(Debug)]
pub struct Battle {
    pub catalog: Arc<Catalog>,
    pub dex: Arc<Dex>,
    pub participants: Vec<Participant>,
    pub sides: Vec<Side>,
    pub field: FieldState,
    pub rng: StdRng,
    pub log: BattleLog,
    pub turn: u32,
    pub options: BattleOptions,
    pub history: Option<BattleHistory>,
    pub winner: Option<usize>,
    pub ended: bool,
    pub aborted: Option<BattleError>,
    started: bool,
}

impl Battle {
    pub fn new(
        catalog: Arc<Catalog>,
        dex: Arc<Dex>,
        setup: BattleSetup,
        options: BattleOptions,
    ) -> Result<Self, BattleError> {
        let (participants, sides) = build_teams(&dex, &catalog, &setup)?;
        let history = options
            .record_history
            .then(|| BattleHistory::new(setup, options.clone()));
        Ok(Self {
            catalog,
            dex,
            participants,
            sides,
            field: FieldState::default(),
            rng: StdRng::seed_from_u64(options.seed),
            log: BattleLog::new(),
            turn: 0,
            options,
            history,
            winner: None,
            ended: false,
            aborted: None,
            started: false,
        })
    }

    pub fn from_setup(setup: BattleSetup, options: BattleOptions) -> Result<Self, BattleError> {
        let (catalog, report) = Catalog::load_default();
        if let Some(first) = report.rejected.first() {
            return Err(BattleError::Content(first.clone()));
        }
        let dex = Dex::load_default()?;
        Self::new(Arc::new(catalog), Arc::new(dex), setup, options)
    }

    pub fn participant(&self, id: ParticipantId) -> Result<&Participant, BattleError> {
        self.participants
            .get(id)
            .ok_or(BattleError::UnknownParticipant(id))
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Result<&mut Participant, BattleError> {
        self.participants
            .get_mut(id)
            .ok_or(BattleError::UnknownParticipant(id))
    }

    pub fn side(&self, index: usize) -> Result<&Side, BattleError> {
        self.sides.get(index).ok_or(BattleError::UnknownSide(index))
    }

    pub fn side_mut(&mut self, index: usize) -> Result<&mut Side, BattleError> {
        self.sides.get_mut(index).ok_or(BattleError::UnknownSide(index))
    }

    pub fn active(&self, side: usize) -> Option<ParticipantId> {
        self.sides.get(side).and_then(|s| s.active)
    }

    /// The opposing active participant, if it can still fight.
    pub fn foe_of(&self, id: ParticipantId) -> Option<ParticipantId> {
        let side = self.participants.get(id)?.side;
        let foe = self.active(1 - side.min(1))?;
        self.participants
            .get(foe)
            .filter(|p| p.is_alive())
            .map(|p| p.id)
    }

    /// Protocol label, as the other side sees it.
    pub fn who(&self, id: ParticipantId) -> String {
        match self.participants.get(id) {
            Some(p) => format!("p{}a: {}", p.side + 1, p.displayed_identity().name),
            None => format!("#{}", id),
        }
    }

    pub fn true_who(&self, id: ParticipantId) -> String {
        match self.participants.get(id) {
            Some(p) => format!("p{}a: {}", p.side + 1, p.identity.name),
            None => format!("#{}", id),
        }
    }

    pub fn add(&mut self, message: Message) {
        self.log.push(message);
    }

    pub fn is_over(&self) -> bool {
        self.ended || self.aborted.is_some()
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.log.lines()
    }

    pub fn abort_summary(&self) -> Option<String> {
        self.aborted
            .as_ref()
            .map(|err| format!("battle aborted on turn {}: {}", self.turn + 1, err))
    }

    pub fn get_stat(
        &mut self,
        id: ParticipantId,
        stat: Stat,
        source: Option<ParticipantId>,
        active_move: Option<&ActiveMove>,
    ) -> Result<i64, BattleError> {
        let participant = self.participant(id)?;
        let staged = apply_stage(participant.stats.get(stat) as i64, participant.boosts.get(stat.into()));
        let kind = match stat {
            Stat::Atk => EventKind::ModifyAtk,
            Stat::Def => EventKind::ModifyDef,
            Stat::Spa => EventKind::ModifySpA,
            Stat::Spd => EventKind::ModifySpD,
            Stat::Spe => EventKind::ModifySpe,
        };
        let mut context = EventContext::on(id).with_source_opt(source);
        if let Some(active) = active_move {
            context = context.caused_by_move(active.clone());
        }
        self.run_value(kind, &mut context, staged)
    }

    pub fn effective_speed(&mut self, id: ParticipantId) -> Result<i64, BattleError> {
        self.get_stat(id, Stat::Spe, None, None)
    }

    pub fn refresh_speed(&mut self, id: ParticipantId) -> Result<(), BattleError> {
        let speed = self.effective_speed(id)?;
        self.participant_mut(id)?.speed = speed;
        Ok(())
    }

    pub fn weight(&mut self, id: ParticipantId) -> Result<i64, BattleError> {
        let base = self.participant(id)?.weight_hg;
        self.run_value(EventKind::ModifyWeight, &mut EventContext::on(id), base)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            participants: self.participants.clone(),
            sides: self.sides.clone(),
            field: self.field.clone(),
            turn: self.turn,
            winner: self.winner,
            ended: self.ended,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.participants = snapshot.participants;
        self.sides = snapshot.sides;
        self.field = snapshot.field;
        self.turn = snapshot.turn;
        self.winner = snapshot.winner;
        self.ended = snapshot.ended;
    }

    /// Runs one step atomically: its messages are committed only if it succeeds.
    /// A failure rolls state back to before the step and aborts the battle.
    fn transaction<F>(&mut self, step: F) -> Result<(), BattleError>
    where
        F: FnOnce(&mut Battle) -> Result<(), BattleError>,
    {
        let snapshot = self.snapshot();
        match step(self) {
            Ok(()) => {
                self.log.commit();
                Ok(())
            }
            Err(err) => {
                let discarded = self.log.rollback();
                self.restore(snapshot);
                error!(%err, discarded, turn = self.turn + 1, "battle aborted");
                self.aborted = Some(err.clone());
                self.ended = true;
                Err(err)
            }
        }
    }

    pub fn start(&mut self) -> Result<(), BattleError> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        self.transaction(|battle| {
            let leads: Vec<ParticipantId> = battle
                .sides
                .iter()
                .filter_map(|s| s.team.first().copied())
                .collect();
            for &lead in &leads {
                battle.enter(lead)?;
            }
            for lead in battle.by_speed(&leads) {
                battle.run_switch_in_effects(lead)?;
            }
            battle.check_win();
            Ok(())
        })
    }

    pub fn run_turn(&mut self, actions: &[Action]) -> Result<(), BattleError> {
        if let Some(err) = &self.aborted {
            return Err(BattleError::Aborted(err.to_string()));
        }
        if !self.started {
            self.start()?;
        }
        if self.ended || self.turn >= self.options.max_turns {
            return Err(BattleError::BattleOver);
        }
        self.validate_actions(actions)?;

        let owned = actions.to_vec();
        self.transaction(|battle| battle.resolve_turn(&owned))?;
        if let Some(history) = self.history.as_mut() {
            history.turns.push(BattleTurn {
                turn: self.turn,
                actions: actions.to_vec(),
            });
        }
        Ok(())
    }

    fn validate_actions(&self, actions: &[Action]) -> Result<(), BattleError> {
        for action in actions {
            let side = self.side(action.side())?;
            match action {
                Action::Move { move_id, .. } => {
                    if self.dex.moves.get(move_id).is_none() {
                        return Err(BattleError::InvalidSetup(format!("unknown move '{}'", move_id)));
                    }
                }
                Action::Switch { slot, .. } => {
                    if *slot >= side.team.len() {
                        return Err(BattleError::InvalidSetup(format!(
                            "side {} has no slot {}",
                            side.index, slot
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn alive_actives(&self) -> Vec<ParticipantId> {
        self.sides
            .iter()
            .filter_map(|s| s.active)
            .filter(|id| self.participants.get(*id).map(|p| p.is_alive()).unwrap_or(false))
            .collect()
    }

    fn by_speed(&self, ids: &[ParticipantId]) -> Vec<ParticipantId> {
        let mut ordered = ids.to_vec();
        ordered.sort_by_key(|id| std::cmp::Reverse(self.participants.get(*id).map(|p| p.speed).unwrap_or(0)));
        ordered
    }

    fn resolve_turn(&mut self, actions: &[Action]) -> Result<(), BattleError> {
        self.turn += 1;
        self.add(Message::Turn { number: self.turn });
        info!(turn = self.turn, "turn start");

        for id in self.alive_actives() {
            self.refresh_speed(id)?;
            let participant = self.participant_mut(id)?;
            participant.will_move = false;
            participant.moved_this_turn = false;
        }
        for action in actions {
            if let Action::Move { side, .. } = action {
                if let Some(user) = self.active(*side) {
                    self.participant_mut(user)?.will_move = true;
                }
            }
        }

        let mut ordered = Vec::new();
        for action in actions {
            match action {
                Action::Switch { side, slot } => {
                    let speed = self.active(*side).map(|id| self.participants[id].speed).unwrap_or(0);
                    ordered.push(OrderedAction {
                        queued: Queued::Switch { side: *side, slot: *slot },
                        is_switch: true,
                        priority: 0,
                        speed,
                        rand: self.rng.gen(),
                    });
                }
                Action::Move { side, move_id } => {
                    let Some(user) = self.active(*side).filter(|id| self.participants[*id].is_alive()) else {
                        continue;
                    };
                    let Some(data) = self.dex.moves.get(move_id) else {
                        continue;
                    };
                    let base_priority = data.priority as i64;
                    let mut context = EventContext::on(user)
                        .with_source_opt(self.foe_of(user))
                        .caused_by_move(ActiveMove::from_data(data));
                    let priority = self.run_value(EventKind::ModifyPriority, &mut context, base_priority)?;
                    let Some(Cause::Move(mut active)) = context.cause.take() else {
                        continue;
                    };
                    active.priority = priority as i32;
                    ordered.push(OrderedAction {
                        queued: Queued::Move { user, active },
                        is_switch: false,
                        priority,
                        speed: self.participants[user].speed,
                        rand: self.rng.gen(),
                    });
                }
            }
        }

        ordered.sort_by(|a, b| {
            b.is_switch
                .cmp(&a.is_switch)
                .then_with(|| b.priority.cmp(&a.priority))
                .then_with(|| b.speed.cmp(&a.speed))
                .then_with(|| a.rand.cmp(&b.rand))
        });

        for entry in ordered {
            if self.ended {
                break;
            }
            match entry.queued {
                Queued::Switch { side, slot } => self.switch_in(side, slot)?,
                Queued::Move { user, active } => {
                    let participant = self.participant(user)?;
                    if !participant.is_alive() || self.active(participant.side) != Some(user) {
                        continue;
                    }
                    self.use_move(user, active)?;
                }
            }
            self.check_win();
        }

        if !self.ended {
            self.residual()?;
            self.check_win();
        }
        if !self.ended {
            self.replace_fainted()?;
        }
        for id in self.alive_actives() {
            self.participant_mut(id)?.active_turns += 1;
        }
        Ok(())
    }

    fn use_move(&mut self, user: ParticipantId, active: ActiveMove) -> Result<(), BattleError> {
        let target = self.foe_of(user);
        self.participant_mut(user)?.will_move = false;
        let mut context = EventContext::on(user)
            .with_source_opt(target)
            .caused_by_move(active);
        if !self.run_check(EventKind::BeforeMove, &mut context)? {
            debug!(user, "move prevented");
            return Ok(());
        }
        self.participant_mut(user)?.moved_this_turn = true;
        self.run_notify(EventKind::ModifyMove, &mut context)?;
        let Some(Cause::Move(active)) = context.cause.take() else {
            return Ok(());
        };

        self.add(Message::Move {
            who: self.who(user),
            name: active.name.clone(),
            target: target.map(|t| self.who(t)),
        });

        if active.is_status() {
            let boosts = self
                .dex
                .moves
                .get(&active.id)
                .map(|data| data.boosts.clone())
                .unwrap_or_default();
            if !boosts.is_empty() {
                let change = BoostChange(boosts.into_iter().collect());
                self.boost(user, change, Some(user), None)?;
            }
            return Ok(());
        }

        let Some(target) = target else {
            self.add(Message::Fail { who: self.who(user) });
            return Ok(());
        };
        self.hit(user, target, active)
    }

    fn hit(&mut self, user: ParticipantId, target: ParticipantId, active: ActiveMove) -> Result<(), BattleError> {
        let mut context = EventContext::on(target)
            .with_source(user)
            .caused_by_move(active);
        if !self.run_check(EventKind::TryHit, &mut context)? {
            return Ok(());
        }
        let Some(Cause::Move(mut active)) = context.cause.take() else {
            return Ok(());
        };

        if let Some(accuracy) = self.dex.moves.get(&active.id).and_then(|m| m.accuracy) {
            if accuracy < 1.0 && self.rng.gen::<f32>() >= accuracy {
                self.add(Message::Miss {
                    who: self.who(user),
                    target: self.who(target),
                });
                return Ok(());
            }
        }

        let target_types = self.participant(target)?.types.clone();
        if self.dex.types.is_immune(&active.move_type, &target_types) {
            self.add(Message::Immune {
                who: self.who(target),
                from: None,
            });
            return Ok(());
        }
        active.type_mod = self.dex.types.type_mod(&active.move_type, &target_types);

        let amount = self.calc_damage(user, target, &active)?;
        let dealt = self.damage(target, amount, Some(user), Some(Cause::Move(active.clone())))?;
        if active.type_mod != 0 {
            self.add(Message::Effectiveness {
                who: self.who(target),
                super_effective: active.type_mod > 0,
            });
        }
        if dealt > 0 {
            let mut after = EventContext::on(target)
                .with_source(user)
                .caused_by_move(active);
            self.dispatch(EventKind::AfterDamage, &mut after, dealt as i64)?;
        }
        Ok(())
    }

    /// Standard damage formula with every hook applied. Never below 1 for a hit that lands.
    pub fn calc_damage(
        &mut self,
        attacker: ParticipantId,
        defender: ParticipantId,
        active: &ActiveMove,
    ) -> Result<i64, BattleError> {
        let mut power_context = EventContext::on(attacker)
            .with_source(defender)
            .caused_by_move(active.clone());
        let base_power = self.run_value(EventKind::BasePower, &mut power_context, active.base_power as i64)?;
        if base_power <= 0 {
            return Ok(0);
        }

        let (attack_stat, defense_stat) = match active.category {
            MoveCategory::Physical => (Stat::Atk, Stat::Def),
            MoveCategory::Special | MoveCategory::Status => (Stat::Spa, Stat::Spd),
        };
        let attack = self.get_stat(attacker, attack_stat, Some(defender), Some(active))?;
        let defense = self.get_stat(defender, defense_stat, Some(attacker), Some(active))?.max(1);

        let level = self.participant(attacker)?.level as i64;
        let mut damage = ((2 * level / 5 + 2) * base_power * attack / defense) / 50 + 2;
        let roll: i64 = self.rng.gen_range(85..=100);
        damage = damage * roll / 100;

        let user = self.participant(attacker)?;
        if user.has_type(&active.move_type) {
            damage = Modifier::from_f64(active.stab).apply(damage);
        }
        if active.type_mod > 0 {
            damage <<= active.type_mod;
        } else if active.type_mod < 0 {
            damage >>= -active.type_mod;
        }
        if active.category == MoveCategory::Physical && user.has_volatile("brn") {
            damage = Modifier::HALF.apply(damage);
        }

        let mut damage_context = EventContext::on(attacker)
            .with_source(defender)
            .caused_by_move(active.clone());
        let damage = self.run_value(EventKind::ModifyDamage, &mut damage_context, damage)?;
        Ok(damage.max(1))
    }

    pub fn switch_in(&mut self, side: usize, slot: usize) -> Result<(), BattleError> {
        let Some(&incoming) = self.side(side)?.team.get(slot) else {
            return Err(BattleError::InvalidSetup(format!("side {} has no slot {}", side, slot)));
        };
        let candidate = self.participant(incoming)?;
        if !candidate.is_alive() || candidate.active {
            debug!(side, slot, "switch ignored");
            return Ok(());
        }
        if let Some(current) = self.active(side) {
            if self.participant(current)?.is_alive() {
                self.switch_out(current)?;
            } else {
                self.participant_mut(current)?.active = false;
            }
        }
        self.enter(incoming)?;
        self.run_switch_in_effects(incoming)
    }

    fn enter(&mut self, id: ParticipantId) -> Result<(), BattleError> {
        self.run_notify(EventKind::BeforeSwitchIn, &mut EventContext::on(id))?;
        let side = {
            let participant = self.participant_mut(id)?;
            participant.active = true;
            participant.active_turns = 0;
            participant.side
        };
        self.side_mut(side)?.active = Some(id);
        let participant = self.participant(id)?;
        let message = Message::Switch {
            who: self.who(id),
            species: participant.displayed_identity().species.clone(),
            hp: participant.hp,
            max_hp: participant.max_hp,
        };
        self.add(message);
        self.refresh_speed(id)
    }

    fn run_switch_in_effects(&mut self, id: ParticipantId) -> Result<(), BattleError> {
        self.run_notify(EventKind::SwitchIn, &mut EventContext::on(id))?;
        let participant = self.participant(id)?;
        let ability = participant.ability.clone();
        let item = participant.item.clone();
        if let Some(ability) = ability {
            self.run_single(
                EventKind::Start,
                &ability,
                HookHolder::Participant(id),
                EffectSlot::Ability,
                &mut EventContext::on(id),
            )?;
        }
        if let Some(item) = item {
            self.run_single(
                EventKind::Start,
                &item,
                HookHolder::Participant(id),
                EffectSlot::Item,
                &mut EventContext::on(id),
            )?;
        }
        self.refresh_speed(id)
    }

    /// Leaves the field: non-persistent volatiles, boosts and any disguise are dropped silently.
    pub fn switch_out(&mut self, id: ParticipantId) -> Result<(), BattleError> {
        self.run_notify(EventKind::SwitchOut, &mut EventContext::on(id))?;
        let catalog = Arc::clone(&self.catalog);
        let participant = self.participant_mut(id)?;
        participant.volatiles.retain(|v| {
            catalog
                .get(&v.id)
                .map(|d| d.has_flag(EffectFlag::Persistent))
                .unwrap_or(false)
        });
        participant.boosts.clear();
        participant.active = false;
        participant.active_turns = 0;
        let side = participant.side;
        self.forget_disguise(id)?;
        let side = self.side_mut(side)?;
        if side.active == Some(id) {
            side.active = None;
        }
        Ok(())
    }

    /// End-of-turn phase: `Residual` per active participant, `Terrain`, then countdowns.
    fn residual(&mut self) -> Result<(), BattleError> {
        let order = self.by_speed(&self.alive_actives());
        for &id in &order {
            if self.participant(id)?.is_alive() {
                self.run_notify(EventKind::Residual, &mut EventContext::on(id))?;
            }
        }
        if self.field.terrain.is_some() {
            for &id in &order {
                if self.participant(id)?.is_alive() {
                    self.run_notify(EventKind::Terrain, &mut EventContext::on(id))?;
                }
            }
        }
        self.tick_durations()
    }

    fn tick_durations(&mut self) -> Result<(), BattleError> {
        for id in self.alive_actives() {
            let mut expired = Vec::new();
            for volatile in &mut self.participant_mut(id)?.volatiles {
                if let Some(turns) = volatile.remaining_turns.as_mut() {
                    *turns = turns.saturating_sub(1);
                    if *turns == 0 {
                        expired.push(volatile.id.clone());
                    }
                }
            }
            for condition in expired {
                self.detach(id, &condition)?;
            }
        }

        for side in 0..self.sides.len() {
            let mut expired = Vec::new();
            for condition in &mut self.side_mut(side)?.conditions {
                if let Some(turns) = condition.remaining_turns.as_mut() {
                    *turns = turns.saturating_sub(1);
                    if *turns == 0 {
                        expired.push(condition.id.clone());
                    }
                }
            }
            for condition in expired {
                self.remove_side_condition(side, &condition)?;
            }
        }

        let weather_expired = match self.field.weather.as_mut() {
            Some(weather) => match weather.remaining_turns.as_mut() {
                Some(turns) => {
                    *turns = turns.saturating_sub(1);
                    *turns == 0
                }
                None => false,
            },
            None => false,
        };
        if weather_expired {
            self.clear_weather()?;
        } else if let Some(weather) = self.field.weather.as_ref() {
            let id = self
                .catalog
                .get(&weather.id)
                .map(|d| d.name.clone())
                .unwrap_or_else(|| weather.id.clone());
            self.add(Message::Weather { id, upkeep: true });
        }

        let terrain_expired = self
            .field
            .terrain
            .as_mut()
            .and_then(|t| t.remaining_turns.as_mut())
            .map(|turns| {
                *turns = turns.saturating_sub(1);
                *turns == 0
            })
            .unwrap_or(false);
        if terrain_expired {
            self.clear_terrain()?;
        }
        Ok(())
    }

    fn replace_fainted(&mut self) -> Result<(), BattleError> {
        let mut entering = Vec::new();
        for side in 0..self.sides.len() {
            let needs_replacement = match self.active(side) {
                Some(id) => !self.participant(id)?.is_alive(),
                None => true,
            };
            if !needs_replacement {
                continue;
            }
            let next = self.sides[side].team.iter().position(|id| {
                let p = &self.participants[*id];
                p.is_alive() && !p.active
            });
            if let Some(slot) = next {
                if let Some(current) = self.active(side) {
                    self.participant_mut(current)?.active = false;
                }
                let incoming = self.sides[side].team[slot];
                self.enter(incoming)?;
                entering.push(incoming);
            }
        }
        for id in self.by_speed(&entering) {
            self.run_switch_in_effects(id)?;
        }
        self.check_win();
        Ok(())
    }

    fn check_win(&mut self) {
        if self.ended {
            return;
        }
        let defeated: Vec<usize> = self
            .sides
            .iter()
            .filter(|s| s.team.iter().all(|id| !self.participants[*id].is_alive()))
            .map(|s| s.index)
            .collect();
        if defeated.is_empty() {
            return;
        }
        self.ended = true;
        if defeated.len() == 1 {
            let winner = 1 - defeated[0].min(1);
            self.winner = Some(winner);
            let side = self.sides[winner].name.clone();
            info!(%side, turn = self.turn, "battle won");
            self.add(Message::Win { side });
        } else {
            info!(turn = self.turn, "battle tied");
        }
    }
}
