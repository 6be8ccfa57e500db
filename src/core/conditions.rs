//! Condition lifecycle: volatiles, side conditions, forms and disguises.
//!
//! A volatile is either absent or active. `attach` and `detach` are the only
//! transitions, plus forced removal when the owner faints. Attaching something
//! already present is a no-op unless the condition is stackable.

use crate::core::descriptor::{EffectFlag, EffectKind, FieldSlot};
use crate::core::dispatch::HookHolder;
use crate::core::events::{EventContext, EventKind};
use crate::core::factory::stats_for;
use crate::core::log::Message;
use crate::core::battle::Battle;
use crate::core::state::{DataBag, Disguise, EffectSlot, FieldEffect, ParticipantId, VolatileInstance};
use crate::core::utils::to_id;
use crate::error::BattleError;
use std::sync::Arc;
use tracing::{debug, warn};

impl Battle {
    /// Attaches a volatile condition. Returns false if it was already present, is
    /// unknown, or its `Start` hook refused it.
    pub fn attach(
        &mut self,
        target: ParticipantId,
        id: &str,
        source: Option<ParticipantId>,
        caused_by: Option<&str>,
    ) -> Result<bool, BattleError> {
        let participant = self.participant(target)?;
        if participant.fainted {
            return Ok(false);
        }
        let Some(effect) = self.catalog.get(id).map(Arc::clone) else {
            warn!(id, target, "attach of unknown condition ignored");
            return Ok(false);
        };
        if effect.kind != EffectKind::VolatileCondition {
            warn!(id, target, kind = effect.kind.label(), "attach of a non-volatile ignored");
            return Ok(false);
        }
        if participant.has_volatile(id) && !effect.has_flag(EffectFlag::Stackable) {
            return Ok(false);
        }

        self.participant_mut(target)?.volatiles.push(VolatileInstance {
            id: id.to_string(),
            owner: target,
            source,
            remaining_turns: effect.duration,
            data: DataBag::new(),
        });

        let mut context = EventContext::on(target).with_source_opt(source);
        if let Some(cause) = caused_by {
            context = context.caused_by_effect(cause);
        }
        let started = self.run_single(
            EventKind::Start,
            id,
            HookHolder::Participant(target),
            EffectSlot::Volatile,
            &mut context,
        )?;
        if started.is_denied() {
            let volatiles = &mut self.participant_mut(target)?.volatiles;
            if let Some(index) = volatiles.iter().rposition(|v| v.id == id) {
                volatiles.remove(index);
            }
            debug!(id, target, "start vetoed");
            return Ok(false);
        }
        debug!(id, target, "attached");
        Ok(true)
    }

    pub fn detach(&mut self, target: ParticipantId, id: &str) -> Result<bool, BattleError> {
        if !self.participant(target)?.has_volatile(id) {
            return Ok(false);
        }
        self.end_best_effort(id, HookHolder::Participant(target), EffectSlot::Volatile, EventContext::on(target));
        let volatiles = &mut self.participant_mut(target)?.volatiles;
        if let Some(index) = volatiles.iter().position(|v| v.id == id) {
            volatiles.remove(index);
        }
        debug!(id, target, "detached");
        Ok(true)
    }

    pub(crate) fn end_best_effort(&mut self, id: &str, holder: HookHolder, slot: EffectSlot, mut context: EventContext) {
        if let Err(err) = self.run_single(EventKind::End, id, holder, slot, &mut context) {
            warn!(id, %err, "end hook failed");
        }
    }

    /// Switches to another form of the same species line. Stats and typing follow the
    /// new form; HP, volatiles and boosts are left alone.
    pub fn change_form(
        &mut self,
        target: ParticipantId,
        form: &str,
        silent: bool,
        reason: Option<&str>,
    ) -> Result<bool, BattleError> {
        let dex = Arc::clone(&self.dex);
        let species = dex
            .species
            .get(form)
            .ok_or_else(|| BattleError::UnknownForm(form.to_string()))?;
        let participant = self.participant_mut(target)?;
        if participant.current_form == species.id {
            return Ok(false);
        }
        let stats = stats_for(species, participant.level, &participant.evs);
        participant.stats.atk = stats.atk;
        participant.stats.def = stats.def;
        participant.stats.spa = stats.spa;
        participant.stats.spd = stats.spd;
        participant.stats.spe = stats.spe;
        participant.types = species.types.iter().map(|t| t.to_ascii_lowercase()).collect();
        participant.weight_hg = (species.weight_kg * 10.0).round() as i64;
        participant.current_form = species.id.clone();
        let active = participant.active;
        debug!(target, form = %species.id, silent, "form change");

        if !silent {
            self.add(Message::FormeChange {
                who: self.who(target),
                form: species.name.clone(),
                from: reason.map(str::to_string),
            });
        }
        if active {
            self.refresh_speed(target)?;
        }
        Ok(true)
    }

    /// `None` breaks the disguise and restores the true identity volatile.
    pub fn set_disguise(
        &mut self,
        target: ParticipantId,
        disguised_as: Option<ParticipantId>,
        established_by: Option<(EffectSlot, String)>,
    ) -> Result<bool, BattleError> {
        match disguised_as {
            Some(other) => {
                let other_participant = self.participant(other)?;
                let disguise = Disguise {
                    participant: other,
                    identity: other_participant.identity.clone(),
                    level: other_participant.level,
                    established_by,
                };
                let participant = self.participant_mut(target)?;
                if other == target {
                    participant.disguise = None;
                    return Ok(false);
                }
                participant.disguise = Some(disguise);
                Ok(true)
            }
            None => {
                let Some(disguise) = self.participant_mut(target)?.disguise.take() else {
                    return Ok(false);
                };
                debug!(target, as_ = %disguise.identity.name, "disguise broken");
                if let Some((EffectSlot::Volatile, id)) = &disguise.established_by {
                    self.detach(target, id)?;
                }
                let masked = self.identity_volatile_id(&disguise.identity.name);
                self.detach(target, &masked)?;
                self.reconcile_identity(target)?;
                Ok(true)
            }
        }
    }

    pub fn forget_disguise(&mut self, target: ParticipantId) -> Result<bool, BattleError> {
        Ok(self.participant_mut(target)?.disguise.take().is_some())
    }

    /// Volatile id that carries a named identity. Names that are also species ids
    /// get a `user` suffix so they never collide with a form.
    pub fn identity_volatile_id(&self, name: &str) -> String {
        let id = to_id(name);
        if self.dex.species.contains(&id) {
            format!("{}user", id)
        } else {
            id
        }
    }

    fn reconcile_identity(&mut self, target: ParticipantId) -> Result<bool, BattleError> {
        let participant = self.participant(target)?;
        let own = self.identity_volatile_id(&participant.identity.name);
        if participant.has_volatile(&own) || !self.catalog.contains(&own) {
            return Ok(false);
        }
        let blocked = participant.volatiles.iter().any(|v| {
            v.id != own
                && self
                    .catalog
                    .get(&v.id)
                    .map(|d| d.has_flag(EffectFlag::Identity))
                    .unwrap_or(false)
        });
        if blocked {
            debug!(target, id = %own, "identity volatile blocked");
            return Ok(false);
        }
        self.attach(target, &own, Some(target), None)
    }

    pub fn faint(&mut self, target: ParticipantId) -> Result<bool, BattleError> {
        let participant = self.participant_mut(target)?;
        if participant.fainted {
            return Ok(false);
        }
        participant.hp = 0;
        self.add(Message::Faint { who: self.who(target) });
        self.run_notify(EventKind::Faint, &mut EventContext::on(target))?;

        let ids: Vec<String> = self.participant(target)?.volatiles.iter().map(|v| v.id.clone()).collect();
        for id in ids {
            self.end_best_effort(&id, HookHolder::Participant(target), EffectSlot::Volatile, EventContext::on(target));
        }
        let participant = self.participant_mut(target)?;
        participant.volatiles.clear();
        participant.boosts.clear();
        participant.fainted = true;
        debug!(target, "fainted");
        Ok(true)
    }

    pub fn add_side_condition(
        &mut self,
        side: usize,
        id: &str,
        source: Option<ParticipantId>,
    ) -> Result<bool, BattleError> {
        let effect = Arc::clone(self.catalog.require(id)?);
        if effect.kind != EffectKind::FieldCondition || effect.slot != Some(FieldSlot::Side) {
            return Err(BattleError::WrongEffectKind {
                id: id.to_string(),
                expected: "side condition",
                actual: effect.kind.label(),
            });
        }
        let present = self.side(side)?.conditions.iter().any(|c| c.id == id);
        if present && !effect.has_flag(EffectFlag::Stackable) {
            return Ok(false);
        }
        self.side_mut(side)?
            .conditions
            .push(FieldEffect::new(id, source, effect.duration));
        let started = self.run_single(
            EventKind::Start,
            id,
            HookHolder::Side(side),
            EffectSlot::SideCondition,
            &mut EventContext::field().with_source_opt(source),
        )?;
        let conditions = &mut self.side_mut(side)?.conditions;
        if started.is_denied() {
            if let Some(index) = conditions.iter().rposition(|c| c.id == id) {
                conditions.remove(index);
            }
            return Ok(false);
        }
        let name = self.side(side)?.name.clone();
        self.add(Message::SideStart {
            side: name,
            condition: effect.name.clone(),
        });
        Ok(true)
    }

    pub fn remove_side_condition(&mut self, side: usize, id: &str) -> Result<bool, BattleError> {
        if !self.side(side)?.conditions.iter().any(|c| c.id == id) {
            return Ok(false);
        }
        self.end_best_effort(id, HookHolder::Side(side), EffectSlot::SideCondition, EventContext::field());
        let state = self.side_mut(side)?;
        if let Some(index) = state.conditions.iter().position(|c| c.id == id) {
            state.conditions.remove(index);
        }
        let name = state.name.clone();
        let condition = self
            .catalog
            .get(id)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| id.to_string());
        self.add(Message::SideEnd { side: name, condition });
        Ok(true)
    }
}
