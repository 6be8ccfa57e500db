//! Hook dispatch: gathers the handlers relevant to an event, orders them and
//! folds their outcomes into a single result.

use crate::core::battle::Battle;
use crate::core::descriptor::{Adjust, EffectDescriptor, EffectFlag, EffectKind, Hook, Outcome};
use crate::core::events::{EventContext, EventKind, EventResult, EventShape};
use crate::core::modifier::{Adjustment, ModifierChain};
use crate::core::state::{DataBag, EffectSlot, ParticipantId};
use crate::data::moves::ActiveMove;
use crate::error::{BattleError, HookError};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Who carries the effect whose hook is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookHolder {
    Participant(ParticipantId),
    Side(usize),
    Field,
}

/// Everything a handler sees about the dispatch it is part of.
pub struct HookEvent<'a> {
    /// Event the hook was registered for. For source-relative dispatch this is the `Source*` variant.
    pub kind: EventKind,
    pub effect: &'a EffectDescriptor,
    pub holder: HookHolder,
    pub slot: EffectSlot,
    pub context: &'a mut EventContext,
    /// Running value for numeric events; the untouched payload otherwise.
    pub relay: i64,
}

impl<'a> HookEvent<'a> {
    pub fn owner(&self) -> Option<ParticipantId> {
        match self.holder {
            HookHolder::Participant(id) => Some(id),
            _ => None,
        }
    }

    pub fn require_owner(&self) -> Result<ParticipantId, HookError> {
        self.owner()
            .ok_or_else(|| HookError::fault(format!("'{}' has no owning participant", self.effect.id)))
    }

    pub fn target(&self) -> Option<ParticipantId> {
        self.context.target
    }

    pub fn source(&self) -> Option<ParticipantId> {
        self.context.source
    }

    pub fn active_move(&self) -> Option<&ActiveMove> {
        self.context.active_move()
    }

    pub fn active_move_mut(&mut self) -> Option<&mut ActiveMove> {
        self.context.active_move_mut()
    }

    pub fn effect_id(&self) -> &str {
        &self.effect.id
    }

    /// `[from]` tag used in messages produced by this effect.
    pub fn from_tag(&self) -> String {
        from_tag(self.effect)
    }
}

pub fn from_tag(effect: &EffectDescriptor) -> String {
    match effect.kind {
        EffectKind::Ability => format!("ability: {}", effect.name),
        EffectKind::Item => format!("item: {}", effect.name),
        EffectKind::VolatileCondition | EffectKind::FieldCondition => effect.name.clone(),
    }
}

#[derive(Clone)]
struct Candidate {
    effect: Arc<EffectDescriptor>,
    hook: Hook,
    kind: EventKind,
    holder: HookHolder,
    slot: EffectSlot,
    speed: i64,
    seq: usize,
}

impl Battle {
    /// Raises an event and aggregates the handlers' outcomes.
    ///
    /// Value events return `EventResult::Value` with the chained result starting from
    /// `relay`. Check and notify events return `Allowed` unless a handler denies.
    pub fn dispatch(
        &mut self,
        kind: EventKind,
        context: &mut EventContext,
        relay: i64,
    ) -> Result<EventResult, BattleError> {
        let candidates = self.collect_handlers(kind, context)?;
        let shape = kind.shape();
        let mut chain = if kind == EventKind::ModifyPriority {
            ModifierChain::signed(relay)
        } else {
            ModifierChain::new(relay)
        };
        debug!(event = %kind, handlers = candidates.len(), relay, "dispatch");

        for candidate in candidates {
            if !self.still_attached(&candidate) {
                continue;
            }
            let mut event = HookEvent {
                kind: candidate.kind,
                effect: &candidate.effect,
                holder: candidate.holder,
                slot: candidate.slot,
                context: &mut *context,
                relay: chain.value(),
            };
            let outcome = (candidate.hook.callback)(self, &mut event);
            debug!(
                event = %candidate.kind,
                effect = %candidate.effect.id,
                priority = candidate.hook.priority,
                ?outcome,
                "hook"
            );
            match outcome {
                Ok(Outcome::Continue(None)) => {}
                Ok(Outcome::Continue(Some(adjust))) => {
                    if shape == EventShape::Value {
                        match adjust {
                            Adjust::Chain(modifier) => {
                                chain.push(Adjustment::Multiply(modifier));
                            }
                            Adjust::Set(value) => chain.set(value),
                        }
                    }
                }
                Ok(Outcome::Override(value)) => {
                    if shape == EventShape::Value {
                        chain.push(Adjustment::Override(value));
                        break;
                    }
                }
                Ok(Outcome::Deny) => {
                    debug!(event = %kind, effect = %candidate.effect.id, "denied");
                    return Ok(EventResult::Denied);
                }
                Err(HookError::Fault(message)) => {
                    warn!(
                        event = %candidate.kind,
                        effect = %candidate.effect.id,
                        %message,
                        "handler fault, treating as declined"
                    );
                }
                Err(HookError::Fatal(err)) => return Err(err),
            }
        }

        Ok(match shape {
            EventShape::Value => EventResult::Value(chain.value()),
            EventShape::Check | EventShape::Notify => EventResult::Allowed,
        })
    }

    pub fn run_value(&mut self, kind: EventKind, context: &mut EventContext, base: i64) -> Result<i64, BattleError> {
        Ok(self.dispatch(kind, context, base)?.value_or(base))
    }

    /// True unless some handler denied.
    pub fn run_check(&mut self, kind: EventKind, context: &mut EventContext) -> Result<bool, BattleError> {
        Ok(self.dispatch(kind, context, 0)?.is_allowed())
    }

    pub fn run_notify(&mut self, kind: EventKind, context: &mut EventContext) -> Result<bool, BattleError> {
        self.run_check(kind, context)
    }

    /// Runs one effect's own hook, as for `Start` and `End`. A fault counts as no opinion.
    pub fn run_single(
        &mut self,
        kind: EventKind,
        effect_id: &str,
        holder: HookHolder,
        slot: EffectSlot,
        context: &mut EventContext,
    ) -> Result<EventResult, BattleError> {
        let effect = Arc::clone(self.catalog.require(effect_id)?);
        let Some(hook) = effect.hook(kind).copied() else {
            return Ok(EventResult::Allowed);
        };
        let mut event = HookEvent {
            kind,
            effect: &effect,
            holder,
            slot,
            context,
            relay: 0,
        };
        match (hook.callback)(self, &mut event) {
            Ok(Outcome::Deny) => Ok(EventResult::Denied),
            Ok(_) => Ok(EventResult::Allowed),
            Err(HookError::Fault(message)) => {
                warn!(event = %kind, effect = %effect_id, %message, "handler fault, treating as declined");
                Ok(EventResult::Allowed)
            }
            Err(HookError::Fatal(err)) => Err(err),
        }
    }

    /// Private data bag of the effect a hook belongs to.
    pub fn effect_data_mut(&mut self, holder: HookHolder, slot: EffectSlot, id: &str) -> Option<&mut DataBag> {
        match (holder, slot) {
            (HookHolder::Participant(pid), EffectSlot::Ability) => {
                self.participants.get_mut(pid).map(|p| &mut p.ability_data)
            }
            (HookHolder::Participant(pid), EffectSlot::Item) => {
                self.participants.get_mut(pid).map(|p| &mut p.item_data)
            }
            (HookHolder::Participant(pid), _) => self
                .participants
                .get_mut(pid)
                .and_then(|p| p.volatile_mut(id))
                .map(|v| &mut v.data),
            (HookHolder::Side(side), _) => self
                .sides
                .get_mut(side)
                .and_then(|s| s.conditions.iter_mut().find(|c| c.id == id))
                .map(|c| &mut c.data),
            (HookHolder::Field, EffectSlot::Terrain) => self.field.terrain.as_mut().map(|t| &mut t.data),
            (HookHolder::Field, _) => self.field.weather.as_mut().map(|w| &mut w.data),
        }
    }

    fn collect_handlers(&self, kind: EventKind, context: &EventContext) -> Result<Vec<Candidate>, BattleError> {
        let mut candidates = Vec::new();
        let mut seq = 0usize;

        if let Some(target) = context.target {
            self.collect_participant(target, kind, &mut candidates, &mut seq)?;
            let side = self.participant(target)?.side;
            self.collect_side(side, kind, &mut candidates, &mut seq)?;
        }
        self.collect_field(kind, &mut candidates, &mut seq)?;

        if let (Some(source_kind), Some(source)) = (kind.source_variant(), context.source) {
            if context.target != Some(source) {
                self.collect_participant(source, source_kind, &mut candidates, &mut seq)?;
                let side = self.participant(source)?.side;
                self.collect_side(side, source_kind, &mut candidates, &mut seq)?;
            }
        }

        candidates.sort_by_key(|c| (Reverse(c.hook.priority), c.hook.sub_order, Reverse(c.speed), c.seq));
        Ok(candidates)
    }

    fn push_candidate(
        &self,
        id: &str,
        kind: EventKind,
        holder: HookHolder,
        slot: EffectSlot,
        speed: i64,
        candidates: &mut Vec<Candidate>,
        seq: &mut usize,
    ) -> Result<(), BattleError> {
        let effect = match self.catalog.get(id) {
            Some(effect) => effect,
            None if slot == EffectSlot::Volatile => {
                let participant = match holder {
                    HookHolder::Participant(pid) => pid,
                    _ => 0,
                };
                return Err(BattleError::CorruptVolatiles {
                    participant,
                    detail: format!("'{}' is not a registered condition", id),
                });
            }
            None => return Err(BattleError::UnknownEffect(id.to_string())),
        };
        *seq += 1;
        if let Some(hook) = effect.hook(kind) {
            candidates.push(Candidate {
                effect: Arc::clone(effect),
                hook: *hook,
                kind,
                holder,
                slot,
                speed,
                seq: *seq,
            });
        }
        Ok(())
    }

    fn collect_participant(
        &self,
        pid: ParticipantId,
        kind: EventKind,
        candidates: &mut Vec<Candidate>,
        seq: &mut usize,
    ) -> Result<(), BattleError> {
        let participant = self.participant(pid)?;
        if participant.fainted && !matches!(kind, EventKind::Faint | EventKind::End) {
            return Ok(());
        }
        let holder = HookHolder::Participant(pid);
        let speed = participant.speed;
        if let Some(ability) = participant.ability.as_deref() {
            self.push_candidate(ability, kind, holder, EffectSlot::Ability, speed, candidates, seq)?;
        }
        if let Some(item) = participant.item.as_deref() {
            self.push_candidate(item, kind, holder, EffectSlot::Item, speed, candidates, seq)?;
        }

        let mut seen = HashSet::new();
        for volatile in &participant.volatiles {
            if volatile.owner != pid {
                return Err(BattleError::CorruptVolatiles {
                    participant: pid,
                    detail: format!("'{}' is owned by #{}", volatile.id, volatile.owner),
                });
            }
            if !seen.insert(volatile.id.as_str()) {
                let stackable = self
                    .catalog
                    .get(&volatile.id)
                    .map(|d| d.has_flag(EffectFlag::Stackable))
                    .unwrap_or(false);
                if !stackable {
                    return Err(BattleError::CorruptVolatiles {
                        participant: pid,
                        detail: format!("'{}' is attached twice", volatile.id),
                    });
                }
            }
            self.push_candidate(&volatile.id, kind, holder, EffectSlot::Volatile, speed, candidates, seq)?;
        }
        Ok(())
    }

    fn collect_side(
        &self,
        side: usize,
        kind: EventKind,
        candidates: &mut Vec<Candidate>,
        seq: &mut usize,
    ) -> Result<(), BattleError> {
        let state = self.side(side)?;
        for condition in &state.conditions {
            self.push_candidate(&condition.id, kind, HookHolder::Side(side), EffectSlot::SideCondition, 0, candidates, seq)?;
        }
        Ok(())
    }

    fn collect_field(&self, kind: EventKind, candidates: &mut Vec<Candidate>, seq: &mut usize) -> Result<(), BattleError> {
        if let Some(weather) = self.field.weather.as_ref() {
            self.push_candidate(&weather.id, kind, HookHolder::Field, EffectSlot::Weather, 0, candidates, seq)?;
        }
        if let Some(terrain) = self.field.terrain.as_ref() {
            self.push_candidate(&terrain.id, kind, HookHolder::Field, EffectSlot::Terrain, 0, candidates, seq)?;
        }
        Ok(())
    }

    /// Handlers whose effect was removed earlier in the same dispatch do not run.
    fn still_attached(&self, candidate: &Candidate) -> bool {
        let id = candidate.effect.id.as_str();
        match (candidate.holder, candidate.slot) {
            (HookHolder::Participant(pid), slot) => {
                let Some(p) = self.participants.get(pid) else {
                    return false;
                };
                match slot {
                    EffectSlot::Ability => p.has_ability(id),
                    EffectSlot::Item => p.has_item(id),
                    _ => p.has_volatile(id),
                }
            }
            (HookHolder::Side(side), _) => self
                .sides
                .get(side)
                .map(|s| s.conditions.iter().any(|c| c.id == id))
                .unwrap_or(false),
            (HookHolder::Field, EffectSlot::Terrain) => self.field.is_terrain(id),
            (HookHolder::Field, _) => self.field.is_weather(&[id]),
        }
    }
}
