//! Primitives handlers call to act on the battle: boosts, damage, healing,
//! items, weather, terrain and random rolls.

use crate::core::battle::Battle;
use crate::core::descriptor::{EffectDescriptor, EffectFlag, EffectKind, FieldSlot};
use crate::core::dispatch::{from_tag, HookHolder};
use crate::core::events::{Cause, EventContext, EventKind, EventResult};
use crate::core::log::Message;
use crate::core::state::{BoostChange, BoostId, EffectSlot, FieldEffect, ParticipantId};
use crate::error::BattleError;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

impl Battle {
    fn from_label(&self, effect: Option<&str>) -> Option<String> {
        effect.and_then(|id| self.catalog.get(id)).map(|d| from_tag(d))
    }

    pub(crate) fn refresh_active_speeds(&mut self) -> Result<(), BattleError> {
        let actives: Vec<ParticipantId> = self.sides.iter().filter_map(|s| s.active).collect();
        for id in actives {
            if self.participant(id)?.is_alive() {
                self.refresh_speed(id)?;
            }
        }
        Ok(())
    }

    /// Applies stage changes, clamped to [-6, +6]. Returns what actually changed.
    pub fn boost(
        &mut self,
        target: ParticipantId,
        change: BoostChange,
        source: Option<ParticipantId>,
        effect: Option<&str>,
    ) -> Result<BoostChange, BattleError> {
        if !self.participant(target)?.is_alive() {
            return Ok(BoostChange::new());
        }
        let from = self.from_label(effect);
        let who = self.who(target);
        let mut entries = change.0;
        entries.sort_by_key(|(id, _)| *id);

        let mut applied = BoostChange::new();
        let mut speed_changed = false;
        for (id, delta) in entries {
            if delta == 0 {
                continue;
            }
            let actual = self.participant_mut(target)?.boosts.add(id, delta);
            let message = if actual == 0 {
                Message::BoostCapped {
                    who: who.clone(),
                    stat: id.label().to_string(),
                    rising: delta > 0,
                }
            } else if actual > 0 {
                Message::Boost {
                    who: who.clone(),
                    stat: id.label().to_string(),
                    amount: actual,
                    from: from.clone(),
                }
            } else {
                Message::Unboost {
                    who: who.clone(),
                    stat: id.label().to_string(),
                    amount: -actual,
                    from: from.clone(),
                }
            };
            self.add(message);
            if actual != 0 {
                speed_changed |= id == BoostId::Spe;
                applied.0.push((id, actual));
            }
        }
        debug!(target, ?source, ?applied, "boost");
        if speed_changed && self.participant(target)?.active {
            self.refresh_speed(target)?;
        }
        Ok(applied)
    }

    /// Deals damage through the `Damage` hooks. Returns the HP actually lost.
    pub fn damage(
        &mut self,
        target: ParticipantId,
        amount: i64,
        source: Option<ParticipantId>,
        cause: Option<Cause>,
    ) -> Result<i64, BattleError> {
        if amount <= 0 || !self.participant(target)?.is_alive() {
            return Ok(0);
        }
        let from = cause
            .as_ref()
            .and_then(Cause::effect_id)
            .and_then(|id| self.catalog.get(id))
            .map(|d| from_tag(d));
        let mut context = EventContext::on(target).with_source_opt(source);
        context.cause = cause;
        let amount = match self.dispatch(EventKind::Damage, &mut context, amount)? {
            EventResult::Value(value) => value,
            EventResult::Denied => return Ok(0),
            EventResult::Allowed => amount,
        };
        if amount <= 0 {
            return Ok(0);
        }

        let participant = self.participant_mut(target)?;
        let before = participant.hp;
        participant.hp = (before as i64 - amount).max(0) as i32;
        let (hp, max_hp) = (participant.hp, participant.max_hp);
        self.add(Message::Damage {
            who: self.who(target),
            hp,
            max_hp,
            from,
        });
        if hp == 0 {
            self.faint(target)?;
        }
        Ok((before - hp) as i64)
    }

    /// Restores HP up to the maximum. Returns the HP actually restored.
    pub fn heal(&mut self, target: ParticipantId, amount: i64, effect: Option<&str>) -> Result<i64, BattleError> {
        let participant = self.participant(target)?;
        if amount <= 0 || !participant.is_alive() || participant.hp >= participant.max_hp {
            return Ok(0);
        }
        let from = self.from_label(effect);
        let participant = self.participant_mut(target)?;
        let before = participant.hp;
        participant.hp = (before as i64 + amount).min(participant.max_hp as i64) as i32;
        let (hp, max_hp) = (participant.hp, participant.max_hp);
        self.add(Message::Heal {
            who: self.who(target),
            hp,
            max_hp,
            from,
        });
        Ok((hp - before) as i64)
    }

    /// Gives a participant an item, replacing whatever it held.
    pub fn set_item(&mut self, target: ParticipantId, id: &str, effect: Option<&str>) -> Result<bool, BattleError> {
        let descriptor = Arc::clone(self.catalog.require(id)?);
        if descriptor.kind != EffectKind::Item {
            return Err(BattleError::WrongEffectKind {
                id: id.to_string(),
                expected: EffectKind::Item.label(),
                actual: descriptor.kind.label(),
            });
        }
        let participant = self.participant_mut(target)?;
        if participant.fainted || participant.has_item(id) {
            return Ok(false);
        }
        participant.item = Some(id.to_string());
        participant.item_data.clear();
        let from = self.from_label(effect);
        self.add(Message::Item {
            who: self.who(target),
            item: descriptor.name.clone(),
            from,
        });
        self.run_single(
            EventKind::Start,
            id,
            HookHolder::Participant(target),
            EffectSlot::Item,
            &mut EventContext::on(target),
        )?;
        Ok(true)
    }

    /// Removes a participant's item if it can be taken. Returns the removed item id.
    pub fn take_item(&mut self, target: ParticipantId, source: Option<ParticipantId>) -> Result<Option<String>, BattleError> {
        let Some(id) = self.participant(target)?.item.clone() else {
            return Ok(None);
        };
        if self.catalog.get(&id).map(|d| d.has_flag(EffectFlag::Nontransferable)).unwrap_or(false) {
            return Ok(None);
        }
        let mut context = EventContext::on(target).with_source_opt(source);
        if !self.run_check(EventKind::TakeItem, &mut context)? {
            return Ok(None);
        }
        let name = self.catalog.get(&id).map(|d| d.name.clone()).unwrap_or_else(|| id.clone());
        let participant = self.participant_mut(target)?;
        participant.item = None;
        participant.item_data.clear();
        self.add(Message::EndItem {
            who: self.who(target),
            item: name,
            note: None,
        });
        Ok(Some(id))
    }

    /// Uses up the held item; it is remembered as the last item.
    pub fn consume_item(&mut self, target: ParticipantId) -> Result<bool, BattleError> {
        let Some(id) = self.participant(target)?.item.clone() else {
            return Ok(false);
        };
        let descriptor = self.catalog.get(&id).map(Arc::clone);
        let participant = self.participant_mut(target)?;
        participant.item = None;
        participant.item_data.clear();
        participant.last_item = Some(id.clone());
        let (name, note) = match descriptor {
            Some(d) => (
                d.name.clone(),
                d.has_flag(EffectFlag::Berry).then(|| "eat".to_string()),
            ),
            None => (id, None),
        };
        self.add(Message::EndItem {
            who: self.who(target),
            item: name,
            note,
        });
        Ok(true)
    }

    fn field_effect(&self, id: &str, slot: FieldSlot) -> Result<Arc<EffectDescriptor>, BattleError> {
        let effect = Arc::clone(self.catalog.require(id)?);
        if effect.kind != EffectKind::FieldCondition || effect.slot != Some(slot) {
            return Err(BattleError::WrongEffectKind {
                id: id.to_string(),
                expected: match slot {
                    FieldSlot::Weather => "weather",
                    FieldSlot::Terrain => "terrain",
                    FieldSlot::Side => "side condition",
                },
                actual: effect.kind.label(),
            });
        }
        Ok(effect)
    }

    /// Starts a weather. An unknown or non-weather id is fatal.
    pub fn set_weather(&mut self, id: &str, source: Option<ParticipantId>, turns: Option<u32>) -> Result<bool, BattleError> {
        let effect = self.field_effect(id, FieldSlot::Weather)?;
        if self.field.is_weather(&[id]) {
            return Ok(false);
        }
        if let Some(previous) = self.field.weather.as_ref().map(|w| w.id.clone()) {
            self.end_best_effort(&previous, HookHolder::Field, EffectSlot::Weather, EventContext::field());
        }
        let previous = self
            .field
            .weather
            .replace(FieldEffect::new(id, source, turns.or(effect.duration)));
        let started = self.run_single(
            EventKind::Start,
            id,
            HookHolder::Field,
            EffectSlot::Weather,
            &mut EventContext::field().with_source_opt(source),
        )?;
        if started.is_denied() {
            self.field.weather = previous;
            return Ok(false);
        }
        self.add(Message::Weather {
            id: effect.name.clone(),
            upkeep: false,
        });
        self.refresh_active_speeds()?;
        Ok(true)
    }

    pub fn clear_weather(&mut self) -> Result<bool, BattleError> {
        let Some(id) = self.field.weather.as_ref().map(|w| w.id.clone()) else {
            return Ok(false);
        };
        self.end_best_effort(&id, HookHolder::Field, EffectSlot::Weather, EventContext::field());
        self.field.weather = None;
        self.add(Message::Weather {
            id: "none".to_string(),
            upkeep: false,
        });
        self.refresh_active_speeds()?;
        Ok(true)
    }

    /// Starts a terrain. An unknown or non-terrain id is fatal.
    pub fn set_terrain(&mut self, id: &str, source: Option<ParticipantId>, turns: Option<u32>) -> Result<bool, BattleError> {
        let effect = self.field_effect(id, FieldSlot::Terrain)?;
        if self.field.is_terrain(id) {
            return Ok(false);
        }
        if let Some(previous) = self.field.terrain.as_ref().map(|t| t.id.clone()) {
            self.end_best_effort(&previous, HookHolder::Field, EffectSlot::Terrain, EventContext::field());
        }
        let previous = self
            .field
            .terrain
            .replace(FieldEffect::new(id, source, turns.or(effect.duration)));
        let started = self.run_single(
            EventKind::Start,
            id,
            HookHolder::Field,
            EffectSlot::Terrain,
            &mut EventContext::field().with_source_opt(source),
        )?;
        if started.is_denied() {
            self.field.terrain = previous;
            return Ok(false);
        }
        self.add(Message::FieldStart { id: effect.name.clone() });
        self.refresh_active_speeds()?;
        Ok(true)
    }

    pub fn clear_terrain(&mut self) -> Result<bool, BattleError> {
        let Some(id) = self.field.terrain.as_ref().map(|t| t.id.clone()) else {
            return Ok(false);
        };
        self.end_best_effort(&id, HookHolder::Field, EffectSlot::Terrain, EventContext::field());
        self.field.terrain = None;
        let name = self.catalog.get(&id).map(|d| d.name.clone()).unwrap_or(id);
        self.add(Message::FieldEnd { id: name });
        self.refresh_active_speeds()?;
        Ok(true)
    }

    /// True with probability `numerator / denominator`, drawn from the battle's seeded source.
    pub fn random_chance(&mut self, numerator: u32, denominator: u32) -> bool {
        if denominator == 0 {
            return false;
        }
        if numerator >= denominator {
            return true;
        }
        self.rng.gen_ratio(numerator, denominator)
    }
}
