//! Hooks for the custom ability pack. Names, flags and priorities live in
//! `data/content/slrb.yaml`; this file binds the behaviour.

use crate::core::battle::Battle;
use crate::core::descriptor::{EffectFlag, HookResult, Outcome};
use crate::core::dispatch::HookEvent;
use crate::core::events::EventKind;
use crate::core::log::Message;
use crate::core::modifier::Modifier;
use crate::core::state::{BoostChange, BoostId, EffectSlot, ParticipantId};
use crate::core::utils::apply_stage;
use crate::data::catalog::CatalogBuilder;
use crate::error::HookError;
use tracing::debug;

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .hook("vibrant", EventKind::ModifyPriority, vibrant_priority)
        .hook("shadownerd", EventKind::AfterDamage, shadownerd_after_damage)
        .hook("heatrises", EventKind::TryHit, heatrises_try_hit)
        .hook("superillusion", EventKind::BeforeSwitchIn, illusion_before_switch_in)
        .hook("superillusion", EventKind::AfterDamage, illusion_after_damage)
        .hook("superillusion", EventKind::End, illusion_end)
        .hook("superillusion", EventKind::Faint, illusion_faint)
        .hook("redtunic", EventKind::BeforeMove, redtunic_stance_change)
        .hook("redtunic", EventKind::SourceModifyAtk, redtunic_weaken_fire)
        .hook("redtunic", EventKind::SourceModifySpA, redtunic_weaken_fire)
        .hook("redtunic", EventKind::ModifySpA, redtunic_typeless_boost)
        .hook("redtunic", EventKind::ModifyPriority, redtunic_prankster)
        .hook("redtunic", EventKind::Damage, redtunic_burn_damage)
        .hook("flashdrive", EventKind::Start, flashdrive_start)
        .hook("flashdrive", EventKind::ModifyDamage, flashdrive_resisted_boost)
        .hook("jolthaymaker", EventKind::BasePower, jolthaymaker_power)
        .hook("fallenwarriors", EventKind::ModifyMove, fallenwarriors_stab)
        .hook("miraclesand", EventKind::Immunity, miraclesand_immunity)
        .hook("miraclesand", EventKind::SwitchOut, miraclesand_switch_out)
        .hook("miraclesand", EventKind::ModifySpe, miraclesand_in_sand)
        .hook("miraclesand", EventKind::ModifyDef, miraclesand_in_sand)
        .hook("foodcoma", EventKind::Residual, foodcoma_residual)
        .hook("foodcoma", EventKind::Start, foodcoma_start)
        .hook("foodcoma", EventKind::BeforeMove, foodcoma_before_move)
        .hook("harvestingsummer", EventKind::ModifyWeight, harvest_weight)
        .hook("harvestingsummer", EventKind::SourceModifyAtk, harvest_thick_fat)
        .hook("harvestingsummer", EventKind::SourceModifySpA, harvest_thick_fat)
        .hook("harvestingsummer", EventKind::Residual, harvest_residual);
}

/// Base species id of the participant's current form.
fn base_species_of(battle: &Battle, id: ParticipantId) -> Result<Option<String>, HookError> {
    let participant = battle.participant(id)?;
    Ok(battle
        .dex
        .species
        .get(&participant.current_form)
        .map(|s| s.base_species_id()))
}

fn vibrant_priority(_battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    match event.active_move() {
        Some(active) if active.is_type("fairy") => Ok(Outcome::set(event.relay + 1)),
        _ => Ok(Outcome::PASS),
    }
}

fn shadownerd_after_damage(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    let Some(active) = event.active_move() else {
        return Ok(Outcome::PASS);
    };
    if active.is_type("dark") || active.is_type("ghost") {
        let change = BoostChange::new().with(BoostId::Spe, 1).with(BoostId::Atk, 1);
        battle.boost(owner, change, event.source(), Some("shadownerd"))?;
    }
    Ok(Outcome::PASS)
}

fn heatrises_try_hit(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    if event.source() == Some(owner) {
        return Ok(Outcome::PASS);
    }
    match event.active_move() {
        Some(active) if active.is_type("fire") || active.is_type("ground") => {
            battle.add(Message::Immune {
                who: battle.who(owner),
                from: Some(event.from_tag()),
            });
            Ok(Outcome::Deny)
        }
        _ => Ok(Outcome::PASS),
    }
}

fn illusion_before_switch_in(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    battle.forget_disguise(owner)?;
    let participant = battle.participant(owner)?;
    let team = battle.side(participant.side)?.team.clone();
    let position = participant.position;
    let mask = team
        .iter()
        .enumerate()
        .rev()
        .take_while(|(index, _)| *index > position)
        .map(|(_, id)| *id)
        .find(|id| battle.participants.get(*id).map(|p| !p.fainted).unwrap_or(false));
    if let Some(mask) = mask {
        battle.set_disguise(owner, Some(mask), Some((EffectSlot::Ability, event.effect.id.clone())))?;
    }
    Ok(Outcome::PASS)
}

fn illusion_after_damage(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    let participant = battle.participant(owner)?;
    if participant.disguise.is_none() {
        return Ok(Outcome::PASS);
    }
    let Some(active) = event.active_move() else {
        return Ok(Outcome::PASS);
    };
    if active.id == "confused" {
        return Ok(Outcome::PASS);
    }
    let types = participant.types.clone();
    if battle.dex.types.type_mod(&active.move_type, &types) > 0 {
        let mut context = event.context.clone();
        battle.run_single(EventKind::End, &event.effect.id, event.holder, event.slot, &mut context)?;
    }
    Ok(Outcome::PASS)
}

fn illusion_end(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    let participant = battle.participant(owner)?;
    if participant.disguise.is_none() {
        return Ok(Outcome::PASS);
    }
    debug!(owner, "illusion cleared");
    let mut details = participant.identity.species.clone();
    if participant.level != 100 {
        details.push_str(&format!(", L{}", participant.level));
    }
    battle.add(Message::Replace {
        who: battle.true_who(owner),
        details,
    });
    battle.add(Message::End {
        who: battle.true_who(owner),
        effect: "Illusion".to_string(),
    });
    battle.set_disguise(owner, None, None)?;
    Ok(Outcome::PASS)
}

fn illusion_faint(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    battle.forget_disguise(owner)?;
    Ok(Outcome::PASS)
}

fn redtunic_stance_change(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    if base_species_of(battle, owner)?.as_deref() != Some("aegislash") || battle.participant(owner)?.transformed {
        return Ok(Outcome::PASS);
    }
    let Some(active) = event.active_move() else {
        return Ok(Outcome::PASS);
    };
    if active.is_status() && active.id != "kingsshield" {
        return Ok(Outcome::PASS);
    }
    let form = if active.id == "kingsshield" { "aegislash" } else { "aegislashblade" };
    battle.change_form(owner, form, false, None)?;
    Ok(Outcome::PASS)
}

fn redtunic_weaken_fire(_battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    match event.active_move() {
        Some(active) if active.is_type("fire") => {
            debug!("Red Tunic weaken");
            Ok(Outcome::chain(Modifier::HALF))
        }
        _ => Ok(Outcome::PASS),
    }
}

fn redtunic_typeless_boost(_battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    match event.active_move() {
        Some(active) if active.is_type("???") => Ok(Outcome::chain(Modifier::ONE_AND_HALF)),
        _ => Ok(Outcome::PASS),
    }
}

fn redtunic_prankster(_battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let relay = event.relay;
    match event.active_move_mut() {
        Some(active) if active.is_status() => {
            active.prankster_boosted = true;
            Ok(Outcome::set(relay + 1))
        }
        _ => Ok(Outcome::PASS),
    }
}

fn redtunic_burn_damage(_battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    if event.context.cause_effect_id() == Some("brn") {
        return Ok(Outcome::chain(Modifier::HALF));
    }
    Ok(Outcome::PASS)
}

fn flashdrive_start(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    let holder = battle.participant(owner)?;
    let own_speed = apply_stage(holder.stats.spe as i64, holder.boosts.get(BoostId::Spe));
    let own_side = holder.side;
    let foe_speed: i64 = (0..battle.sides.len())
        .filter(|side| *side != own_side)
        .filter_map(|side| battle.active(side))
        .filter_map(|foe| battle.participants.get(foe))
        .filter(|foe| foe.is_alive())
        .map(|foe| apply_stage(foe.stats.spe as i64, foe.boosts.get(BoostId::Spe)))
        .sum();
    let change = if foe_speed > 0 && foe_speed >= own_speed {
        BoostChange::single(BoostId::Spe, 1)
    } else {
        BoostChange::single(BoostId::Spa, 1)
    };
    battle.boost(owner, change, Some(owner), Some("flashdrive"))?;
    Ok(Outcome::PASS)
}

fn flashdrive_resisted_boost(_battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    match event.active_move() {
        Some(active) if active.type_mod < 0 => Ok(Outcome::chain(Modifier::DOUBLE)),
        _ => Ok(Outcome::PASS),
    }
}

fn jolthaymaker_power(_battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    match event.active_move() {
        Some(active) if active.has_flag("punch") => Ok(Outcome::chain(Modifier::DOUBLE)),
        _ => Ok(Outcome::PASS),
    }
}

fn fallenwarriors_stab(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    let side = battle.participant(owner)?.side;
    if battle.side(side)?.team.len() == 1 {
        if let Some(active) = event.active_move_mut() {
            active.stab = 2.0;
        }
    }
    Ok(Outcome::PASS)
}

fn miraclesand_immunity(_battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    if event.context.cause_effect_id() == Some("sandstorm") {
        return Ok(Outcome::Deny);
    }
    Ok(Outcome::PASS)
}

fn miraclesand_switch_out(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    battle.participant_mut(owner)?.happiness = 255;
    Ok(Outcome::PASS)
}

fn miraclesand_in_sand(battle: &mut Battle, _event: &mut HookEvent<'_>) -> HookResult {
    if battle.field.is_weather(&["sandstorm"]) {
        return Ok(Outcome::chain(Modifier::ONE_AND_HALF));
    }
    Ok(Outcome::PASS)
}

fn foodcoma_residual(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    let participant = battle.participant(owner)?;
    let base = battle
        .dex
        .species
        .get(&participant.base_form)
        .map(|s| s.base_species_id());
    if base.as_deref() != Some("persian") || participant.transformed {
        return Ok(Outcome::PASS);
    }
    if participant.hp * 2 <= participant.max_hp && participant.current_form == "persian" {
        let reason = event.from_tag();
        battle.change_form(owner, "persianalola", true, Some(&reason))?;
    }
    Ok(Outcome::PASS)
}

fn foodcoma_start(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    battle.detach(owner, "truant")?;
    let participant = battle.participant(owner)?;
    if participant.active_turns > 0 && (participant.moved_this_turn || !participant.will_move) {
        battle.attach(owner, "truant", Some(owner), Some(event.effect.id.as_str()))?;
    }
    Ok(Outcome::PASS)
}

fn foodcoma_before_move(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    if battle.detach(owner, "truant")? {
        battle.add(Message::Cant {
            who: battle.who(owner),
            reason: "ability: Truant".to_string(),
        });
        return Ok(Outcome::Deny);
    }
    battle.attach(owner, "truant", Some(owner), Some(event.effect.id.as_str()))?;
    Ok(Outcome::PASS)
}

fn harvest_weight(_battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    Ok(Outcome::set(event.relay * 2))
}

fn harvest_thick_fat(_battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    match event.active_move() {
        Some(active) if active.is_type("ice") || active.is_type("fire") => {
            debug!("Thick Fat weaken");
            Ok(Outcome::chain(Modifier::HALF))
        }
        _ => Ok(Outcome::PASS),
    }
}

fn harvest_residual(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    if !battle.field.is_weather(&["sunnyday", "desolateland"]) && !battle.random_chance(1, 2) {
        return Ok(Outcome::PASS);
    }
    let participant = battle.participant(owner)?;
    if participant.hp == 0 || participant.item.is_some() {
        return Ok(Outcome::PASS);
    }
    let Some(last) = participant.last_item.clone() else {
        return Ok(Outcome::PASS);
    };
    let Some(berry) = battle
        .catalog
        .get(&last)
        .filter(|d| d.has_flag(EffectFlag::Berry))
        .cloned()
    else {
        return Ok(Outcome::PASS);
    };
    let participant = battle.participant_mut(owner)?;
    participant.item = Some(last);
    participant.item_data.clear();
    participant.last_item = None;
    battle.add(Message::Item {
        who: battle.who(owner),
        item: berry.name.clone(),
        from: Some("ability: Harvest".to_string()),
    });
    Ok(Outcome::PASS)
}
