//! Hooks for the custom held items, plus the berry the harvest ability recycles.

use crate::core::battle::Battle;
use crate::core::descriptor::{EffectDescriptor, EffectFlag, HookResult, Outcome};
use crate::core::dispatch::HookEvent;
use crate::core::events::EventKind;
use crate::core::log::Message;
use crate::core::modifier::Modifier;
use crate::data::catalog::CatalogBuilder;

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .hook("dewofdewm", EventKind::BasePower, dewofdewm_power)
        .hook("dewofdewm", EventKind::ModifySpA, dewofdewm_eon_boost)
        .hook("dewofdewm", EventKind::ModifySpD, dewofdewm_eon_boost)
        .hook("satsuma", EventKind::Residual, satsuma_residual)
        .hook("satsuma", EventKind::Terrain, satsuma_terrain)
        .hook("distortedlens", EventKind::SourceModifyDamage, distortedlens_invert)
        .add(
            EffectDescriptor::item("sitrusberry", "Sitrus Berry")
                .flag(EffectFlag::Berry)
                .on(EventKind::AfterDamage, sitrus_after_damage)
                .describe("Restores 1/4 of max HP when at 1/2 or less."),
        );
}

fn dewofdewm_power(_battle: &mut Battle, _event: &mut HookEvent<'_>) -> HookResult {
    Ok(Outcome::PASS)
}

fn dewofdewm_eon_boost(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    let participant = battle.participant(owner)?;
    let num = battle
        .dex
        .species
        .get(&participant.base_form)
        .map(|s| s.num)
        .unwrap_or(0);
    if num == 380 || num == 381 {
        return Ok(Outcome::chain(Modifier::ONE_AND_HALF));
    }
    Ok(Outcome::PASS)
}

fn satsuma_residual(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    if battle.field.is_terrain("grassyterrain") {
        return Ok(Outcome::PASS);
    }
    satsuma_heal(battle, event)
}

fn satsuma_terrain(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    if !battle.field.is_terrain("grassyterrain") {
        return Ok(Outcome::PASS);
    }
    satsuma_heal(battle, event)
}

fn satsuma_heal(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    let amount = (battle.participant(owner)?.max_hp / 16).max(1) as i64;
    battle.heal(owner, amount, Some("satsuma"))?;
    Ok(Outcome::PASS)
}

/// Multiplier the lens applies to damage of each type.
fn lens_multiplier(move_type: &str) -> Option<Modifier> {
    match move_type.to_ascii_lowercase().as_str() {
        "fighting" | "ground" | "fire" => Some(Modifier::QUARTER),
        "normal" | "dragon" | "grass" | "ice" | "dark" | "steel" => Some(Modifier::from_raw(4 * 4096)),
        "bug" | "rock" => Some(Modifier::from_raw(8 * 4096)),
        _ => None,
    }
}

fn distortedlens_invert(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let holder = event.require_owner()?;
    let Some(active) = event.active_move() else {
        return Ok(Outcome::PASS);
    };
    let Some(multiplier) = lens_multiplier(&active.move_type) else {
        return Ok(Outcome::PASS);
    };
    let exposed = !battle.participant(holder)?.has_volatile("substitute")
        || active.has_flag("authentic")
        || active.infiltrates;
    if !exposed {
        return Ok(Outcome::PASS);
    }
    battle.add(Message::EndItem {
        who: battle.who(holder),
        item: event.effect.name.clone(),
        note: Some("weaken".to_string()),
    });
    Ok(Outcome::chain(multiplier))
}

fn sitrus_after_damage(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    let participant = battle.participant(owner)?;
    if !participant.is_alive() || participant.hp * 2 > participant.max_hp {
        return Ok(Outcome::PASS);
    }
    let amount = (participant.max_hp / 4) as i64;
    if battle.consume_item(owner)? {
        battle.heal(owner, amount, None)?;
    }
    Ok(Outcome::PASS)
}
