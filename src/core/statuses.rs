//! Standard conditions the custom content depends on.

use crate::core::battle::Battle;
use crate::core::descriptor::{EffectDescriptor, EffectFlag, HookResult, Outcome};
use crate::core::dispatch::HookEvent;
use crate::core::events::{Cause, EventContext, EventKind};
use crate::core::log::Message;
use crate::core::modifier::Modifier;
use crate::data::catalog::CatalogBuilder;
use serde_json::json;

pub fn register(builder: &mut CatalogBuilder) {
    builder
        .add(
            EffectDescriptor::volatile("brn", "Burn")
                .flag(EffectFlag::Persistent)
                .on(EventKind::Start, burn_start)
                .on(EventKind::Residual, burn_residual)
                .sub_order(EventKind::Residual, 10)
                .on(EventKind::End, burn_end)
                .describe("Loses 1/16 of max HP at the end of each turn; physical damage is halved."),
        )
        .add(
            EffectDescriptor::volatile("truant", "Truant")
                .describe("Marker: the holder loafs around on its next move."),
        )
        .add(
            EffectDescriptor::volatile("substitute", "Substitute")
                .on(EventKind::Start, substitute_start)
                .on_with_priority(EventKind::TryHit, -1, substitute_try_hit)
                .on(EventKind::End, substitute_end)
                .describe("A decoy with a quarter of the user's max HP absorbs direct hits."),
        )
        .add(
            EffectDescriptor::volatile("flare", "Flare")
                .flag(EffectFlag::Identity)
                .flag(EffectFlag::Persistent)
                .describe("Flare's true identity, attached once the illusion breaks."),
        )
        .add(
            EffectDescriptor::weather("sandstorm", "Sandstorm")
                .duration(5)
                .on(EventKind::Residual, sandstorm_residual)
                .sub_order(EventKind::Residual, 1)
                .on(EventKind::ModifySpD, sandstorm_spd)
                .describe("Rock, Ground and Steel types are spared 1/16 chip damage; Rock types get 1.5x Sp. Def."),
        )
        .add(
            EffectDescriptor::weather("sunnyday", "SunnyDay")
                .duration(5)
                .on(EventKind::ModifyDamage, sun_damage)
                .describe("Fire moves deal 1.5x damage, Water moves 0.5x."),
        )
        .add(
            EffectDescriptor::terrain("grassyterrain", "Grassy Terrain")
                .duration(5)
                .on(EventKind::BasePower, grassy_power)
                .on(EventKind::Terrain, grassy_heal)
                .describe("Grounded participants heal 1/16 each turn; Grass moves get 1.5x power."),
        );
}

fn burn_start(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    battle.add(Message::Start {
        who: battle.who(owner),
        effect: "brn".to_string(),
    });
    Ok(Outcome::PASS)
}

fn burn_residual(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    let max_hp = battle.participant(owner)?.max_hp as i64;
    battle.damage(owner, (max_hp / 16).max(1), None, Some(Cause::Effect("brn".to_string())))?;
    Ok(Outcome::PASS)
}

fn burn_end(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    if battle.participant(owner)?.is_alive() {
        battle.add(Message::End {
            who: battle.who(owner),
            effect: "brn".to_string(),
        });
    }
    Ok(Outcome::PASS)
}

fn substitute_start(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    let participant = battle.participant(owner)?;
    let cost = (participant.max_hp / 4) as i64;
    if participant.hp as i64 <= cost || cost == 0 {
        battle.add(Message::Fail { who: battle.who(owner) });
        return Ok(Outcome::Deny);
    }
    battle.participant_mut(owner)?.hp -= cost as i32;
    battle.add(Message::Start {
        who: battle.who(owner),
        effect: "Substitute".to_string(),
    });
    if let Some(data) = battle.effect_data_mut(event.holder, event.slot, "substitute") {
        data.insert("hp".to_string(), json!(cost));
    }
    Ok(Outcome::PASS)
}

fn substitute_try_hit(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    let Some(attacker) = event.source().filter(|s| *s != owner) else {
        return Ok(Outcome::PASS);
    };
    let Some(active) = event.active_move().cloned() else {
        return Ok(Outcome::PASS);
    };
    if active.is_status() || active.has_flag("authentic") || active.infiltrates {
        return Ok(Outcome::PASS);
    }

    let mut active = active;
    let types = battle.participant(owner)?.types.clone();
    if battle.dex.types.is_immune(&active.move_type, &types) {
        return Ok(Outcome::PASS);
    }
    active.type_mod = battle.dex.types.type_mod(&active.move_type, &types);
    let damage = battle.calc_damage(attacker, owner, &active)?;

    let Some(data) = battle.effect_data_mut(event.holder, event.slot, "substitute") else {
        return Ok(Outcome::PASS);
    };
    let remaining = data.get("hp").and_then(|v| v.as_i64()).unwrap_or(0) - damage;
    data.insert("hp".to_string(), json!(remaining.max(0)));
    battle.add(Message::Activate {
        who: battle.who(owner),
        effect: "Substitute|[damage]".to_string(),
    });
    if remaining <= 0 {
        battle.detach(owner, "substitute")?;
    }
    Ok(Outcome::Deny)
}

fn substitute_end(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    battle.add(Message::End {
        who: battle.who(owner),
        effect: "Substitute".to_string(),
    });
    Ok(Outcome::PASS)
}

fn sandstorm_residual(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let Some(target) = event.target() else {
        return Ok(Outcome::PASS);
    };
    let participant = battle.participant(target)?;
    if ["rock", "ground", "steel"].iter().any(|t| participant.has_type(t)) {
        return Ok(Outcome::PASS);
    }
    let max_hp = participant.max_hp as i64;
    let mut immunity = EventContext::on(target).caused_by_effect("sandstorm");
    if !battle.run_check(EventKind::Immunity, &mut immunity)? {
        return Ok(Outcome::PASS);
    }
    battle.damage(target, (max_hp / 16).max(1), None, Some(Cause::Effect("sandstorm".to_string())))?;
    Ok(Outcome::PASS)
}

fn sandstorm_spd(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let Some(target) = event.target() else {
        return Ok(Outcome::PASS);
    };
    if battle.participant(target)?.has_type("rock") {
        return Ok(Outcome::chain(Modifier::ONE_AND_HALF));
    }
    Ok(Outcome::PASS)
}

fn sun_damage(_battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    match event.active_move() {
        Some(active) if active.is_type("fire") => Ok(Outcome::chain(Modifier::ONE_AND_HALF)),
        Some(active) if active.is_type("water") => Ok(Outcome::chain(Modifier::HALF)),
        _ => Ok(Outcome::PASS),
    }
}

fn grassy_power(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let Some(user) = event.target() else {
        return Ok(Outcome::PASS);
    };
    let grounded = !battle.participant(user)?.has_type("flying");
    match event.active_move() {
        Some(active) if grounded && active.is_type("grass") => Ok(Outcome::chain(Modifier::ONE_AND_HALF)),
        _ => Ok(Outcome::PASS),
    }
}

fn grassy_heal(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let Some(target) = event.target() else {
        return Ok(Outcome::PASS);
    };
    let participant = battle.participant(target)?;
    if participant.has_type("flying") {
        return Ok(Outcome::PASS);
    }
    let amount = (participant.max_hp / 16).max(1) as i64;
    battle.heal(target, amount, Some("grassyterrain"))?;
    Ok(Outcome::PASS)
}
