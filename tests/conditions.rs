use battle_hooks::core::descriptor::{EffectDescriptor, EffectFlag, HookResult, Outcome};
use battle_hooks::core::dispatch::HookEvent;
use battle_hooks::core::events::{Cause, EventKind};
use battle_hooks::core::log::Message;
use battle_hooks::core::state::{BoostChange, BoostId, EffectSlot};
use battle_hooks::error::BattleError;
use battle_hooks::{Action, Battle, BattleOptions, BattleSetup, Catalog, Dex};
use serde_json::json;
use std::sync::Arc;

fn battle() -> Battle {
    let setup = BattleSetup::from_json_value(json!({
        "sides": [
            { "name": "Alice", "members": [
                { "species": "snorlax", "item": "satsuma", "moves": ["tackle", "splash"] }
            ]},
            { "name": "Bob", "members": [
                { "species": "magikarp", "item": "dewofdewm", "moves": ["splash"] },
                { "species": "persian", "moves": ["tackle"] }
            ]}
        ]
    }))
    .expect("setup");
    let mut battle = Battle::from_setup(setup, BattleOptions::default().with_seed(11)).expect("battle");
    battle.start().expect("start");
    battle
}

fn has_line(battle: &Battle, line: &str) -> bool {
    battle.log_lines().iter().any(|l| l == line)
}

#[test]
fn attach_detach_round_trip() {
    let mut battle = battle();
    assert!(battle.attach(0, "brn", None, None).expect("attach"));
    assert!(has_line(&battle, "|-start|p1a: Snorlax|brn"));
    assert!(!battle.attach(0, "brn", None, None).expect("second attach"));
    assert_eq!(battle.participant(0).expect("snorlax").volatiles.len(), 1);

    assert!(battle.detach(0, "brn").expect("detach"));
    assert!(has_line(&battle, "|-end|p1a: Snorlax|brn"));
    assert!(!battle.detach(0, "brn").expect("second detach"));
    assert!(battle.participant(0).expect("snorlax").volatiles.is_empty());
}

#[test]
fn unknown_or_misplaced_conditions_are_not_attached() {
    let mut battle = battle();
    assert!(!battle.attach(0, "nosuchthing", None, None).expect("unknown"));
    assert!(!battle.attach(0, "sandstorm", None, None).expect("weather"));
    assert!(!battle.attach(0, "satsuma", None, None).expect("item"));
    assert!(battle.participant(0).expect("snorlax").volatiles.is_empty());
}

#[test]
fn substitute_start_can_refuse() {
    let mut battle = battle();
    let max_hp = battle.participant(1).expect("magikarp").max_hp;

    battle.participant_mut(1).expect("magikarp").hp = max_hp / 4;
    assert!(!battle.attach(1, "substitute", Some(1), None).expect("attach"));
    assert!(has_line(&battle, "|-fail|p2a: Magikarp"));
    assert!(!battle.participant(1).expect("magikarp").has_volatile("substitute"));

    battle.participant_mut(1).expect("magikarp").hp = max_hp;
    assert!(battle.attach(1, "substitute", Some(1), None).expect("attach"));
    let magikarp = battle.participant(1).expect("magikarp");
    assert_eq!(magikarp.hp, max_hp - max_hp / 4);
    let stored = magikarp
        .volatile("substitute")
        .and_then(|v| v.data.get("hp"))
        .and_then(|v| v.as_i64());
    assert_eq!(stored, Some((max_hp / 4) as i64));
}

#[test]
fn substitute_soaks_a_hit_and_breaks() {
    let mut battle = battle();
    assert!(battle.attach(1, "substitute", Some(1), None).expect("attach"));
    let hp_behind_sub = battle.participant(1).expect("magikarp").hp;

    battle
        .run_turn(&[Action::use_move(0, "tackle"), Action::use_move(1, "splash")])
        .expect("turn");

    let magikarp = battle.participant(1).expect("magikarp");
    assert_eq!(magikarp.hp, hp_behind_sub);
    assert!(!magikarp.has_volatile("substitute"));
    assert!(has_line(&battle, "|-activate|p2a: Magikarp|Substitute|[damage]"));
    assert!(has_line(&battle, "|-end|p2a: Magikarp|Substitute"));
}

#[test]
fn fainting_clears_volatiles_and_boosts() {
    let mut battle = battle();
    battle.attach(1, "brn", None, None).expect("attach");
    battle
        .boost(1, BoostChange::single(BoostId::Spe, 2), None, None)
        .expect("boost");
    assert!(battle.faint(1).expect("faint"));
    assert!(!battle.faint(1).expect("already fainted"));

    let magikarp = battle.participant(1).expect("magikarp");
    assert!(magikarp.fainted);
    assert_eq!(magikarp.hp, 0);
    assert!(magikarp.volatiles.is_empty());
    assert_eq!(magikarp.boosts.get(BoostId::Spe), 0);
    assert!(has_line(&battle, "|faint|p2a: Magikarp"));
    assert!(!battle.attach(1, "brn", None, None).expect("attach to fainted"));
}

#[test]
fn stages_clamp_at_six() {
    let mut battle = battle();
    let applied = battle
        .boost(0, BoostChange::single(BoostId::Atk, 4), None, None)
        .expect("boost");
    assert_eq!(applied, BoostChange::single(BoostId::Atk, 4));

    let applied = battle
        .boost(0, BoostChange::single(BoostId::Atk, 4), None, None)
        .expect("boost");
    assert_eq!(applied, BoostChange::single(BoostId::Atk, 2));
    assert!(has_line(&battle, "|-boost|p1a: Snorlax|atk|2"));

    let applied = battle
        .boost(0, BoostChange::single(BoostId::Atk, 1), None, None)
        .expect("boost");
    assert_eq!(applied, BoostChange::new());
    assert!(has_line(&battle, "|-boost|p1a: Snorlax|atk|0"));

    let applied = battle
        .boost(0, BoostChange::single(BoostId::Def, -13), None, None)
        .expect("unboost");
    assert_eq!(applied, BoostChange::single(BoostId::Def, -6));
    let snorlax = battle.participant(0).expect("snorlax");
    assert_eq!(snorlax.boosts.get(BoostId::Atk), 6);
    assert_eq!(snorlax.boosts.get(BoostId::Def), -6);
}

#[test]
fn damage_and_heal_respect_bounds() {
    let mut battle = battle();
    let max_hp = battle.participant(0).expect("snorlax").max_hp as i64;
    assert_eq!(battle.heal(0, 50, None).expect("heal at full"), 0);
    assert_eq!(
        battle
            .damage(0, 100, Some(1), Some(Cause::Effect("brn".to_string())))
            .expect("damage"),
        100
    );
    assert_eq!(battle.heal(0, 500, Some("satsuma")).expect("heal"), 100);
    assert!(battle
        .log_lines()
        .iter()
        .any(|l| l.ends_with("|[from] item: Satsuma")));
    assert_eq!(battle.damage(0, max_hp * 3, None, None).expect("overkill"), max_hp);
    assert!(battle.participant(0).expect("snorlax").fainted);
}

#[test]
fn weather_and_terrain_are_validated() {
    let mut battle = battle();
    assert!(matches!(
        battle.set_weather("nosuchweather", None, None),
        Err(BattleError::UnknownEffect(_))
    ));
    assert!(matches!(
        battle.set_weather("grassyterrain", None, None),
        Err(BattleError::WrongEffectKind { .. })
    ));
    assert!(matches!(
        battle.add_side_condition(0, "brn", None),
        Err(BattleError::WrongEffectKind { .. })
    ));

    assert!(battle.set_weather("sandstorm", Some(0), None).expect("weather"));
    assert!(!battle.set_weather("sandstorm", Some(0), None).expect("same weather"));
    assert_eq!(
        battle.field.weather.as_ref().and_then(|w| w.remaining_turns),
        Some(5)
    );
    assert!(battle.set_weather("sunnyday", None, Some(2)).expect("replace"));
    assert_eq!(battle.field.weather.as_ref().map(|w| w.id.as_str()), Some("sunnyday"));
    assert!(battle.clear_weather().expect("clear"));
    assert!(battle.field.weather.is_none());

    assert!(battle.set_terrain("grassyterrain", None, None).expect("terrain"));
    assert!(has_line(&battle, "|-fieldstart|Grassy Terrain"));
    assert!(battle.clear_terrain().expect("clear terrain"));
    assert!(has_line(&battle, "|-fieldend|Grassy Terrain"));
}

#[test]
fn weather_runs_out() {
    let mut battle = battle();
    battle.set_weather("sunnyday", None, Some(2)).expect("weather");
    let splash = [Action::use_move(0, "splash"), Action::use_move(1, "splash")];
    battle.run_turn(&splash).expect("turn 1");
    assert!(battle.field.is_weather(&["sunnyday"]));
    battle.run_turn(&splash).expect("turn 2");
    assert!(battle.field.weather.is_none());
    assert!(has_line(&battle, "|-weather|none"));
}

#[test]
fn form_changes_keep_hp() {
    let mut battle = battle();
    battle.switch_in(1, 1).expect("switch");
    let persian = 2;
    battle.participant_mut(persian).expect("persian").hp = 100;

    assert!(matches!(
        battle.change_form(persian, "persianmega", false, None),
        Err(BattleError::UnknownForm(_))
    ));
    assert!(battle
        .change_form(persian, "persianalola", false, Some("ability: Food Coma"))
        .expect("form"));
    let changed = battle.participant(persian).expect("persian");
    assert_eq!(changed.hp, 100);
    assert_eq!(changed.current_form, "persianalola");
    assert_eq!(changed.types, vec!["dark".to_string()]);
    assert!(has_line(
        &battle,
        "|-formechange|p2a: Persian|Persian-Alola|[from] ability: Food Coma"
    ));
    assert!(!battle
        .change_form(persian, "persianalola", false, None)
        .expect("same form"));
}

#[test]
fn items_can_be_taken_unless_nontransferable() {
    let mut battle = battle();
    assert_eq!(battle.take_item(1, Some(0)).expect("take"), None);
    assert_eq!(battle.participant(1).expect("magikarp").item.as_deref(), Some("dewofdewm"));

    assert_eq!(battle.take_item(0, Some(1)).expect("take"), Some("satsuma".to_string()));
    assert!(battle.participant(0).expect("snorlax").item.is_none());

    assert!(battle.set_item(0, "sitrusberry", None).expect("give"));
    assert!(matches!(
        battle.set_item(0, "brn", None),
        Err(BattleError::WrongEffectKind { .. })
    ));
    assert!(battle.consume_item(0).expect("eat"));
    let snorlax = battle.participant(0).expect("snorlax");
    assert!(snorlax.item.is_none());
    assert_eq!(snorlax.last_item.as_deref(), Some("sitrusberry"));
    assert!(has_line(&battle, "|-enditem|p1a: Snorlax|Sitrus Berry|[eat]"));
}

#[test]
fn switching_out_drops_non_persistent_volatiles() {
    let mut battle = battle();
    battle.attach(1, "brn", None, None).expect("attach");
    battle.attach(1, "truant", None, None).expect("attach");
    battle
        .run_turn(&[Action::use_move(0, "splash"), Action::switch(1, 1)])
        .expect("turn");

    let magikarp = battle.participant(1).expect("magikarp");
    assert!(!magikarp.active);
    assert!(magikarp.has_volatile("brn"));
    assert!(!magikarp.has_volatile("truant"));
    assert_eq!(battle.active(1), Some(2));
}

fn mask_end(battle: &mut Battle, _event: &mut HookEvent<'_>) -> HookResult {
    battle.add(Message::Debug {
        text: "mask-end".to_string(),
    });
    Ok(Outcome::PASS)
}

fn masked_battle() -> Battle {
    let mut builder = Catalog::builder();
    builder
        .add(EffectDescriptor::volatile("mask", "Mask").on(EventKind::End, mask_end))
        .add(EffectDescriptor::volatile("hero", "Hero").flag(EffectFlag::Identity))
        .add(EffectDescriptor::volatile("villain", "Villain").flag(EffectFlag::Identity))
        .add(EffectDescriptor::volatile("magikarpuser", "Magikarp").flag(EffectFlag::Identity));
    let setup = BattleSetup::from_json_value(json!({
        "sides": [
            { "name": "Alice", "members": [
                { "name": "Hero", "species": "snorlax", "moves": ["splash"] },
                { "species": "magikarp", "moves": ["splash"] }
            ]},
            { "name": "Bob", "members": [{ "species": "persian", "moves": ["tackle"] }] }
        ]
    }))
    .expect("setup");
    let dex = Dex::load_default().expect("dex");
    let mut battle = Battle::new(Arc::new(builder.build()), Arc::new(dex), setup, BattleOptions::default())
        .expect("battle");
    battle.start().expect("start");
    battle
}

fn volatile_ids(battle: &Battle, id: usize) -> Vec<String> {
    battle
        .participant(id)
        .expect("participant")
        .volatiles
        .iter()
        .map(|v| v.id.clone())
        .collect()
}

#[test]
fn species_names_get_a_user_suffix() {
    let battle = masked_battle();
    assert_eq!(battle.identity_volatile_id("Magikarp"), "magikarpuser");
    assert_eq!(battle.identity_volatile_id("Hero"), "hero");
}

#[test]
fn breaking_a_volatile_disguise_ends_it_and_restores_identity() {
    let mut battle = masked_battle();
    assert!(battle.attach(0, "mask", None, None).expect("mask"));
    assert!(battle.attach(0, "magikarpuser", None, None).expect("masked identity"));
    assert!(battle
        .set_disguise(0, Some(1), Some((EffectSlot::Volatile, "mask".to_string())))
        .expect("disguise"));
    assert_eq!(battle.who(0), "p1a: Magikarp");

    assert!(battle.set_disguise(0, None, None).expect("break"));
    assert!(battle.log_lines().iter().any(|l| l == "|debug|mask-end"));
    assert!(battle.participant(0).expect("hero").disguise.is_none());
    assert_eq!(volatile_ids(&battle, 0), vec!["hero".to_string()]);
    assert_eq!(battle.who(0), "p1a: Hero");

    assert!(!battle.set_disguise(0, None, None).expect("nothing to break"));
}

#[test]
fn another_identity_volatile_blocks_restoring_the_true_one() {
    let mut battle = masked_battle();
    assert!(battle.attach(0, "villain", None, None).expect("villain"));
    assert!(battle.set_disguise(0, Some(1), None).expect("disguise"));

    assert!(battle.set_disguise(0, None, None).expect("break"));
    assert_eq!(volatile_ids(&battle, 0), vec!["villain".to_string()]);
}
