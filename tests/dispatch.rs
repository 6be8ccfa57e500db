use battle_hooks::core::descriptor::{EffectDescriptor, EffectFlag, HookResult, Outcome};
use battle_hooks::core::dispatch::HookEvent;
use battle_hooks::core::events::{EventContext, EventKind, EventResult};
use battle_hooks::core::log::{DisplaySink, Message};
use battle_hooks::core::modifier::Modifier;
use battle_hooks::core::state::{DataBag, VolatileInstance};
use battle_hooks::error::{BattleError, HookError};
use battle_hooks::{Action, Battle, BattleOptions, BattleSetup, Catalog, Dex};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn note(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    battle.add(Message::Debug {
        text: event.effect_id().to_string(),
    });
    Ok(Outcome::PASS)
}

fn note_and_double(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    note(battle, event)?;
    Ok(Outcome::chain(Modifier::DOUBLE))
}

fn note_and_halve(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    note(battle, event)?;
    Ok(Outcome::chain(Modifier::HALF))
}

fn deny(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    note(battle, event)?;
    Ok(Outcome::Deny)
}

fn override_seven(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    note(battle, event)?;
    Ok(Outcome::Override(7))
}

fn set_to_relay_plus_one(_battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    Ok(Outcome::set(event.relay + 1))
}

fn set_below_zero(_battle: &mut Battle, _event: &mut HookEvent<'_>) -> HookResult {
    Ok(Outcome::set(-5))
}

fn fault(_battle: &mut Battle, _event: &mut HookEvent<'_>) -> HookResult {
    Err(HookError::fault("division by zero"))
}

fn fatal(_battle: &mut Battle, _event: &mut HookEvent<'_>) -> HookResult {
    Err(HookError::Fatal(BattleError::UnknownEffect("missing".to_string())))
}

fn remove_later(battle: &mut Battle, event: &mut HookEvent<'_>) -> HookResult {
    let owner = event.require_owner()?;
    note(battle, event)?;
    battle.detach(owner, "later")?;
    Ok(Outcome::PASS)
}

fn test_catalog() -> Catalog {
    let mut builder = Catalog::builder();
    builder
        .add(
            EffectDescriptor::ability("probe", "Probe")
                .on(EventKind::Residual, note)
                .on(EventKind::ModifyDamage, note_and_double)
                .on(EventKind::BasePower, note_and_double)
                .on(EventKind::ModifyPriority, set_to_relay_plus_one),
        )
        .add(
            EffectDescriptor::item("charm", "Charm")
                .on(EventKind::Residual, note)
                .on(EventKind::SourceModifyDamage, note_and_halve)
                .on_with_priority(EventKind::BasePower, 5, override_seven),
        )
        .add(EffectDescriptor::volatile("urgent", "Urgent").on_with_priority(EventKind::Residual, 9, note))
        .add(
            EffectDescriptor::volatile("tidy", "Tidy")
                .on(EventKind::Residual, note)
                .sub_order(EventKind::Residual, -1),
        )
        .add(EffectDescriptor::volatile("wall", "Wall").on_with_priority(EventKind::TryHit, 3, deny))
        .add(EffectDescriptor::volatile("watcher", "Watcher").on(EventKind::TryHit, note))
        .add(EffectDescriptor::volatile("flaky", "Flaky").on_with_priority(EventKind::BasePower, 9, fault))
        .add(EffectDescriptor::volatile("cursed", "Cursed").on(EventKind::Residual, fatal))
        .add(EffectDescriptor::volatile("sweeper", "Sweeper").on_with_priority(EventKind::Residual, 9, remove_later))
        .add(EffectDescriptor::volatile("later", "Later").on(EventKind::Residual, note))
        .add(EffectDescriptor::volatile("drain", "Drain").on(EventKind::ModifyDamage, set_below_zero))
        .add(EffectDescriptor::volatile("layer", "Layer").flag(EffectFlag::Stackable))
        .add(
            EffectDescriptor::side_condition("screen", "Screen")
                .duration(2)
                .on(EventKind::Residual, note),
        );
    builder.build()
}

fn plain_setup() -> BattleSetup {
    BattleSetup::from_json_value(json!({
        "sides": [
            { "name": "Alice", "members": [
                { "species": "magikarp", "ability": "probe", "item": "charm", "moves": ["splash"] }
            ]},
            { "name": "Bob", "members": [
                { "species": "snorlax", "moves": ["splash", "tackle"] }
            ]}
        ]
    }))
    .expect("setup")
}

fn battle() -> Battle {
    let dex = Dex::load_default().expect("dex");
    Battle::new(Arc::new(test_catalog()), Arc::new(dex), plain_setup(), BattleOptions::default())
        .expect("battle")
}

fn notes(battle: &Battle) -> Vec<String> {
    battle
        .log_lines()
        .into_iter()
        .filter_map(|line| line.strip_prefix("|debug|").map(str::to_string))
        .collect()
}

#[test]
fn equal_priority_follows_category_order() {
    let mut battle = battle();
    battle.attach(0, "later", None, None).expect("attach");
    battle
        .run_notify(EventKind::Residual, &mut EventContext::on(0))
        .expect("dispatch");
    assert_eq!(notes(&battle), vec!["probe", "charm", "later"]);
}

#[test]
fn higher_priority_runs_first_regardless_of_category() {
    let mut battle = battle();
    battle.attach(0, "later", None, None).expect("attach");
    battle.attach(0, "urgent", None, None).expect("attach");
    battle
        .run_notify(EventKind::Residual, &mut EventContext::on(0))
        .expect("dispatch");
    assert_eq!(notes(&battle), vec!["urgent", "probe", "charm", "later"]);
}

#[test]
fn lower_sub_order_runs_first_within_a_priority() {
    let mut battle = battle();
    battle.attach(0, "tidy", None, None).expect("attach");
    battle
        .run_notify(EventKind::Residual, &mut EventContext::on(0))
        .expect("dispatch");
    assert_eq!(notes(&battle), vec!["tidy", "probe", "charm"]);
}

#[test]
fn faster_holder_runs_first_on_ties() {
    let mut battle = battle();
    battle.participant_mut(1).expect("bob").item = Some("charm".to_string());

    battle.participant_mut(0).expect("alice").speed = 10;
    battle.participant_mut(1).expect("bob").speed = 300;
    let mut context = EventContext::on(0).with_source(1);
    let value = battle
        .run_value(EventKind::ModifyDamage, &mut context, 100)
        .expect("dispatch");
    assert_eq!(notes(&battle), vec!["charm", "probe"]);
    assert_eq!(value, 100);

    let mut battle = self::battle();
    battle.participant_mut(1).expect("bob").item = Some("charm".to_string());
    battle.participant_mut(0).expect("alice").speed = 300;
    battle.participant_mut(1).expect("bob").speed = 10;
    let mut context = EventContext::on(0).with_source(1);
    battle
        .run_value(EventKind::ModifyDamage, &mut context, 100)
        .expect("dispatch");
    assert_eq!(notes(&battle), vec!["probe", "charm"]);
}

#[test]
fn deny_stops_the_dispatch() {
    let mut battle = battle();
    battle.attach(1, "watcher", None, None).expect("attach");
    let mut context = EventContext::on(1).with_source(0);
    assert!(battle.run_check(EventKind::TryHit, &mut context).expect("dispatch"));
    assert_eq!(notes(&battle), vec!["watcher"]);

    battle.attach(1, "wall", None, None).expect("attach");
    let result = battle
        .dispatch(EventKind::TryHit, &mut EventContext::on(1).with_source(0), 0)
        .expect("dispatch");
    assert_eq!(result, EventResult::Denied);
    assert_eq!(notes(&battle), vec!["watcher", "wall"]);
}

#[test]
fn override_ends_the_chain_and_faults_are_ignored() {
    let mut battle = battle();
    battle.attach(0, "flaky", None, None).expect("attach");
    let value = battle
        .run_value(EventKind::BasePower, &mut EventContext::on(0), 40)
        .expect("dispatch");
    assert_eq!(value, 7);
    assert_eq!(notes(&battle), vec!["charm"]);
}

#[test]
fn set_replaces_the_running_value() {
    let mut battle = battle();
    let value = battle
        .run_value(EventKind::ModifyPriority, &mut EventContext::on(0), 0)
        .expect("dispatch");
    assert_eq!(value, 1);
}

#[test]
fn set_values_floor_at_zero_except_priority() {
    let mut battle = battle();
    battle.attach(0, "drain", None, None).expect("attach");
    let damage = battle
        .run_value(EventKind::ModifyDamage, &mut EventContext::on(0), 50)
        .expect("dispatch");
    assert_eq!(damage, 0);

    let priority = battle
        .run_value(EventKind::ModifyPriority, &mut EventContext::on(0), -3)
        .expect("dispatch");
    assert_eq!(priority, -2);
}

#[test]
fn handlers_removed_mid_dispatch_do_not_run() {
    let mut battle = battle();
    battle.attach(0, "later", None, None).expect("attach");
    battle.attach(0, "sweeper", None, None).expect("attach");
    battle
        .run_notify(EventKind::Residual, &mut EventContext::on(0))
        .expect("dispatch");
    assert_eq!(notes(&battle), vec!["sweeper", "probe", "charm"]);
    assert!(!battle.participant(0).expect("alice").has_volatile("later"));
}

#[test]
fn fatal_handler_errors_propagate() {
    let mut battle = battle();
    battle.attach(0, "cursed", None, None).expect("attach");
    let err = battle
        .run_notify(EventKind::Residual, &mut EventContext::on(0))
        .expect_err("fatal");
    assert_eq!(err, BattleError::UnknownEffect("missing".to_string()));
}

#[test]
fn duplicate_volatiles_are_corrupt_unless_stackable() {
    let mut battle = battle();
    assert!(battle.attach(0, "layer", None, None).expect("attach"));
    assert!(battle.attach(0, "layer", None, None).expect("attach"));
    battle
        .run_notify(EventKind::Residual, &mut EventContext::on(0))
        .expect("stackable duplicates are fine");

    let duplicate = VolatileInstance {
        id: "later".to_string(),
        owner: 0,
        source: None,
        remaining_turns: None,
        data: DataBag::new(),
    };
    let participant = battle.participant_mut(0).expect("alice");
    participant.volatiles.push(duplicate.clone());
    participant.volatiles.push(duplicate);
    let err = battle
        .run_notify(EventKind::Residual, &mut EventContext::on(0))
        .expect_err("corrupt");
    assert!(matches!(err, BattleError::CorruptVolatiles { participant: 0, .. }));
}

#[test]
fn aborted_turn_rolls_back_and_discards_messages() {
    let mut battle = battle();
    battle.start().expect("start");
    let committed_before = battle.log.committed().len();
    let hp_before = battle.participant(1).expect("bob").hp;

    battle.attach(0, "cursed", None, None).expect("attach");
    let err = battle
        .run_turn(&[Action::use_move(0, "splash"), Action::use_move(1, "tackle")])
        .expect_err("turn aborts");
    assert_eq!(err, BattleError::UnknownEffect("missing".to_string()));

    assert_eq!(battle.turn, 0);
    assert_eq!(battle.participant(1).expect("bob").hp, hp_before);
    assert_eq!(battle.log.committed().len(), committed_before);
    assert!(battle.log.pending().is_empty());
    assert!(battle.is_over());
    assert!(battle.abort_summary().expect("summary").contains("unknown effect 'missing'"));

    let again = battle.run_turn(&[Action::use_move(0, "splash")]);
    assert!(matches!(again, Err(BattleError::Aborted(_))));
}

#[derive(Clone, Default)]
struct Collect(Arc<Mutex<Vec<String>>>);

impl DisplaySink for Collect {
    fn emit(&mut self, message: &Message) {
        self.0.lock().expect("sink lock").push(message.to_string());
    }
}

#[test]
fn sink_sees_only_committed_turns() {
    let mut battle = battle();
    let sink = Collect::default();
    battle.log.set_sink(Box::new(sink.clone()));
    battle.start().expect("start");
    let after_start = sink.0.lock().expect("sink lock").len();
    assert!(after_start > 0);
    assert_eq!(after_start, battle.log.committed().len());

    battle
        .run_turn(&[Action::use_move(0, "splash"), Action::use_move(1, "splash")])
        .expect("turn");
    let after_turn = sink.0.lock().expect("sink lock").clone();
    assert!(after_turn.len() > after_start);
    assert!(after_turn.contains(&"|turn|1".to_string()));

    battle.attach(0, "cursed", None, None).expect("attach");
    battle
        .run_turn(&[Action::use_move(0, "splash"), Action::use_move(1, "splash")])
        .expect_err("turn aborts");
    assert!(!sink.0.lock().expect("sink lock").iter().any(|l| l == "|turn|2"));
}

#[test]
fn side_conditions_follow_volatiles_and_expire() {
    let mut battle = battle();
    battle.start().expect("start");
    battle.attach(0, "later", None, None).expect("attach");
    assert!(battle.add_side_condition(0, "screen", None).expect("screen"));
    assert!(!battle.add_side_condition(0, "screen", None).expect("screen again"));
    battle
        .run_notify(EventKind::Residual, &mut EventContext::on(0))
        .expect("dispatch");
    assert_eq!(notes(&battle), vec!["probe", "charm", "later", "screen"]);

    let splash = [Action::use_move(0, "splash"), Action::use_move(1, "splash")];
    battle.run_turn(&splash).expect("turn 1");
    assert_eq!(battle.side(0).expect("side").conditions.len(), 1);
    battle.run_turn(&splash).expect("turn 2");
    assert!(battle.side(0).expect("side").conditions.is_empty());
    let lines = battle.log_lines();
    assert!(lines.iter().any(|l| l == "|-sidestart|Alice|Screen"));
    assert!(lines.iter().any(|l| l == "|-sideend|Alice|Screen"));
}
