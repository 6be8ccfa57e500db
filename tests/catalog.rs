use battle_hooks::core::descriptor::{EffectDescriptor, EffectFlag, EffectKind, HookResult, Outcome};
use battle_hooks::core::dispatch::HookEvent;
use battle_hooks::core::events::EventKind;
use battle_hooks::error::ContentError;
use battle_hooks::{Battle, Catalog};

fn pass(_battle: &mut Battle, _event: &mut HookEvent<'_>) -> HookResult {
    Ok(Outcome::PASS)
}

#[test]
fn bundled_content_loads_cleanly() {
    let (catalog, report) = Catalog::load_default();
    assert!(report.is_clean(), "rejected: {:?}", report.rejected);
    assert_eq!(report.loaded, catalog.len());

    for id in [
        "afk",
        "vibrant",
        "shadownerd",
        "heatrises",
        "superillusion",
        "redtunic",
        "flashdrive",
        "jolthaymaker",
        "fallenwarriors",
        "miraclesand",
        "foodcoma",
        "harvestingsummer",
    ] {
        let effect = catalog.get(id).expect(id);
        assert_eq!(effect.kind, EffectKind::Ability, "{}", id);
    }
    for id in ["fartiumz", "dewofdewm", "satsuma", "distortedlens", "sitrusberry"] {
        let effect = catalog.get(id).expect(id);
        assert_eq!(effect.kind, EffectKind::Item, "{}", id);
    }
    for id in ["brn", "truant", "substitute", "flare", "sandstorm", "sunnyday", "grassyterrain"] {
        assert!(catalog.contains(id), "{}", id);
    }
}

#[test]
fn metadata_priorities_and_flags_reach_the_hooks() {
    let (catalog, _) = Catalog::load_default();

    let foodcoma = catalog.get("foodcoma").expect("foodcoma");
    assert_eq!(foodcoma.priority(EventKind::BeforeMove), 9);
    assert_eq!(foodcoma.priority(EventKind::Residual), 0);

    let redtunic = catalog.get("redtunic").expect("redtunic");
    assert_eq!(redtunic.priority(EventKind::SourceModifyAtk), 6);
    assert_eq!(redtunic.priority(EventKind::SourceModifySpA), 5);

    let satsuma = catalog.get("satsuma").expect("satsuma");
    assert_eq!(satsuma.hook(EventKind::Residual).expect("residual").sub_order, 5);

    let illusion = catalog.get("superillusion").expect("superillusion");
    assert!(illusion.has_flag(EffectFlag::Unbreakable));
    assert!(illusion.is_nonstandard());

    let dew = catalog.get("dewofdewm").expect("dewofdewm");
    assert!(dew.has_flag(EffectFlag::Nontransferable));

    let fartium = catalog.get("fartiumz").expect("fartiumz");
    assert!(fartium.hooks.is_empty());
    assert_eq!(
        fartium.extra.get("zMove").and_then(|v| v.as_str()),
        Some("Soup-Stealing 7-Star Strike")
    );
}

#[test]
fn invalid_and_duplicate_ids_are_rejected() {
    let mut builder = Catalog::builder();
    builder
        .add(EffectDescriptor::ability("Bad Id", "Bad"))
        .add(EffectDescriptor::ability("dup", "First"))
        .add(EffectDescriptor::ability("dup", "Second"));
    let (catalog, report) = builder.build_with_report();

    assert!(report.rejected.contains(&ContentError::InvalidId("Bad Id".to_string())));
    assert!(report.rejected.contains(&ContentError::DuplicateId("dup".to_string())));
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get("dup").expect("dup").name, "First");
}

#[test]
fn priority_without_a_hook_drops_the_descriptor() {
    let mut builder = Catalog::builder();
    let accepted = builder.load_yaml_str(
        r#"
- id: orphan
  name: Orphan
  kind: ability
  priorities:
    ModifyAtk: 6
- id: bound
  name: Bound
  kind: ability
  priorities:
    BasePower: 8
"#,
    );
    builder.hook("bound", EventKind::BasePower, pass);
    assert_eq!(accepted, 2);

    let (catalog, report) = builder.build_with_report();
    assert_eq!(
        report.rejected,
        vec![ContentError::OrphanPriority {
            id: "orphan".to_string(),
            event: "ModifyAtk".to_string(),
        }]
    );
    assert!(!catalog.contains("orphan"));
    assert_eq!(catalog.get("bound").expect("bound").priority(EventKind::BasePower), 8);
}

#[test]
fn hooks_for_unknown_effects_are_reported() {
    let mut builder = Catalog::builder();
    builder.hook("ghost", EventKind::Residual, pass);
    let (catalog, report) = builder.build_with_report();
    assert!(catalog.is_empty());
    assert_eq!(
        report.rejected,
        vec![ContentError::UnboundHook {
            id: "ghost".to_string(),
            event: "Residual".to_string(),
        }]
    );
}

#[test]
fn bad_metadata_entries_are_skipped_individually() {
    let mut builder = Catalog::builder();
    let accepted = builder.load_yaml_str(
        r#"
- id: flagged
  name: Flagged
  kind: item
  flags: [shiny]
- id: eventful
  name: Eventful
  kind: item
  priorities:
    onModifyLuck: 1
- id: missingkind
  name: Missing Kind
- id: fine
  name: Fine
  kind: item
  flags: [berry]
"#,
    );
    assert_eq!(accepted, 1);
    let (catalog, report) = builder.build_with_report();
    assert_eq!(report.rejected.len(), 3);
    assert!(report.rejected.contains(&ContentError::UnknownFlag {
        id: "flagged".to_string(),
        flag: "shiny".to_string(),
    }));
    assert!(report.rejected.contains(&ContentError::UnknownEvent {
        id: "eventful".to_string(),
        event: "onModifyLuck".to_string(),
    }));
    assert!(catalog.get("fine").expect("fine").has_flag(EffectFlag::Berry));
}

#[test]
fn documents_that_are_not_sequences_are_malformed() {
    let mut builder = Catalog::builder();
    assert_eq!(builder.load_yaml_str("id: lonely"), 0);
    assert_eq!(builder.load_yaml_str("- [unclosed"), 0);
    let (_, report) = builder.build_with_report();
    assert_eq!(report.rejected.len(), 2);
    assert!(report
        .rejected
        .iter()
        .all(|e| matches!(e, ContentError::Malformed(_))));
}

#[test]
fn field_conditions_need_a_slot() {
    let mut builder = Catalog::builder();
    builder
        .add(EffectDescriptor::new("fog", "Fog", EffectKind::FieldCondition))
        .add(EffectDescriptor::weather("hail", "Hail"));
    let (catalog, report) = builder.build_with_report();
    assert!(!catalog.contains("fog"));
    assert!(catalog.contains("hail"));
    assert!(matches!(report.rejected.as_slice(), [ContentError::Malformed(_)]));
}

#[test]
fn in_code_hooks_keep_metadata_ordering() {
    let mut builder = Catalog::builder();
    builder.load_yaml_str(
        r#"
- id: latehook
  name: Late Hook
  kind: item
  sub_orders:
    Residual: 4
"#,
    );
    builder.hook("latehook", EventKind::Residual, pass);
    let catalog = builder.build();
    let hook = catalog.get("latehook").expect("latehook").hook(EventKind::Residual).copied();
    assert_eq!(hook.map(|h| h.sub_order), Some(4));
}
