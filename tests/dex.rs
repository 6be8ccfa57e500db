use battle_hooks::core::state::BoostId;
use battle_hooks::data::moves::{MoveCategory, MoveDatabase};
use battle_hooks::Dex;

#[test]
fn load_bundled_dex() {
    let dex = Dex::load_default().expect("dex");
    assert!(!dex.moves.as_map().is_empty(), "move database should not be empty");
    assert!(dex.species.as_map().len() >= 20);

    let kingsshield = dex.moves.get("kingsshield").expect("kingsshield");
    assert_eq!(kingsshield.category, MoveCategory::Status);
    assert_eq!(kingsshield.priority, 4);
    assert_eq!(kingsshield.display_name(), "King's Shield");

    let swordsdance = dex.moves.get("swordsdance").expect("swordsdance");
    assert_eq!(swordsdance.boosts.get(&BoostId::Atk), Some(&2));
    assert!(dex.moves.get("machpunch").expect("machpunch").flags.contains("punch"));
}

#[test]
fn forms_resolve_to_their_base_species() {
    let dex = Dex::load_default().expect("dex");
    let blade = dex.species.get("Aegislash-Blade").expect("by display name");
    assert_eq!(blade.id, "aegislashblade");
    assert_eq!(blade.base_species_id(), "aegislash");
    assert_eq!(dex.species.get("aegislash").expect("base").base_species_id(), "aegislash");
    assert_eq!(dex.species.get("persianalola").expect("alola").base_species_id(), "persian");
}

#[test]
fn type_chart_counts_steps() {
    let dex = Dex::load_default().expect("dex");
    let types = |list: &[&str]| list.iter().map(|t| t.to_string()).collect::<Vec<_>>();

    assert_eq!(dex.types.type_mod("fighting", &types(&["dark"])), 1);
    assert_eq!(dex.types.type_mod("ground", &types(&["rock", "steel"])), 2);
    assert_eq!(dex.types.type_mod("fire", &types(&["water"])), -1);
    assert_eq!(dex.types.type_mod("???", &types(&["normal"])), 0);
    assert!(dex.types.is_immune("normal", &types(&["ghost"])));
    assert!(dex.types.is_immune("ground", &types(&["flying", "fire"])));
    assert_eq!(dex.types.effectiveness("ghost", &types(&["normal"])), 0.0);
    assert_eq!(dex.types.effectiveness("ice", &types(&["dragon", "ground"])), 4.0);
}

#[test]
fn move_yaml_accepts_lists_and_maps() {
    let list = MoveDatabase::load_from_yaml_str(
        "- { id: tackle, type: normal, category: physical, power: 40 }",
    )
    .expect("list");
    assert_eq!(list.get("tackle").expect("tackle").display_name(), "tackle");

    let map = MoveDatabase::load_from_yaml_str(
        "ember:\n  id: ember\n  type: fire\n  category: special\n  power: 40\n",
    )
    .expect("map");
    assert_eq!(map.get("ember").expect("ember").power, 40);

    assert!(MoveDatabase::load_from_yaml_str("- { id: broken }").is_err());
}
