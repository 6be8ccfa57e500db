use battle_hooks::core::modifier::{Adjustment, Modifier, ModifierChain};

fn chain(base: i64, multipliers: &[f64]) -> i64 {
    let adjustments: Vec<Adjustment> = multipliers
        .iter()
        .map(|m| Adjustment::Multiply(Modifier::from_f64(*m)))
        .collect();
    ModifierChain::apply(base, &adjustments)
}

#[test]
fn each_step_rounds_half_up_so_order_matters() {
    assert_eq!(chain(3, &[1.5, 0.5, 1.5]), 5);
    assert_eq!(chain(3, &[1.5, 1.5, 0.5]), 4);
}

#[test]
fn boost_then_halve_lands_on_three_quarters() {
    assert_eq!(chain(100, &[1.5, 0.5]), 75);
    assert_eq!(chain(100, &[]), 100);
}

#[test]
fn results_never_go_negative() {
    assert_eq!(Modifier::DOUBLE.apply(-10), 0);
    assert_eq!(Modifier::HALF.apply(-1), 0);
    assert_eq!(ModifierChain::apply(10, &[Adjustment::Override(-5)]), 0);

    let mut running = ModifierChain::new(10);
    running.set(-5);
    assert_eq!(running.value(), 0);

    let mut priority = ModifierChain::signed(0);
    priority.set(-3);
    assert_eq!(priority.value(), -3);
}

#[test]
fn huge_values_saturate_instead_of_overflowing() {
    assert_eq!(Modifier::DOUBLE.apply(i64::MAX / 2), i64::MAX / 4096);
    assert_eq!(Modifier::IDENTITY.apply(i64::MAX), i64::MAX / 4096);
}

#[test]
fn override_closes_the_chain() {
    let adjustments = [
        Adjustment::Multiply(Modifier::DOUBLE),
        Adjustment::Override(30),
        Adjustment::Multiply(Modifier::DOUBLE),
    ];
    assert_eq!(ModifierChain::apply(100, &adjustments), 30);

    let mut running = ModifierChain::new(100);
    assert!(!running.push(Adjustment::Override(7)));
    assert!(!running.push(Adjustment::Multiply(Modifier::DOUBLE)));
    running.set(99);
    assert_eq!(running.value(), 7);
    assert!(running.is_overridden());
    assert_eq!(running.steps(), 1);
    assert_eq!(running.base(), 100);
}

#[test]
fn fixed_point_constructors_agree() {
    assert_eq!(Modifier::from_f64(0.5), Modifier::HALF);
    assert_eq!(Modifier::from_f64(1.5), Modifier::ONE_AND_HALF);
    assert_eq!(Modifier::ratio(1, 4), Modifier::QUARTER);
    assert_eq!(Modifier::ratio(1, 16).raw(), 256);
    assert_eq!(Modifier::ratio(3, 0).raw(), 0);
    assert_eq!(Modifier::default(), Modifier::IDENTITY);
    assert_eq!(Modifier::IDENTITY.apply(123), 123);
}
