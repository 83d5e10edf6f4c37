mod common;

use common::snapshot_with_input;
use mathchat::router::{ROUTE_OPERATORS, RouteLabel, routing_predicate};
use proptest::prelude::*;

#[test]
fn arithmetic_inputs_route_to_math() {
    assert_eq!(RouteLabel::of("4 + 5 * 2"), RouteLabel::Math);
    assert_eq!(RouteLabel::of("10 * (2 + 3)"), RouteLabel::Math);
    assert_eq!(RouteLabel::of("7/3"), RouteLabel::Math);
    assert_eq!(RouteLabel::of("x = 5"), RouteLabel::Math);
}

#[test]
fn plain_inputs_route_to_chat() {
    assert_eq!(RouteLabel::of("hello there"), RouteLabel::Chat);
    assert_eq!(RouteLabel::of("what is the capital of France?"), RouteLabel::Chat);
    assert_eq!(RouteLabel::of(""), RouteLabel::Chat);
}

// Membership is over characters, not tokens. A hyphen inside chat text is
// enough to select the math branch; that imprecision is part of the
// observable contract and must not be "fixed".
#[test]
fn stray_operator_characters_misroute_to_math() {
    assert_eq!(RouteLabel::of("what's 2-2 cats?"), RouteLabel::Math);
    assert_eq!(RouteLabel::of("ask me anything ="), RouteLabel::Math);
}

#[test]
fn predicate_names_the_selected_node() {
    let predicate = routing_predicate();
    assert_eq!(predicate(snapshot_with_input("2 + 2")), vec!["math".to_string()]);
    assert_eq!(
        predicate(snapshot_with_input("tell me a joke")),
        vec!["chat".to_string()]
    );
}

proptest! {
    // The router is total over strings and agrees with raw character
    // membership on every input.
    #[test]
    fn label_matches_operator_membership(input in ".*") {
        let contains_op = input.chars().any(|c| ROUTE_OPERATORS.contains(&c));
        let label = RouteLabel::of(&input);
        prop_assert_eq!(label == RouteLabel::Math, contains_op);
    }

    // Classification is pure: repeated calls agree.
    #[test]
    fn classification_is_stable(input in ".*") {
        prop_assert_eq!(RouteLabel::of(&input), RouteLabel::of(&input));
    }
}
