/*!
End-to-end tests: parse a sample program, run it through the interpreter or the enumerator, and
check the result against a hand-computed expectation.
*/
use pretty_assertions::assert_eq;
use zerkel::enumerate::Enumerator;
use zerkel::eval::{Argument, EvalError, Interpreter};
use zerkel::parser;
use zerkel::set::Set;
use zerkel::term::{analyse, Node, TermError};

fn successor() -> Node {
    Node::composition(Node::union_plus(), vec![Node::identity(), Node::identity()])
}

fn interpret(node: Node, args: &[Argument]) -> Set {
    Interpreter::new(node).interpret(args).expect("interpret")
}

#[test]
fn successor_iterated_four_times() {
    let node = successor();
    let a = interpret(node.clone(), &[Argument::from("{}")]);
    assert_eq!(a, Set::parse("{{}}").unwrap());

    let b = interpret(node.clone(), &[Argument::Set(a)]);
    assert_eq!(b, Set::parse("{{}, {{}}}").unwrap());

    let c = interpret(node.clone(), &[Argument::Set(b)]);
    assert_eq!(c, Set::parse("{{}, {{}}, {{}, {{}}}}").unwrap());

    let d = interpret(node, &[Argument::Set(c)]);
    assert_eq!(
        d,
        Set::parse("{{}, {{}}, {{}, {{}}}, {{}, {{}}, {{}, {{}}}}}").unwrap()
    );
}

#[test]
fn singleton_wraps_its_argument() {
    let node = parser::parse("o+>EI").unwrap();
    let result = interpret(node.clone(), &[Argument::from("{}")]);
    assert_eq!(result, Set::parse("{{}}").unwrap());

    let result = interpret(node, &[Argument::from("{{}}")]);
    assert_eq!(result, Set::parse("{{{}}}").unwrap());
}

#[test]
fn tuple_builds_an_ordered_pair() {
    let node = parser::parse("o+o+>>E>I<I").unwrap();
    let result = interpret(node, &[Argument::from("{}"), Argument::from("{{}}")]);
    assert_eq!(result, Set::parse("{{}, {{}}}").unwrap());
}

#[test]
fn bare_recursion_over_union_plus_is_transitive_closure() {
    let node = Node::recursion(Node::union_plus());
    let result = interpret(node.clone(), &[Argument::from("{{}}")]);
    assert_eq!(result, Set::parse("{{}, {{}}}").unwrap());

    let result = interpret(node, &[Argument::from("{{{{}}}}")]);
    assert_eq!(result, Set::parse("{{}, {{}}, {{{}}}, {{{{}}}}}").unwrap());
}

#[test]
fn union_macro_flattens_one_level() {
    let node = parser::parse("oRo?<>I>>I<>I<<III").unwrap();
    let result = interpret(node, &[Argument::from("{{{}}, {{{}}}}")]);
    assert_eq!(result, Set::parse("{{}, {{}}}").unwrap());
}

#[test]
fn union_macro_with_in_operator_matches_plain_union() {
    let node = parser::parse("oR!<>I>>III").unwrap();
    let input = "{{{{}}, {{{}}}}, {{}, {{}}, {{}, {{}}}, {{}, {{}}, {{}, {{}}}}}}";
    let result = interpret(node, &[Argument::from(input)]);
    let expected =
        Set::parse("{{{}}, {{{}}}, {}, {{}}, {{}, {{}}}, {{}, {{}}, {{}, {{}}}}}").unwrap();
    assert_eq!(result, expected);
}

#[test]
fn rank_of_union_of_deeply_nested_set() {
    let node = parser::parse("ooRo?<>I>>I<>I<<IIIR>o+II").unwrap();
    let input = "{{{{}}, {{{}}}}, {{}, {{}}, {{}, {{}}}, {{}, {{}}, {{}, {{}}}}}}";
    let result = interpret(node, &[Argument::from(input)]);
    assert_eq!(result.ordinal(), Some(5));
}

#[test]
fn subtraction_saturates_at_zero() {
    let node = parser::parse("sub").unwrap();
    for i in 0..12usize {
        for j in 0..12usize {
            let result = interpret(node.clone(), &[Argument::Ordinal(i), Argument::Ordinal(j)]);
            assert_eq!(result.ordinal(), Some(i.saturating_sub(j)));
        }
    }
}

#[test]
fn division_rounds_toward_zero() {
    let node = parser::parse("div").unwrap();
    let cases = [(3, 3, 1), (6, 3, 2), (6, 2, 3), (6, 1, 6)];
    for (a, b, expected) in cases.iter().copied() {
        let result = interpret(node.clone(), &[Argument::Ordinal(a), Argument::Ordinal(b)]);
        assert_eq!(result.ordinal(), Some(expected));
    }
}

#[test]
fn log_is_the_inverse_of_power() {
    let node = parser::parse("log").unwrap();
    let result = interpret(node, &[Argument::Ordinal(4), Argument::Ordinal(2)]);
    assert_eq!(result.ordinal(), Some(2));
}

#[test]
fn multiplication_matches_ordinal_arithmetic() {
    let node = parser::parse("mult").unwrap();
    let result = interpret(node, &[Argument::Ordinal(3), Argument::Ordinal(4)]);
    assert_eq!(result.ordinal(), Some(12));
}

#[test]
fn power_matches_ordinal_arithmetic() {
    let node = parser::parse("power").unwrap();
    let result = interpret(node.clone(), &[Argument::Ordinal(3), Argument::Ordinal(2)]);
    assert_eq!(result.ordinal(), Some(9));

    let result = interpret(node, &[Argument::Ordinal(2), Argument::Ordinal(4)]);
    assert_eq!(result.ordinal(), Some(16));
}

#[test]
fn map_macro_applies_successor_elementwise() {
    let node = parser::parse("map o+II").unwrap();
    let x = Set::generate(14);
    let result = interpret(node, &[Argument::Set(x)]);
    let expected = Set::parse("{2, 3, {1, {1}}}").unwrap();
    assert_eq!(result, expected);
}

#[test]
fn function_form_parses_to_the_same_node_as_its_expansion() {
    let successor_macro = parser::parse("successor").unwrap();
    assert_eq!(successor_macro, successor());
}

#[test]
fn map_macro_matches_its_hand_expanded_form() {
    let mapped = parser::parse("map o+II").unwrap();
    let expanded = parser::parse("oRo?<>oo+<EIo+II>>I<>I<<III").unwrap();
    assert_eq!(mapped, expanded);
}

#[test]
fn filter_macro_matches_its_hand_expanded_form() {
    let filtered = parser::parse("filter o+II").unwrap();
    let expanded = parser::parse("oRo?<>o?o+<EI<E<Eo+II>>I<>I<<III").unwrap();
    assert_eq!(filtered, expanded);
}

#[test]
fn all_macro_matches_its_and_map_expansion() {
    let all_form = parser::parse("o all equal II").unwrap();
    let expanded = parser::parse("o o and map equal II").unwrap();
    assert_eq!(all_form, expanded);
}

#[test]
fn mismatched_compound_arity_is_rejected_by_analysis() {
    let node = parser::parse("o+I<I").unwrap();
    assert_eq!(analyse(&node), Err(TermError::OneCompoundMismatchedArity));
}

#[test]
fn too_many_arguments_is_reported() {
    let mut interpreter = Interpreter::new(Node::identity());
    let err = interpreter
        .interpret(&[Argument::Ordinal(1), Argument::Ordinal(2)])
        .unwrap_err();
    assert_eq!(
        err,
        EvalError::MismatchedNumberOfArguments {
            expected: 1,
            actual: 2,
        }
    );
}

#[test]
fn not_enough_arguments_is_reported() {
    let mut interpreter = Interpreter::new(successor());
    let err = interpreter.interpret(&[]).unwrap_err();
    assert_eq!(
        err,
        EvalError::MismatchedNumberOfArguments {
            expected: 1,
            actual: 0,
        }
    );
}

#[test]
fn enumerator_finds_successor_at_size_four_arity_one() {
    let successor_macro = parser::parse("o+II").unwrap();
    let programs = Enumerator::new(false).generate(4, 1);
    assert!(programs.contains(&successor_macro));
}

#[test]
fn enumerator_finds_singleton_at_size_five_arity_one() {
    let singleton = parser::parse("o+<EI").unwrap();
    let programs = Enumerator::new(false).generate(5, 1);
    assert!(programs.contains(&singleton));
}

#[test]
fn enumerator_finds_pair_at_size_ten_arity_two() {
    let pair = parser::parse("o+>o+<EI<I").unwrap();
    let programs = Enumerator::new(false).generate(10, 2);
    assert!(programs.contains(&pair));
}

#[test]
fn enumerator_finds_union_at_size_fifteen_arity_two_without_in_operator() {
    let union = parser::parse("Ro?<>I>>I<>I<<I").unwrap();
    let programs = Enumerator::new(false).generate(15, 2);
    assert!(programs.contains(&union));
}

#[test]
fn enumerator_finds_union_at_size_eleven_arity_one_with_in_operator() {
    let union = parser::parse("oR!<>I>>III").unwrap();
    let programs = Enumerator::new(true).generate(11, 1);
    assert!(programs.contains(&union));
}
