use crate::{Grammar, Tree};
use std::rc::Rc;

#[test]
fn emptiness_test() {
    let nil: Rc<Grammar<char>> = Grammar::nil();
    let witness: Rc<Grammar<char>> = Grammar::eps(vec![Tree::empty()]);
    assert!(nil.is_empty());
    assert!(!witness.is_empty());
    assert!(!Grammar::tok('a').is_empty());
    assert!(!Grammar::rep(&nil).is_empty());

    assert!(Grammar::alt(&nil, &Grammar::nil()).is_empty());
    assert!(!Grammar::alt(&nil, &Grammar::tok('a')).is_empty());
    assert!(Grammar::seq(&nil, &Grammar::tok('a')).is_empty());
    assert!(!Grammar::seq(&Grammar::tok('a'), &Grammar::tok('b')).is_empty());

    // A cyclic grammar with a terminating alternative is not empty.
    let s = Grammar::declare();
    s.define_alt(&Grammar::seq(&s, &s), &Grammar::tok('a'))
        .unwrap();
    assert!(!s.is_empty());
}

#[test]
fn nullability_test() {
    let nil: Rc<Grammar<char>> = Grammar::nil();
    let witness: Rc<Grammar<char>> = Grammar::eps(vec![Tree::empty()]);
    assert!(!nil.is_nullable());
    assert!(witness.is_nullable());
    assert!(!Grammar::tok('a').is_nullable());
    assert!(Grammar::rep(&Grammar::tok('a')).is_nullable());

    assert!(Grammar::alt(&Grammar::tok('a'), &witness).is_nullable());
    assert!(!Grammar::seq(&witness, &Grammar::tok('a')).is_nullable());

    // The left-recursive sum grammar is not nullable.
    let sum = crate::examples::arithmetic::sum_grammar();
    assert!(!sum.is_nullable());

    // A cyclic nullable grammar.
    let balanced = crate::examples::balanced::balanced_grammar();
    assert!(balanced.is_nullable());
    assert!(!balanced.is_empty());
}

#[test]
fn parse_null_test() {
    let nil: Rc<Grammar<char>> = Grammar::nil();
    assert!(nil.parse_null().is_empty());
    assert!(Grammar::tok('a').parse_null().is_empty());

    assert_eq!(
        Grammar::rep(&Grammar::tok('a')).parse_null(),
        vec![Tree::empty()]
    );

    // The concatenation pairs trees with the left operand in the outer loop.
    let pair = Grammar::seq(
        &Grammar::eps(vec![Tree::leaf('x'), Tree::leaf('y')]),
        &Grammar::eps(vec![Tree::leaf('z')]),
    );
    assert_eq!(
        pair.parse_null(),
        vec![
            Tree::branch(&Tree::leaf('x'), &Tree::leaf('z')),
            Tree::branch(&Tree::leaf('y'), &Tree::leaf('z')),
        ]
    );

    let either = Grammar::alt(
        &Grammar::eps(vec![Tree::leaf('x')]),
        &Grammar::eps(vec![Tree::leaf('y')]),
    );
    assert_eq!(either.parse_null(), vec![Tree::leaf('x'), Tree::leaf('y')]);
}

#[test]
fn nullability_matches_null_parses_test() {
    let samples: Vec<Rc<Grammar<char>>> = vec![
        Grammar::nil(),
        Grammar::eps(vec![Tree::empty()]),
        Grammar::tok('a'),
        Grammar::rep(&Grammar::tok('a')),
        Grammar::seq(&Grammar::rep(&Grammar::tok('a')), &Grammar::tok('b')),
        crate::examples::balanced::balanced_grammar(),
        crate::examples::arithmetic::sum_grammar(),
    ];
    for grammar in samples {
        assert_eq!(
            grammar.is_nullable(),
            !grammar.parse_null().is_empty(),
            "nullability disagrees with the null parses of {:?}",
            grammar
        );
    }
}

#[test]
fn nullable_singleton_test() {
    let single = Grammar::eps(vec![Tree::leaf('x')]);
    assert_eq!(single.nullable_singleton(), Some(Tree::leaf('x')));

    let double = Grammar::eps(vec![Tree::leaf('x'), Tree::leaf('y')]);
    assert_eq!(double.nullable_singleton(), None);

    assert_eq!(Grammar::tok('a').nullable_singleton(), None);
    assert_eq!(
        Grammar::rep(&Grammar::tok('a')).nullable_singleton(),
        Some(Tree::empty())
    );
}

#[test]
#[should_panic(expected = "Fixed point")]
fn unbounded_null_forest_test() {
    // The grammar assigns infinitely many derivations to the empty string, so the
    // analysis cannot settle and must abort instead of looping.
    let g = Grammar::declare();
    g.define_alt(&g, &Grammar::eps(vec![Tree::leaf('t')]))
        .unwrap();
    g.parse_null();
}
