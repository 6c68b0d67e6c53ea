use crate::{Derivation, Grammar, Parser, Tree};
use std::rc::Rc;

fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

#[test]
fn single_token_test() {
    let parser = Parser::new(&Grammar::tok('a')).unwrap();
    assert!(parser.parse(&[]).is_empty());
    assert_eq!(parser.parse(&['a']), vec![Tree::leaf('a')]);
    assert!(parser.parse(&['b']).is_empty());
}

#[test]
fn alternation_test() {
    let either = Grammar::alt(&Grammar::tok('a'), &Grammar::tok('b'));
    let parser = Parser::new(&either).unwrap();
    assert_eq!(parser.parse(&['b']), vec![Tree::leaf('b')]);
    assert_eq!(parser.parse(&['a']), vec![Tree::leaf('a')]);
    assert!(parser.parse(&['c']).is_empty());
}

#[test]
fn concatenation_test() {
    let pair = Grammar::seq(&Grammar::tok('a'), &Grammar::tok('b'));
    let parser = Parser::new(&pair).unwrap();
    assert_eq!(
        parser.parse(&['a', 'b']),
        vec![Tree::branch(&Tree::leaf('a'), &Tree::leaf('b'))]
    );
    assert!(parser.parse(&['a']).is_empty());
    assert!(parser.parse(&['a', 'b', 'b']).is_empty());
}

#[test]
fn repetition_test() {
    let many = Grammar::rep(&Grammar::tok('a'));
    let parser = Parser::new(&many).unwrap();

    assert_eq!(parser.parse(&[]), vec![Tree::empty()]);
    assert_eq!(
        parser.parse(&['a', 'a']),
        vec![Tree::branch(
            &Tree::leaf('a'),
            &Tree::branch(&Tree::leaf('a'), &Tree::empty()),
        )]
    );
    assert!(parser.parse(&['a', 'b']).is_empty());
}

#[test]
fn ambiguous_grammar_test() {
    // s ::= s s | 'a' assigns Catalan(n) trees to n + 1 tokens.
    let parser = Parser::new(&crate::examples::arithmetic::ambiguous_grammar()).unwrap();

    assert_eq!(parser.parse(&chars("a")).len(), 1);
    let trees = parser.parse(&chars("aaa"));
    assert_eq!(trees.len(), 2);
    assert_ne!(trees[0], trees[1]);
    for tree in &trees {
        assert_eq!(tree.leaves(), chars("aaa"));
    }
    assert_eq!(parser.parse(&chars("aaaa")).len(), 5);
}

#[test]
fn left_recursion_test() {
    let parser = Parser::new(&crate::examples::arithmetic::sum_grammar()).unwrap();

    let trees = parser.parse(&chars("n+n+n"));
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].leaves(), chars("n+n+n"));

    assert_eq!(parser.parse(&chars("n")).len(), 1);
    assert!(parser.parse(&chars("+n")).is_empty());
    assert!(parser.parse(&chars("n+")).is_empty());
}

#[test]
fn alternation_distributes_over_parse_test() {
    let left = Grammar::rep(&Grammar::tok('a'));
    let right = Grammar::seq(&Grammar::tok('a'), &Grammar::tok('a'));
    let either = Grammar::alt(&left, &right);

    for input in ["", "a", "aa", "aaa"] {
        let tokens = chars(input);
        let mut combined = Parser::new(&left).unwrap().parse(&tokens);
        combined.extend(Parser::new(&right).unwrap().parse(&tokens));
        assert_eq!(Parser::new(&either).unwrap().parse(&tokens), combined);
    }
}

#[test]
fn empty_grammar_parse_test() {
    // An empty grammar recognizes nothing, and that is not an error.
    let empty = Grammar::seq(&Grammar::tok('a'), &Grammar::nil());
    assert!(empty.is_empty());
    let parser = Parser::new(&empty).unwrap();
    assert!(parser.parse(&[]).is_empty());
    assert!(parser.parse(&['a']).is_empty());
}

#[test]
fn derivative_identity_test() {
    // Within a session the derivative is memoized on node identity.
    let s = crate::examples::arithmetic::ambiguous_grammar();
    let mut derivation = Derivation::new();
    let first = derivation.derive(&s, 'a');
    let second = derivation.derive(&s, 'a');
    assert!(Rc::ptr_eq(&first, &second));

    let other = derivation.derive(&s, 'b');
    assert!(!Rc::ptr_eq(&first, &other));
}

#[test]
fn eager_and_late_bound_equivalence_test() {
    // The same acyclic grammar built eagerly and through declare/define parses alike.
    let eager = Grammar::seq(&Grammar::tok('a'), &Grammar::rep(&Grammar::tok('b')));

    let late: Rc<Grammar<char>> = Grammar::declare();
    let tail = Grammar::declare();
    tail.define_rep(&Grammar::tok('b')).unwrap();
    late.define_seq(&Grammar::tok('a'), &tail).unwrap();

    for input in ["a", "ab", "abb", "b", ""] {
        let tokens = chars(input);
        assert_eq!(
            Parser::new(&eager).unwrap().parse(&tokens),
            Parser::new(&late).unwrap().parse(&tokens)
        );
    }
}

#[test]
fn reduction_test() {
    // A reduction rewrites every tree the wrapped grammar produces.
    let pair = Grammar::seq(&Grammar::tok('a'), &Grammar::tok('b'));
    let swapped = Grammar::red(
        &pair,
        crate::Reducer::new(|tree| match tree.as_ref() {
            Tree::Branch(left, right) => Tree::branch(right, left),
            _ => tree.clone(),
        }),
    );
    let parser = Parser::new(&swapped).unwrap();
    assert_eq!(
        parser.parse(&['a', 'b']),
        vec![Tree::branch(&Tree::leaf('b'), &Tree::leaf('a'))]
    );
}
