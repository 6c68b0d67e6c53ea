use crate::bnf::{Matcher, ParsedGrammar, Part, Production, SequenceKind};

#[test]
pub fn description_parsing_test() {
    let description = r#"
# A list language over numbers.
[rules]
list
    ::= Items '(' { item }&( ',' ) ')'
    |   element

item
    ::= Element value: NUMBER
    |   Nested list

element
    ::= Single NUMBER

[tokens]
NUMBER := /[0-9]+/

[start]
list
"#;
    let parsed = ParsedGrammar::parse(description).unwrap();
    assert_eq!(parsed.rules.len(), 3);
    assert_eq!(parsed.start_symbols, vec!["list".to_string()]);

    let list = parsed.rule("list").unwrap();
    assert_eq!(list.productions.len(), 2);
    match &list.productions[0] {
        Production::Named { name, parts } => {
            assert_eq!(name, "Items");
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0], Part::Literal("(".into()));
            assert_eq!(
                parts[1],
                Part::SeparatedSequence(
                    SequenceKind::Repetition,
                    vec![Part::RuleMatch("item".into())],
                    vec![Part::Literal(",".into())],
                )
            );
            assert_eq!(parts[2], Part::Literal(")".into()));
        }
        production => panic!("Unexpected production {:?}", production),
    }
    assert_eq!(list.productions[1], Production::Alias("element".into()));

    let item = parsed.rule("item").unwrap();
    match &item.productions[0] {
        Production::Named { parts, .. } => {
            assert_eq!(
                parts[0],
                Part::FieldMatch(
                    "value".into(),
                    Box::new(Part::DeclaredToken("NUMBER".into()))
                )
            );
        }
        production => panic!("Unexpected production {:?}", production),
    }

    let number = parsed.matcher("NUMBER").unwrap();
    assert!(matches!(number, Matcher::Regex { .. }));
    assert!(number.matches("42"));
    assert!(!number.matches("4a"));
    assert!(!number.matches(""));
}

#[test]
pub fn sequence_kinds_test() {
    let description = r#"
[rules]
shape
    ::= Mix ( 'a' 'b' ) [ 'c' ] { 'd' } < 'e' >
"#;
    let parsed = ParsedGrammar::parse(description).unwrap();
    let shape = parsed.rule("shape").unwrap();
    match &shape.productions[0] {
        Production::Named { parts, .. } => {
            assert_eq!(
                parts[0],
                Part::Sequence(
                    SequenceKind::Plain,
                    vec![Part::Literal("a".into()), Part::Literal("b".into())]
                )
            );
            assert_eq!(
                parts[1],
                Part::Sequence(SequenceKind::Optional, vec![Part::Literal("c".into())])
            );
            assert_eq!(
                parts[2],
                Part::Sequence(SequenceKind::Repetition, vec![Part::Literal("d".into())])
            );
            assert_eq!(
                parts[3],
                Part::Sequence(
                    SequenceKind::NonemptyRepetition,
                    vec![Part::Literal("e".into())]
                )
            );
        }
        production => panic!("Unexpected production {:?}", production),
    }
}

#[test]
pub fn alternating_sequence_test() {
    let description = r#"
[rules]
choice
    ::= Pick ( 'a' | 'b' 'c' )
"#;
    let parsed = ParsedGrammar::parse(description).unwrap();
    match &parsed.rule("choice").unwrap().productions[0] {
        Production::Named { parts, .. } => {
            assert_eq!(
                parts[0],
                Part::Sequence(
                    SequenceKind::Alternating,
                    vec![
                        Part::Literal("a".into()),
                        Part::Sequence(
                            SequenceKind::Plain,
                            vec![Part::Literal("b".into()), Part::Literal("c".into())]
                        ),
                    ]
                )
            );
        }
        production => panic!("Unexpected production {:?}", production),
    }
}

#[test]
pub fn default_start_symbol_test() {
    let parsed = ParsedGrammar::parse("[rules]\nfirst ::= A 'a'\nsecond ::= B 'b'\n").unwrap();
    assert_eq!(parsed.start_symbols, vec!["first".to_string()]);
}

#[test]
pub fn literal_matcher_test() {
    let parsed = ParsedGrammar::parse("[rules]\na ::= A ARROW\n[tokens]\nARROW = '->'\n").unwrap();
    let arrow = parsed.matcher("ARROW").unwrap();
    assert!(matches!(arrow, Matcher::Literal { .. }));
    assert!(arrow.matches("->"));
    assert!(!arrow.matches("=>"));
}

#[test]
pub fn description_error_test() {
    let failures = vec![
        ("", "description is empty"),
        ("a ::= X 'x'", "section header is expected"),
        ("[tokens]\nA = 'a'\n", "declares no rule"),
        ("[rules]\na ::= X 'x'\na ::= Y 'y'\n", "already defined"),
        ("[rules]\na ::= X ( 'x'\n", "never closed"),
        ("[rules]\na ::=\n", "Unexpected end"),
        ("[rules]\na\n", "no production"),
        ("[rules]\na ::= X ( )\n", "at least one part"),
        ("[rules]\na ::= X 'x'\n[tokens]\nBAD := /(/\n", "regular expression"),
        (
            "[rules]\na ::= X 'x'\n[tokens]\nT = 'y'\nT = 'z'\n",
            "already declared",
        ),
        ("[rules]\na ::= X 'x'\n[start]\na a\n", "already declared"),
        ("[rules]\na ::= X 'x' $\n", "Unexpected character"),
        ("[rules]\na ::= X [ 'x' ]&( ',' )\n", "repetition brackets"),
    ];
    for (description, expected) in failures {
        match ParsedGrammar::parse(description) {
            Ok(_) => panic!("{:?} should be rejected", description),
            Err(err) => {
                assert!(
                    err.message.contains(expected),
                    "{:?} failed with {:?} instead of {:?}",
                    description,
                    err.message,
                    expected
                );
            }
        }
    }
}
