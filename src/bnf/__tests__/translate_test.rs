use crate::bnf::{ParsedGrammar, TokenId, TranslatedGrammar};

fn translated(description: &str) -> TranslatedGrammar {
    let parsed = ParsedGrammar::parse(description).unwrap();
    TranslatedGrammar::translate(&parsed).unwrap()
}

fn classified(grammar: &TranslatedGrammar, texts: &[&str]) -> Vec<TokenId> {
    texts
        .iter()
        .map(|text| {
            grammar
                .vocabulary()
                .classify(text)
                .expect("every token text is classified")
        })
        .collect()
}

#[test]
pub fn separated_list_test() {
    let grammar = translated(
        r#"
[rules]
list
    ::= List '[' { NUMBER }&( ',' ) ']'
[tokens]
NUMBER := /[0-9]+/
"#,
    );
    let parser = grammar.parser().unwrap();

    // The braced list may be empty.
    assert_eq!(parser.parse(&classified(&grammar, &["[", "]"])).len(), 1);
    assert_eq!(
        parser.parse(&classified(&grammar, &["[", "7", "]"])).len(),
        1
    );
    assert_eq!(
        parser
            .parse(&classified(&grammar, &["[", "7", ",", "8", ",", "9", "]"]))
            .len(),
        1
    );
    assert!(parser
        .parse(&classified(&grammar, &["[", ",", "]"]))
        .is_empty());
    assert!(parser
        .parse(&classified(&grammar, &["[", "7", ","]))
        .is_empty());
}

#[test]
pub fn nonempty_separated_list_test() {
    let grammar = translated(
        r#"
[rules]
list
    ::= List '[' < NUMBER >&( ',' ) ']'
[tokens]
NUMBER := /[0-9]+/
"#,
    );
    let parser = grammar.parser().unwrap();

    assert!(parser.parse(&classified(&grammar, &["[", "]"])).is_empty());
    assert_eq!(
        parser.parse(&classified(&grammar, &["[", "7", "]"])).len(),
        1
    );
    assert_eq!(
        parser
            .parse(&classified(&grammar, &["[", "7", ",", "8", "]"]))
            .len(),
        1
    );
}

#[test]
pub fn optional_group_test() {
    let grammar = translated(
        r#"
[rules]
number
    ::= Signed [ '-' ] NUMBER
[tokens]
NUMBER := /[0-9]+/
"#,
    );
    let parser = grammar.parser().unwrap();
    assert_eq!(parser.parse(&classified(&grammar, &["7"])).len(), 1);
    assert_eq!(parser.parse(&classified(&grammar, &["-", "7"])).len(), 1);
    assert!(parser.parse(&classified(&grammar, &["-"])).is_empty());
}

#[test]
pub fn mutual_recursion_test() {
    let grammar = translated(
        r#"
[rules]
a
    ::= Step 'x' b
    |   End 'z'
b
    ::= Back a
"#,
    );
    let parser = grammar.parser().unwrap();
    assert_eq!(parser.parse(&classified(&grammar, &["z"])).len(), 1);
    assert_eq!(parser.parse(&classified(&grammar, &["x", "z"])).len(), 1);
    assert_eq!(
        parser
            .parse(&classified(&grammar, &["x", "x", "x", "z"]))
            .len(),
        1
    );
    assert!(parser.parse(&classified(&grammar, &["x"])).is_empty());
}

#[test]
pub fn forward_alias_test() {
    let grammar = translated(
        r#"
[rules]
a
    ::= b
b
    ::= Wrapped 'x'
"#,
    );
    let parser = grammar.parser().unwrap();
    assert_eq!(parser.parse(&classified(&grammar, &["x"])).len(), 1);
    // Nothing else is in the vocabulary.
    assert_eq!(grammar.vocabulary().classify("y"), None);
}

#[test]
pub fn vocabulary_test() {
    let grammar = translated(
        r#"
[rules]
item
    ::= Pair WORD '=' WORD
[tokens]
WORD := /[a-z]+/
"#,
    );
    let vocabulary = grammar.vocabulary();
    assert_eq!(vocabulary.len(), 2);

    let word = vocabulary.token_of("WORD").unwrap();
    let equal = vocabulary.literal("=").unwrap();
    assert_ne!(word, equal);
    assert_eq!(vocabulary.classify("abc"), Some(word));
    assert_eq!(vocabulary.classify("="), Some(equal));
    assert_eq!(vocabulary.classify("7"), None);
    assert_eq!(vocabulary.describe(word), "WORD");
    assert_eq!(vocabulary.describe(equal), "'='");
}

#[test]
pub fn multiple_start_symbols_test() {
    let grammar = translated(
        r#"
[rules]
a
    ::= A 'x'
b
    ::= B 'y'
[start]
a b
"#,
    );
    assert_eq!(grammar.start_names(), vec!["a", "b"]);
    assert!(grammar.start_of("b").is_some());
    assert!(grammar.start_of("c").is_none());

    let b_parser = crate::Parser::new(grammar.start_of("b").unwrap()).unwrap();
    assert_eq!(b_parser.parse(&classified(&grammar, &["y"])).len(), 1);
}

#[test]
pub fn translation_error_test() {
    let undeclared_token = ParsedGrammar::parse("[rules]\na ::= A MISSING\n").unwrap();
    match TranslatedGrammar::translate(&undeclared_token) {
        Ok(_) => panic!("An undeclared token should be rejected."),
        Err(err) => println!("{}", err),
    }

    let unknown_rule = ParsedGrammar::parse("[rules]\na ::= A missing\n").unwrap();
    match TranslatedGrammar::translate(&unknown_rule) {
        Ok(_) => panic!("An unknown rule reference should be rejected."),
        Err(err) => println!("{}", err),
    }
}
