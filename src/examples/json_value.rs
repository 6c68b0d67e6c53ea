use crate::bnf::{ParsedGrammar, TranslatedGrammar};

/// A JSON value grammar in the grammar description language.
///
/// Strings, numbers and constants are declared token matchers; the punctuation appears
/// as literals. Object and array bodies are possibly empty separated lists.
pub const JSON_GRAMMAR: &str = r#"
# JSON values over a pre-tokenized input.
[rules]
value
    ::= Primitive primitive
    |   Arr array
    |   Obj object

primitive
    ::= Str STRING
    |   Num NUMBER
    |   Const CONSTANT

array
    ::= Array '[' { value }&( ',' ) ']'

object
    ::= Object '{' { member }&( ',' ) '}'

member
    ::= Member key: STRING ':' value

[tokens]
STRING := /"(\\.|[^"\\])*"/
NUMBER := /-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?/
CONSTANT := /true|false|null/

[start]
value
"#;

/// Parse and translate [JSON_GRAMMAR].
pub fn json_grammar() -> TranslatedGrammar {
    let parsed = ParsedGrammar::parse(JSON_GRAMMAR).unwrap();
    TranslatedGrammar::translate(&parsed).unwrap()
}
